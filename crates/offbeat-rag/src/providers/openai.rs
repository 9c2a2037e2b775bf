//! OpenAI chat completions client for answer generation
//!
//! Also works against OpenAI-compatible servers via `llm.base_url`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::types::Completion;

use super::llm::LlmProvider;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    n: u32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// First choice's content; no choices or blank content is a failure
    fn into_completion(self) -> Result<Completion> {
        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::generation("Completion response contained no choices"))?;

        match choice.message.content {
            Some(text) if !text.trim().is_empty() => Ok(Completion { text }),
            _ => Err(Error::generation("First completion choice has no content")),
        }
    }
}

/// OpenAI-compatible answer generator
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    /// Create a new generator from config
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            tracing::warn!("No API key configured for {}; requests will be unauthenticated", config.base_url);
        }

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiGenerator {
    async fn generate(&self, prompt: &str, model: &str) -> Result<Completion> {
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            n: 1,
            stream: false,
        };

        tracing::debug!("Requesting completion from model: {}", model);

        let response = self
            .authorize(self.client.post(self.endpoint()))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::generation(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::generation(format!(
                "Completion failed: HTTP {} - {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::generation(format!("Failed to parse completion response: {}", e)))?;

        chat_response.into_completion()
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.base_url);

        match self.authorize(self.client.get(&url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<Completion> {
        serde_json::from_str::<ChatResponse>(body)
            .map_err(Error::from)?
            .into_completion()
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(ChatRequest {
            model: "gpt-4",
            messages: vec![ChatMessage {
                role: "user",
                content: "Answer the user's query",
            }],
            n: 1,
            stream: false,
        })
        .unwrap();

        assert_eq!(body["model"], "gpt-4");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Answer the user's query");
        assert_eq!(body["n"], 1);
    }

    #[test]
    fn test_first_choice_is_returned() {
        let completion = parse(
            r#"{"choices":[
                {"index":0,"message":{"role":"assistant","content":"Visit Chitkul."}},
                {"index":1,"message":{"role":"assistant","content":"Ignored."}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(completion.text, "Visit Chitkul.");
    }

    #[test]
    fn test_zero_choices_is_a_generation_error() {
        assert!(matches!(parse(r#"{"choices":[]}"#), Err(Error::Generation(_))));
        assert!(matches!(parse(r#"{"id":"x"}"#), Err(Error::Generation(_))));
    }

    #[test]
    fn test_null_content_is_a_generation_error() {
        let result = parse(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#);
        assert!(matches!(result, Err(Error::Generation(_))));
    }

    #[test]
    fn test_endpoint() {
        let config = LlmConfig {
            base_url: "https://api.openai.com/v1/".to_string(),
            ..LlmConfig::default()
        };
        let generator = OpenAiGenerator::new(&config).unwrap();
        assert_eq!(generator.endpoint(), "https://api.openai.com/v1/chat/completions");
    }
}
