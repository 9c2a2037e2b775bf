//! Elasticsearch similarity search provider
//!
//! Ranks every document in the index with a `script_score` query over
//! `match_all`, using `cosineSimilarity(query, doc) + 1.0`. Documents must
//! carry a precomputed dense vector under `vector_field`.

use async_trait::async_trait;
use base64::{
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
    Engine as _,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::types::RetrievedPassage;

use super::vector_store::SearchProvider;

/// Elasticsearch / Elastic Cloud store
pub struct ElasticsearchStore {
    client: Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    text_field: String,
    vector_field: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Deserialize)]
struct Hits {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Deserialize)]
struct Hit {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "_score", default)]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: Option<serde_json::Map<String, Value>>,
}

/// Resolve an Elastic Cloud id (`name:base64(host$es_uuid$kibana_uuid)`)
/// to the deployment's Elasticsearch URL
pub fn decode_cloud_id(cloud_id: &str) -> Result<String> {
    let encoded = cloud_id
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(cloud_id);

    let bytes = STANDARD
        .decode(encoded)
        .or_else(|_| STANDARD_NO_PAD.decode(encoded.trim_end_matches('=')))
        .map_err(|e| Error::config(format!("Invalid cloud id encoding: {}", e)))?;
    let decoded = String::from_utf8(bytes)
        .map_err(|e| Error::config(format!("Invalid cloud id encoding: {}", e)))?;

    let mut parts = decoded.split('$');
    let host = parts.next().filter(|h| !h.is_empty());
    let es_uuid = parts.next().filter(|u| !u.is_empty());

    match (host, es_uuid) {
        (Some(host), Some(es_uuid)) => Ok(format!("https://{}.{}", es_uuid, host)),
        _ => Err(Error::config(
            "Cloud id must decode to 'host$es_uuid[$kibana_uuid]'",
        )),
    }
}

impl ElasticsearchStore {
    /// Create a store from config; `url` wins over `cloud_id`
    pub fn new(config: &SearchConfig) -> Result<Self> {
        let base_url = match (&config.url, &config.cloud_id) {
            (Some(url), _) => url.clone(),
            (None, Some(cloud_id)) => decode_cloud_id(cloud_id)?,
            (None, None) => {
                return Err(Error::config(
                    "Elasticsearch needs either a url or a cloud id",
                ))
            }
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            text_field: config.text_field.clone(),
            vector_field: config.vector_field.clone(),
        })
    }

    /// Resolved Elasticsearch URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }

    /// `_search` body ranking all documents by cosine similarity + 1.0
    fn search_body(&self, query_vector: &[f32], top_k: usize) -> Value {
        json!({
            "size": top_k,
            "_source": [self.text_field],
            "query": {
                "script_score": {
                    "query": { "match_all": {} },
                    "script": {
                        "source": format!(
                            "cosineSimilarity(params.query_vector, '{}') + 1.0",
                            self.vector_field
                        ),
                        "params": { "query_vector": query_vector }
                    }
                }
            }
        })
    }

    /// Pull the text field out of each hit, preserving hit order
    fn passages_from(&self, response: SearchResponse) -> Result<Vec<RetrievedPassage>> {
        response
            .hits
            .hits
            .into_iter()
            .map(|hit| {
                let text = hit
                    .source
                    .as_ref()
                    .and_then(|source| source.get(&self.text_field))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        Error::retrieval(format!(
                            "Document {} has no '{}' text field",
                            hit.id.as_deref().unwrap_or("<unknown>"),
                            self.text_field
                        ))
                    })?;

                Ok(RetrievedPassage::new(text, hit.score.unwrap_or(0.0)))
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for ElasticsearchStore {
    async fn search(
        &self,
        index: &str,
        query_vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedPassage>> {
        let url = format!("{}/{}/_search", self.base_url, index);
        let body = self.search_body(query_vector, top_k);

        let response = self
            .authorize(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("Elasticsearch request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND || body.contains("index_not_found_exception") {
                return Err(Error::retrieval(format!("Index '{}' does not exist", index)));
            }
            return Err(Error::retrieval(format!(
                "Elasticsearch search failed ({}): {}",
                status, body
            )));
        }

        let search_response: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::retrieval(format!("Failed to parse Elasticsearch response: {}", e)))?;

        self.passages_from(search_response)
    }

    async fn health_check(&self) -> Result<bool> {
        match self.authorize(self.client.get(&self.base_url)).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "elasticsearch"
    }
}
