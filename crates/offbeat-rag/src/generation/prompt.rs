//! Prompt template for the travel advisor

/// Prompt builder for travel queries
///
/// Pure string construction: the same passages and query always produce the
/// same prompt.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join passage texts in retrieval order, one per line
    pub fn build_context(context_texts: &[String]) -> String {
        context_texts.join("\n")
    }

    /// Build the grounding prompt
    ///
    /// The context block is the newline-joined passages verbatim; with no
    /// passages it is empty and the generator answers without grounding.
    pub fn build_prompt(context_texts: &[String], query: &str) -> String {
        format!(
            r#"You are a travel advisor specializing in offbeat Indian destinations.
Given the descriptions below:

{context}

Answer the user's query: "{query}"
"#,
            context = Self::build_context(context_texts),
            query = query
        )
    }
}
