use super::ProviderError;
use async_trait::async_trait;

/// Fixed prompt prefix: pins the JSON schema, defaults for missing fields, and forbids
/// markdown fences. The caller never trusts that the model obeyed this — output is
/// always re-validated by `crate::decode`.
pub const EXTRACTION_PROMPT_PREFIX: &str = r#"You extract structured meeting notes from a transcript. \
Respond with a single JSON object only, no markdown fences, matching exactly this schema: \
{"action_items": [{"task": string, "owner": string, "deadline": string}], \
"follow_up_email": string, "summary": string, "open_questions": [string], "proposed_solutions": [string]}. \
Use empty string/array defaults for any field you cannot determine. Transcript follows:\n\n"#;

#[async_trait]
pub trait ExtractorProvider: Send + Sync {
    async fn extract(&self, transcript: &str) -> Result<String, ProviderError>;
}

pub struct MockExtractorProvider;

#[async_trait]
impl ExtractorProvider for MockExtractorProvider {
    async fn extract(&self, transcript: &str) -> Result<String, ProviderError> {
        let first_line = transcript.lines().next().unwrap_or("").trim();
        let summary = if first_line.is_empty() {
            "Meeting notes captured.".to_string()
        } else {
            first_line.to_string()
        };
        let payload = serde_json::json!({
            "action_items": [{"task": "Follow up on open items", "owner": "", "deadline": ""}],
            "follow_up_email": format!("Thanks for joining. Summary: {summary}"),
            "summary": summary,
            "open_questions": [],
            "proposed_solutions": [],
        });
        Ok(payload.to_string())
    }
}

pub struct HttpExtractorProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl HttpExtractorProvider {
    pub fn new(api_key: String, api_url: Option<String>) -> Self {
        HttpExtractorProvider {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("failed to build extraction HTTP client"),
            api_key,
            api_url: api_url.unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string()),
        }
    }
}

#[async_trait]
impl ExtractorProvider for HttpExtractorProvider {
    async fn extract(&self, transcript: &str) -> Result<String, ProviderError> {
        let prompt = format!("{EXTRACTION_PROMPT_PREFIX}{transcript}");
        let body = serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 1500,
            "messages": [{"role": "user", "content": prompt}],
        });

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError(format!(
                "extraction provider returned {}",
                resp.status()
            )));
        }

        let parsed: serde_json::Value = resp.json().await?;
        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .to_string();
        Ok(content)
    }
}
