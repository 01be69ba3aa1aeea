use super::ProviderError;
use async_trait::async_trait;

/// Grounded on the teacher's `webhooks.rs` dispatcher: owns its own `reqwest::Client`,
/// fire-and-forget-shaped outbound calls. `async_trait` is pulled in because trait
/// objects can't hold `async fn` directly.
#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// `mock_index` is the caller's session-local chunk counter, consulted only by the
    /// mock implementation; real providers ignore it.
    async fn transcribe(
        &self,
        audio_bytes: &[u8],
        format_hint: &str,
        mock_index: usize,
    ) -> Result<String, ProviderError>;
}

const MOCK_CYCLE: &[&str] = &["A", "B", "C"];

pub struct MockTranscriptionProvider;

#[async_trait]
impl TranscriptionProvider for MockTranscriptionProvider {
    async fn transcribe(
        &self,
        _audio_bytes: &[u8],
        _format_hint: &str,
        mock_index: usize,
    ) -> Result<String, ProviderError> {
        Ok(MOCK_CYCLE[mock_index % MOCK_CYCLE.len()].to_string())
    }
}

pub struct HttpTranscriptionProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
}

impl HttpTranscriptionProvider {
    pub fn new(api_key: String, api_url: Option<String>) -> Self {
        HttpTranscriptionProvider {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(180))
                .build()
                .expect("failed to build transcription HTTP client"),
            api_key,
            api_url: api_url.unwrap_or_else(|| "https://api.openai.com/v1/audio/transcriptions".to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionProvider for HttpTranscriptionProvider {
    async fn transcribe(
        &self,
        audio_bytes: &[u8],
        format_hint: &str,
        _mock_index: usize,
    ) -> Result<String, ProviderError> {
        let filename = format!("chunk.{format_hint}");
        let part = reqwest::multipart::Part::bytes(audio_bytes.to_vec()).file_name(filename);
        let form = reqwest::multipart::Form::new()
            .text("model", "whisper-1")
            .part("file", part);

        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError(format!(
                "transcription provider returned {}",
                resp.status()
            )));
        }

        let body: serde_json::Value = resp.json().await?;
        Ok(body
            .get("text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
