pub mod extraction;
pub mod transcription;

pub use extraction::{ExtractorProvider, HttpExtractorProvider, MockExtractorProvider};
pub use transcription::{MockTranscriptionProvider, HttpTranscriptionProvider, TranscriptionProvider};

use crate::config::Config;
use crate::errors::AppError;

/// MOCK_MODE forces both providers to mock implementations regardless of key presence.
/// Otherwise, a configured key selects the real HTTP-backed provider; an absent key means
/// the provider is simply not configured on this deployment, surfaced as `AppError::NotConfigured`
/// (501) per §6's config table. It deliberately does NOT fall back to mock in that case --
/// silently mocking a production server with a missing key would hide a misconfiguration
/// behind what looks like a working response.
pub fn select_extractor(config: &Config) -> Result<Box<dyn ExtractorProvider>, AppError> {
    if config.mock_mode {
        return Ok(Box::new(MockExtractorProvider));
    }
    match &config.extract_api_key {
        Some(key) => Ok(Box::new(HttpExtractorProvider::new(
            key.clone(),
            config.extraction_api_url.clone(),
        ))),
        None => Err(AppError::NotConfigured(
            "extraction provider is not configured on this server".to_string(),
        )),
    }
}

pub fn select_transcriber(config: &Config) -> Result<Box<dyn TranscriptionProvider>, AppError> {
    if config.mock_mode {
        return Ok(Box::new(MockTranscriptionProvider));
    }
    match &config.transcribe_api_key {
        Some(key) => Ok(Box::new(HttpTranscriptionProvider::new(
            key.clone(),
            config.transcription_api_url.clone(),
        ))),
        None => Err(AppError::NotConfigured(
            "transcription provider is not configured on this server".to_string(),
        )),
    }
}

#[derive(Debug)]
pub struct ProviderError(pub String);

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError(e.to_string())
    }
}
