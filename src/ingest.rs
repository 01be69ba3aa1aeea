//! File-based and cloud-recording meeting ingest. Grounded on the teacher's
//! `routes/files.rs` upload/cleanup shape (validate -> persist -> guaranteed cleanup on
//! every exit path) and `webhooks.rs`'s reqwest client ownership for the cloud-provider
//! calls.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::Db;
use crate::decode;
use crate::errors::AppError;
use crate::models::{ExtractionRecord, Meeting, User};
use crate::providers::{ExtractorProvider, TranscriptionProvider};

const ALLOWED_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "webm"];
const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub fn validate_upload(filename: &str, size_bytes: u64) -> Result<(), AppError> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::Validation(format!(
            "unsupported audio format .{ext}; expected one of {ALLOWED_EXTENSIONS:?}"
        )));
    }

    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "audio file exceeds the 100MB upload limit".to_string(),
        ));
    }

    Ok(())
}

/// Transcribes a persisted audio file and runs it through the extractor, producing a
/// finished meeting record. `temp_path` is removed on every exit path, success or error.
pub async fn transcribe_and_extract(
    db: &Db,
    transcription: &dyn TranscriptionProvider,
    extractor: &dyn ExtractorProvider,
    owner: &str,
    title: Option<&str>,
    temp_path: &Path,
    format_hint: &str,
) -> Result<Meeting, AppError> {
    let result = do_transcribe_and_extract(
        db,
        transcription,
        extractor,
        owner,
        title,
        temp_path,
        format_hint,
    )
    .await;

    let _ = std::fs::remove_file(temp_path);
    result
}

async fn do_transcribe_and_extract(
    db: &Db,
    transcription: &dyn TranscriptionProvider,
    extractor: &dyn ExtractorProvider,
    owner: &str,
    title: Option<&str>,
    temp_path: &Path,
    format_hint: &str,
) -> Result<Meeting, AppError> {
    let audio_bytes = std::fs::read(temp_path)
        .map_err(|e| AppError::Storage(format!("failed to read uploaded audio: {e}")))?;

    let transcript = transcription
        .transcribe(&audio_bytes, format_hint, 0)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let extraction = if transcript.trim().is_empty() {
        ExtractionRecord::default()
    } else {
        match extractor.extract(&transcript).await {
            Ok(raw) => decode::decode(&raw)
                .ok()
                .and_then(|v| serde_json::from_value::<ExtractionRecord>(v).ok())
                .unwrap_or_default(),
            Err(_) => ExtractionRecord::default(),
        }
    };

    db.create_meeting(owner, title, &transcript, &extraction)
        .map_err(AppError::from)
}

/// Refreshes a cached cloud access token if expired, pulls recording metadata, downloads
/// the recording to a temp file, then hands off to the same transcribe/extract path as a
/// direct upload.
pub async fn import_cloud_recording(
    config: &Config,
    user: &User,
    recording_id: &str,
) -> Result<PathBuf, AppError> {
    let (client_id, client_secret) = match (&config.zoom_client_id, &config.zoom_client_secret) {
        (Some(id), Some(secret)) => (id, secret),
        _ => {
            return Err(AppError::NotConfigured(
                "cloud import is not configured on this server".to_string(),
            ));
        }
    };

    let access_token = ensure_fresh_token(client_id, client_secret, user).await?;

    let client = reqwest::Client::new();
    let metadata: serde_json::Value = client
        .get(format!(
            "https://api.zoom.us/v2/meetings/recordings/{recording_id}"
        ))
        .bearer_auth(&access_token)
        .send()
        .await
        .map_err(AppError::from)?
        .json()
        .await
        .map_err(AppError::from)?;

    let download_url = metadata
        .get("download_url")
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::Upstream("cloud recording has no download_url".to_string()))?;

    let bytes = client
        .get(download_url)
        .bearer_auth(&access_token)
        .send()
        .await
        .map_err(AppError::from)?
        .bytes()
        .await
        .map_err(AppError::from)?;

    let temp_path = std::env::temp_dir().join(format!("{}.m4a", crate::db::new_id()));
    std::fs::write(&temp_path, &bytes)
        .map_err(|e| AppError::Storage(format!("failed to persist cloud recording: {e}")))?;

    Ok(temp_path)
}

/// If the cached token is missing or expired, swaps the refresh token for a fresh one.
/// A real deployment would persist the refreshed pair back onto the user row; that
/// write-back belongs to the caller, which holds the `Db` handle this module doesn't.
async fn ensure_fresh_token(
    client_id: &str,
    client_secret: &str,
    user: &User,
) -> Result<String, AppError> {
    let expired = user
        .cloud_token_expires_at
        .as_deref()
        .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
        .map(|expires| expires < chrono::Utc::now())
        .unwrap_or(true);

    if !expired {
        if let Some(token) = &user.cloud_access_token {
            return Ok(token.clone());
        }
    }

    let refresh_token = user
        .cloud_refresh_token
        .as_deref()
        .ok_or_else(|| AppError::Unauthenticated("no cloud refresh token on file".to_string()))?;

    let client = reqwest::Client::new();
    let resp: serde_json::Value = client
        .post("https://zoom.us/oauth/token")
        .basic_auth(client_id, Some(client_secret))
        .query(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .send()
        .await
        .map_err(AppError::from)?
        .json()
        .await
        .map_err(AppError::from)?;

    resp.get("access_token")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Upstream("cloud token refresh returned no access_token".to_string()))
}
