use rocket::serde::json::Json;
use rocket::{post, State};

use super::AuthUser;
use crate::config::Config;
use crate::db::Db;
use crate::errors::AppError;
use crate::ingest;
use crate::models::ZoomImportRequest;
use crate::providers::{select_extractor, select_transcriber};

/// Cloud recording import: download the provider's recording, then run it through the
/// same transcribe/extract path as a direct upload. Returns 501 when no cloud credentials
/// are configured, per §6.
#[post("/zoom/import", data = "<body>")]
pub async fn zoom_import(
    db: &State<Db>,
    config: &State<Config>,
    user: AuthUser,
    body: Json<ZoomImportRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !crate::usage::meeting_quota_ok(db, &user.0.id, &user.0.plan) {
        return Err(AppError::PlanLimitReached {
            code: "meeting_limit",
            message: "Free plan is limited to 3 saved meetings. Upgrade to save more."
                .to_string(),
            used: db.count_meetings_owned(&user.0.id),
            max: Some(3),
        });
    }

    let temp_path = ingest::import_cloud_recording(config, &user.0, &body.recording_id).await?;

    let transcription = select_transcriber(config)?;
    let extraction = select_extractor(config)?;

    let meeting = ingest::transcribe_and_extract(
        db,
        transcription.as_ref(),
        extraction.as_ref(),
        &user.0.id,
        body.topic.as_deref(),
        &temp_path,
        "m4a",
    )
    .await?;

    Ok(Json(serde_json::json!({
        "id": meeting.id,
        "title": meeting.title,
        "transcript": meeting.raw_notes,
    })))
}
