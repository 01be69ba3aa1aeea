use rocket::data::{Limits, ToByteUnit};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::{delete, get, patch, post, State};

use super::AuthUser;
use crate::config::Config;
use crate::db::Db;
use crate::errors::AppError;
use crate::ingest;
use crate::insights;
use crate::models::{
    CreateMeeting, ExtractRequest, ExtractionRecord, InsightsResponse, Meeting, UpdateExtraction,
    UpdateTranscript, WhatChanged,
};
use crate::providers::{select_extractor, select_transcriber};
use crate::rate_limit::{RateLimitConfig, RateLimiter};
use crate::usage;

#[derive(rocket::FromForm)]
pub struct UploadForm<'r> {
    pub audio: TempFile<'r>,
    pub title: Option<&'r str>,
}

#[post("/meetings/upload", data = "<form>")]
pub async fn upload_meeting(
    db: &State<Db>,
    config: &State<Config>,
    limiter: &State<RateLimiter>,
    limits: &State<RateLimitConfig>,
    ip: super::ClientIp,
    user: AuthUser,
    mut form: Form<UploadForm<'_>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let info = limiter.check_with_info(
        &format!("upload:{}", ip.0),
        limits.upload_max,
        limits.upload_window_secs,
    );
    if !info.allowed {
        return Err(AppError::RateLimited("too many uploads, slow down".to_string()));
    }

    if !usage::meeting_quota_ok(db, &user.0.id, &user.0.plan) {
        return Err(AppError::PlanLimitReached {
            code: "meeting_limit",
            message: "Free plan is limited to 3 saved meetings. Upgrade to save more."
                .to_string(),
            used: db.count_meetings_owned(&user.0.id),
            max: Some(3),
        });
    }

    let filename = form
        .audio
        .raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().to_string())
        .unwrap_or_else(|| "upload.webm".to_string());
    let size = form.audio.len();

    ingest::validate_upload(&filename, size)?;

    let temp_path = std::env::temp_dir().join(format!("{}-{}", crate::db::new_id(), filename));
    form.audio
        .persist_to(&temp_path)
        .await
        .map_err(|e| AppError::Storage(format!("failed to persist upload: {e}")))?;

    let format_hint = std::path::Path::new(&filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("webm")
        .to_string();

    let transcription = select_transcriber(config)?;
    let extraction = select_extractor(config)?;

    let meeting = ingest::transcribe_and_extract(
        db,
        transcription.as_ref(),
        extraction.as_ref(),
        &user.0.id,
        form.title,
        &temp_path,
        &format_hint,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "id": meeting.id,
        "title": meeting.title,
        "transcript": meeting.raw_notes,
    })))
}

#[post("/meetings/extract", data = "<body>")]
pub async fn extract_notes(
    db: &State<Db>,
    config: &State<Config>,
    limiter: &State<RateLimiter>,
    limits: &State<RateLimitConfig>,
    ip: super::ClientIp,
    user: AuthUser,
    body: Json<ExtractRequest>,
) -> Result<Json<ExtractionRecord>, AppError> {
    let info = limiter.check_with_info(
        &format!("extract:{}", ip.0),
        limits.extract_max,
        limits.extract_window_secs,
    );
    if !info.allowed {
        return Err(AppError::RateLimited("too many extract calls, slow down".to_string()));
    }

    let status = usage::check(db, &user.0.id, &user.0.plan);
    if !status.allowed {
        return Err(AppError::PlanLimitReached {
            code: "limit_reached",
            message: status.message.unwrap_or_default(),
            used: status.used,
            max: status.max,
        });
    }

    let provider = select_extractor(config)?;
    let record = if body.notes.trim().is_empty() {
        ExtractionRecord::default()
    } else {
        match provider.extract(&body.notes).await {
            Ok(raw) => crate::decode::decode(&raw)
                .ok()
                .and_then(|v| serde_json::from_value::<ExtractionRecord>(v).ok())
                .ok_or_else(|| {
                    AppError::Decode("failed to parse AI response".to_string())
                })?,
            Err(e) => return Err(AppError::Upstream(e.to_string())),
        }
    };

    usage::consume(db, &user.0.id);
    Ok(Json(record))
}

#[post("/meetings", data = "<body>")]
pub fn create_meeting(
    db: &State<Db>,
    user: AuthUser,
    body: Json<CreateMeeting>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !usage::meeting_quota_ok(db, &user.0.id, &user.0.plan) {
        return Err(AppError::PlanLimitReached {
            code: "meeting_limit",
            message: "Free plan is limited to 3 saved meetings. Upgrade to save more."
                .to_string(),
            used: db.count_meetings_owned(&user.0.id),
            max: Some(3),
        });
    }

    let meeting = db
        .create_meeting(
            &user.0.id,
            body.title.as_deref(),
            &body.raw_notes,
            &body.action_items,
        )
        .map_err(AppError::from)?;

    Ok(Json(serde_json::json!({ "id": meeting.id })))
}

#[get("/meetings")]
pub fn list_meetings(db: &State<Db>, user: AuthUser) -> Json<Vec<Meeting>> {
    Json(db.list_meetings_owned(&user.0.id))
}

#[get("/meetings/<id>")]
pub fn get_meeting(db: &State<Db>, user: AuthUser, id: &str) -> Result<Json<Meeting>, AppError> {
    db.get_meeting_owned(id, &user.0.id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("meeting not found".to_string()))
}

#[patch("/meetings/<id>/transcript", data = "<body>")]
pub fn update_meeting_transcript(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
    body: Json<UpdateTranscript>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !db.update_meeting_transcript(id, &user.0.id, &body.transcript) {
        return Err(AppError::NotFound("meeting not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[patch("/meetings/<id>/extraction", data = "<body>")]
pub fn update_meeting_extraction(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
    body: Json<UpdateExtraction>,
) -> Result<Json<serde_json::Value>, AppError> {
    let record = ExtractionRecord {
        action_items: body.action_items.clone(),
        follow_up_email: body.follow_up_email.clone(),
        summary: body.summary.clone(),
        open_questions: body.open_questions.clone(),
        proposed_solutions: body.proposed_solutions.clone(),
    };

    if !db.update_meeting_extraction(id, &user.0.id, &record) {
        return Err(AppError::NotFound("meeting not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[delete("/meetings/<id>")]
pub fn delete_meeting(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
) -> Result<Json<serde_json::Value>, AppError> {
    if !db.delete_meeting_owned(id, &user.0.id) {
        return Err(AppError::NotFound("meeting not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[get("/meetings/<id>/insights")]
pub fn get_meeting_insights(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
) -> Result<Json<InsightsResponse>, AppError> {
    let meeting = db
        .get_meeting_owned(id, &user.0.id)
        .ok_or_else(|| AppError::NotFound("meeting not found".to_string()))?;

    let prior = db.list_meetings_before_owned(&user.0.id, &meeting.created_at);
    let cards = insights::compute_cards(&meeting, &prior);
    insights::sync_tracked_issues(db, &user.0.id, &cards);

    let message = if cards.is_empty() {
        Some("Not enough meeting history yet to surface insights.".to_string())
    } else {
        None
    };

    Ok(Json(InsightsResponse {
        meeting_id: meeting.id,
        insights: cards,
        message,
    }))
}

#[get("/meetings/<id>/whatchanged")]
pub fn get_meeting_whatchanged(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
) -> Result<Json<WhatChanged>, AppError> {
    let meeting = db
        .get_meeting_owned(id, &user.0.id)
        .ok_or_else(|| AppError::NotFound("meeting not found".to_string()))?;

    Ok(Json(insights::what_changed(db, &meeting)))
}

/// Large enough for a single audio chunk upload under the 100MB file cap; Rocket's
/// default data limits are too small for audio multipart bodies.
#[allow(dead_code)]
pub fn upload_limits() -> Limits {
    Limits::default().limit("file", 100.mebibytes())
}
