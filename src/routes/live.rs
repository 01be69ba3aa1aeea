use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::response::status::Created;
use rocket::response::stream::{Event, EventStream};
use rocket::serde::json::Json;
use rocket::{get, post, State};
use tokio::io::AsyncReadExt;
use tokio::time::{interval, Duration};

use super::AuthUser;
use crate::config::Config;
use crate::db::Db;
use crate::errors::AppError;
use crate::events::{EventBus, LiveEvent};
use crate::live_session::{self, MockChunkCounters};
use crate::models::{MemoryHintsResponse, SessionStatus, StartLiveSession};
use crate::providers::{select_extractor, select_transcriber};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

#[post("/live/start", data = "<body>")]
pub fn live_start(
    db: &State<Db>,
    counters: &State<MockChunkCounters>,
    user: AuthUser,
    body: Json<StartLiveSession>,
) -> Result<Created<Json<serde_json::Value>>, AppError> {
    let session = live_session::start(
        db,
        counters,
        &user.0.id,
        body.title.as_deref(),
        body.participants.as_deref(),
    )?;

    let location = format!("/live/{}/status", session.id);
    Ok(Created::new(location).body(Json(serde_json::json!({
        "session_id": session.id,
        "title": session.title,
    }))))
}

/// `EventStream!` replay-then-subscribe loop, grounded on `routes/stream.rs`: a
/// `connected` event, replay of segments already persisted, then live pushes filtered to
/// this session id with a 15s keepalive. Ownership is verified once, up front; a caller
/// who supplies a session id they don't own gets a stream that emits nothing and closes
/// immediately -- per I-OwnerOnly, existence is never disclosed, and unowned sessions
/// never enter the subscribe loop that would otherwise leak their segments.
#[get("/live/<id>/stream")]
pub fn live_stream(db: &State<Db>, events: &State<EventBus>, user: AuthUser, id: &str) -> EventStream![] {
    let session_id = id.to_string();
    let owner = user.0.id.clone();
    let mut rx = events.sender.subscribe();

    let segments = db
        .get_live_session_owned(&session_id, &owner)
        .map(|_| db.list_segments_ordered(&session_id));

    EventStream! {
        if let Some(segments) = segments {
            yield Event::json(&serde_json::json!({"session_id": session_id})).event("connected");

            for segment in segments {
                yield Event::json(&segment).event("data");
            }

            let mut heartbeat = interval(Duration::from_secs(15));

            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        match msg {
                            Ok(LiveEvent::Segment { live_session_id, segment }) if live_session_id == session_id => {
                                yield Event::json(&segment).event("data");
                            }
                            Ok(LiveEvent::StatusChanged { live_session_id, status }) if live_session_id == session_id => {
                                if status == SessionStatus::Completed || status == SessionStatus::Failed {
                                    yield Event::json(&serde_json::json!({"status": status.as_str()})).event("stopped");
                                    break;
                                }
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                            _ => {}
                        }
                    }
                    _ = heartbeat.tick() => {
                        let now = chrono::Utc::now().to_rfc3339();
                        yield Event::json(&serde_json::json!({"time": now})).event("heartbeat");
                    }
                }
            }
        }
    }
}

#[derive(rocket::FromForm)]
pub struct ChunkForm<'r> {
    pub audio: TempFile<'r>,
    pub timestamp_ms: i64,
}

/// Per-chunk transcription failures are isolated: they are reported only to the uploader
/// and never mark the session failed or terminate it, per the propagation policy.
#[post("/live/<id>/chunk", data = "<form>")]
pub async fn live_chunk(
    db: &State<Db>,
    events: &State<EventBus>,
    counters: &State<MockChunkCounters>,
    config: &State<Config>,
    limiter: &State<RateLimiter>,
    limits: &State<RateLimitConfig>,
    ip: super::ClientIp,
    user: AuthUser,
    id: &str,
    mut form: Form<ChunkForm<'_>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let info = limiter.check_with_info(
        &format!("chunk:{}", ip.0),
        limits.chunk_max,
        limits.chunk_window_secs,
    );
    if !info.allowed {
        return Err(AppError::RateLimited("too many chunks, slow down".to_string()));
    }

    let session = db
        .get_live_session_owned(id, &user.0.id)
        .ok_or_else(|| AppError::NotFound("live session not found".to_string()))?;

    if session.status != SessionStatus::Active.as_str() {
        return Err(AppError::Validation("session is not active".to_string()));
    }

    let mut buf = Vec::new();
    form.audio
        .open()
        .await
        .map_err(|e| AppError::Storage(format!("failed to read chunk: {e}")))?
        .read_to_end(&mut buf)
        .await
        .map_err(|e| AppError::Storage(format!("failed to read chunk: {e}")))?;

    let format_hint = form
        .audio
        .raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().to_string())
        .and_then(|name| {
            std::path::Path::new(&name)
                .extension()
                .map(|e| e.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| "webm".to_string());

    let provider = select_transcriber(config)?;
    let segment = live_session::ingest_chunk(
        db,
        events,
        counters,
        provider.as_ref(),
        &session,
        &buf,
        &format_hint,
    )
    .await?;

    match segment {
        Some(seg) => Ok(Json(serde_json::json!({
            "ok": true,
            "segment_index": seg.segment_index,
        }))),
        None => Ok(Json(serde_json::json!({
            "ok": true,
            "segment_index": null,
            "silent": true,
        }))),
    }
}

#[post("/live/<id>/stop")]
pub async fn live_stop(
    db: &State<Db>,
    events: &State<EventBus>,
    config: &State<Config>,
    user: AuthUser,
    id: &str,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = db
        .get_live_session_owned(id, &user.0.id)
        .ok_or_else(|| AppError::NotFound("live session not found".to_string()))?;

    if session.status != SessionStatus::Active.as_str() {
        return Err(AppError::Validation("session is not active".to_string()));
    }

    let provider = select_extractor(config)?;
    let outcome = live_session::stop(db, events, provider.as_ref(), &session).await?;

    match outcome {
        live_session::StopOutcome::Completed(meeting) => Ok(Json(serde_json::json!({
            "meeting_id": meeting.id,
            "title": meeting.title,
        }))),
        live_session::StopOutcome::Failed => Ok(Json(serde_json::json!({
            "meeting_id": null,
            "title": null,
            "message": "No transcript was captured.",
        }))),
    }
}

#[get("/live/<id>/status")]
pub fn live_status(db: &State<Db>, user: AuthUser, id: &str) -> Result<Json<serde_json::Value>, AppError> {
    let session = live_session::status(db, id, &user.0.id)?;
    let segment_count = db.list_segments_ordered(&session.id).len();

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "status": session.status,
        "title": session.title,
        "started_at": session.started_at,
        "ended_at": session.ended_at,
        "meeting_id": session.meeting_id,
        "segment_count": segment_count,
    })))
}

#[post("/live/<id>/memory-hints")]
pub fn live_memory_hints(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
) -> Result<Json<MemoryHintsResponse>, AppError> {
    let session = live_session::status(db, id, &user.0.id)?;
    Ok(Json(live_session::memory_hints(db, &session)))
}
