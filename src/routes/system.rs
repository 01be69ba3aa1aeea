use rocket::serde::json::Json;
use rocket::{catch, get, State};

use crate::config::Config;

/// Grounded on the teacher's `health` route. `mock_mode` is surfaced because it changes
/// observable behavior (deterministic cycling transcripts, canned extraction) and a
/// caller diagnosing unexpected output needs to know it's on.
#[get("/health")]
pub fn health(config: &State<Config>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "mock_mode": config.mock_mode,
    }))
}

#[catch(429)]
pub fn too_many_requests() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "error": "rate_limited",
        "message": "Too many requests. Please slow down."
    }))
}

#[catch(404)]
pub fn not_found() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "error": "not_found",
        "message": "Resource not found"
    }))
}
