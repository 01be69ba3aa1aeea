use rocket::serde::json::Json;
use rocket::{get, patch, State};

use super::AuthUser;
use crate::db::Db;
use crate::errors::AppError;
use crate::models::{ResolveTrackedIssue, TrackedIssue};

/// Minimal HTTP surface over `TrackedIssue` so the unresolved-items insight can be
/// durably actioned. Not separately load-bearing for the core subsystems.
#[get("/tracked-issues")]
pub fn list_tracked_issues(db: &State<Db>, user: AuthUser) -> Json<Vec<TrackedIssue>> {
    Json(db.list_tracked_issues_owned(&user.0.id))
}

#[patch("/tracked-issues/<id>/resolve", data = "<body>")]
pub fn resolve_tracked_issue(
    db: &State<Db>,
    user: AuthUser,
    id: &str,
    body: Json<ResolveTrackedIssue>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ok = db.toggle_tracked_issue_resolved_owned(id, &user.0.id, body.resolved);
    if !ok {
        return Err(AppError::NotFound("tracked issue not found".to_string()));
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
