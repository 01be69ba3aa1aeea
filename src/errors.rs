use rocket::http::Status;
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;

/// Grounded on the teacher's `RateLimitedError` Responder in `rate_limit.rs`: builds a
/// `Json` error body, sets status, nothing fancier. Every variant carries both a stable
/// machine `error` code and a human `message`, per the error-kind table.
///
/// `PlanLimitReached`'s status depends on its `code`: `limit_reached` (the extract quota)
/// maps to 429, `meeting_limit` (the storage cap) maps to 403 -- see `status()`.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Unauthenticated(String),
    Forbidden(String),
    NotFound(String),
    SessionActive(String),
    RateLimited(String),
    PlanLimitReached {
        code: &'static str,
        message: String,
        used: i64,
        max: Option<i64>,
    },
    Upstream(String),
    Decode(String),
    Storage(String),
    NotConfigured(String),
}

impl AppError {
    fn status(&self) -> Status {
        match self {
            AppError::Validation(_) => Status::BadRequest,
            AppError::Unauthenticated(_) => Status::Unauthorized,
            AppError::Forbidden(_) => Status::Forbidden,
            AppError::NotFound(_) => Status::NotFound,
            AppError::SessionActive(_) => Status::Conflict,
            AppError::RateLimited(_) => Status::TooManyRequests,
            AppError::PlanLimitReached { code, .. } if *code == "limit_reached" => {
                Status::TooManyRequests
            }
            AppError::PlanLimitReached { .. } => Status::Forbidden,
            AppError::Upstream(_) => Status::InternalServerError,
            AppError::Decode(_) => Status::InternalServerError,
            AppError::Storage(_) => Status::InternalServerError,
            AppError::NotConfigured(_) => Status::NotImplemented,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation_error",
            AppError::Unauthenticated(_) => "unauthenticated",
            AppError::Forbidden(_) => "forbidden",
            AppError::NotFound(_) => "not_found",
            AppError::SessionActive(_) => "session_active",
            AppError::RateLimited(_) => "rate_limited",
            AppError::PlanLimitReached { code, .. } => code,
            AppError::Upstream(_) => "upstream_error",
            AppError::Decode(_) => "decode_error",
            AppError::Storage(_) => "storage_error",
            AppError::NotConfigured(_) => "not_configured",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Validation(m)
            | AppError::Unauthenticated(m)
            | AppError::Forbidden(m)
            | AppError::NotFound(m)
            | AppError::SessionActive(m)
            | AppError::RateLimited(m)
            | AppError::Upstream(m)
            | AppError::Decode(m)
            | AppError::Storage(m)
            | AppError::NotConfigured(m) => m.clone(),
            AppError::PlanLimitReached { message, .. } => message.clone(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for AppError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let code = self.code();
        let body = match &self {
            AppError::SessionActive(session_id) => Json(serde_json::json!({
                "error": code,
                "message": self.message(),
                "session_id": session_id,
            })),
            AppError::PlanLimitReached { used, max, .. } => Json(serde_json::json!({
                "error": code,
                "message": self.message(),
                "used": used,
                "max": max,
            })),
            _ => Json(serde_json::json!({ "error": code, "message": self.message() })),
        };
        Response::build_from(body.respond_to(req)?)
            .status(status)
            .ok()
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Storage(format!("storage error: {e}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(format!("upstream request failed: {e}"))
    }
}
