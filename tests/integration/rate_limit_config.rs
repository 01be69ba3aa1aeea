use rocket::http::{ContentType, Status};

use crate::common::test_client_with_rate_limits;
use scribe_server::rate_limit::RateLimitConfig;

/// A configured extract cap of 1 per window lets the first call through and rejects the
/// second with 429 plus the standard rate-limit headers.
#[test]
fn extract_calls_beyond_configured_max_are_rate_limited() {
    let config = RateLimitConfig {
        chunk_max: 120,
        chunk_window_secs: 60,
        upload_max: 10,
        upload_window_secs: 60,
        extract_max: 1,
        extract_window_secs: 60,
    };
    let client = test_client_with_rate_limits(config);
    let (_, cookie) = client.sign_up("rate-limited@example.com", "free");

    let first = client
        .post("/meetings/extract")
        .cookie(cookie.clone())
        .header(ContentType::JSON)
        .body(r#"{"notes": "Sarah: ship the redesign by Friday."}"#)
        .dispatch();
    assert_eq!(first.status(), Status::Ok);

    let second = client
        .post("/meetings/extract")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(r#"{"notes": "Sarah: ship the redesign by Friday."}"#)
        .dispatch();
    assert_eq!(second.status(), Status::TooManyRequests);
    let body: serde_json::Value = second.into_json().unwrap();
    assert_eq!(body["error"], "rate_limited");
}
