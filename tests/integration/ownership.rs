use rocket::http::{ContentType, Status};

use crate::common::test_client;

/// A meeting owned by one user is invisible to another -- 404, never 403, so existence
/// itself isn't disclosed to a caller who isn't the owner.
#[test]
fn foreign_meeting_is_not_found_not_forbidden() {
    let client = test_client();
    let (_, owner_cookie) = client.sign_up("meeting-owner@example.com", "free");
    let (_, other_cookie) = client.sign_up("meeting-intruder@example.com", "free");

    let create = client
        .post("/meetings")
        .cookie(owner_cookie)
        .header(ContentType::JSON)
        .body(r#"{"raw_notes": "Private call notes."}"#)
        .dispatch();
    let created: serde_json::Value = create.into_json().unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let get = client.get(format!("/meetings/{id}")).cookie(other_cookie.clone()).dispatch();
    assert_eq!(get.status(), Status::NotFound);

    let delete = client.delete(format!("/meetings/{id}")).cookie(other_cookie.clone()).dispatch();
    assert_eq!(delete.status(), Status::NotFound);

    let patch = client
        .patch(format!("/meetings/{id}/transcript"))
        .cookie(other_cookie)
        .header(ContentType::JSON)
        .body(r#"{"transcript": "Hijacked."}"#)
        .dispatch();
    assert_eq!(patch.status(), Status::NotFound);
}

/// A live session's status/memory-hints endpoints obey the same not-found-not-forbidden rule.
#[test]
fn foreign_live_session_status_is_not_found() {
    let client = test_client();
    let (_, owner_cookie) = client.sign_up("session-owner@example.com", "free");
    let (_, other_cookie) = client.sign_up("session-intruder@example.com", "free");

    let start = client
        .post("/live/start")
        .cookie(owner_cookie)
        .header(ContentType::JSON)
        .body(r#"{"title": "Private Standup"}"#)
        .dispatch();
    let started: serde_json::Value = start.into_json().unwrap();
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let status = client
        .get(format!("/live/{session_id}/status"))
        .cookie(other_cookie.clone())
        .dispatch();
    assert_eq!(status.status(), Status::NotFound);

    let hints = client
        .post(format!("/live/{session_id}/memory-hints"))
        .cookie(other_cookie)
        .dispatch();
    assert_eq!(hints.status(), Status::NotFound);
}

/// A non-owner who subscribes to someone else's live stream never sees a `connected`
/// event or any segments -- the stream closes immediately instead of entering the
/// subscribe loop, so the session's existence and contents aren't leaked.
#[test]
fn foreign_live_session_stream_emits_nothing() {
    let client = test_client();
    let (_, owner_cookie) = client.sign_up("stream-owner@example.com", "free");
    let (_, other_cookie) = client.sign_up("stream-intruder@example.com", "free");

    let start = client
        .post("/live/start")
        .cookie(owner_cookie)
        .header(ContentType::JSON)
        .body(r#"{"title": "Private Standup"}"#)
        .dispatch();
    let started: serde_json::Value = start.into_json().unwrap();
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let res = client
        .get(format!("/live/{session_id}/stream"))
        .cookie(other_cookie)
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    assert!(res.into_string().unwrap_or_default().is_empty());
}
