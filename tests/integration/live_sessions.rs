use rocket::http::{ContentType, Status};

use crate::common::{multipart_body, test_client};

fn start_session(client: &crate::common::TestClient, cookie: rocket::http::Cookie<'static>, title: &str) -> serde_json::Value {
    let res = client
        .post("/live/start")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(format!(r#"{{"title": "{title}"}}"#))
        .dispatch();
    assert_eq!(res.status(), Status::Created);
    res.into_json().unwrap()
}

/// Scenario 1: a second `start` while one session is active returns 409 with the
/// existing session id, and creates no new row.
#[test]
fn second_start_while_active_returns_session_active() {
    let client = test_client();
    let (_, cookie) = client.sign_up("standup@example.com", "free");

    let first = start_session(&client, cookie.clone(), "Standup");
    let session_id = first["session_id"].as_str().unwrap().to_string();
    assert_eq!(first["title"], "Standup");

    let res = client
        .post("/live/start")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(r#"{"title": "Other"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Conflict);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["error"], "session_active");
    assert_eq!(body["session_id"], session_id);
}

/// Scenario 2: three chunks transcribed in mock order ("A","B","C") land at segment
/// indexes 0,1,2 in that order, and stop concatenates them with blank-line separators.
#[test]
fn segments_ordered_and_concatenated_at_stop() {
    let client = test_client();
    let (_, cookie) = client.sign_up("segments@example.com", "free");

    let started = start_session(&client, cookie.clone(), "Three Chunks");
    let session_id = started["session_id"].as_str().unwrap().to_string();

    for i in 0..3 {
        let (ct, body) = multipart_body(&[("timestamp_ms", &(i * 1000).to_string())], "audio", "chunk.webm", b"fake-audio-bytes");
        let res = client
            .post(format!("/live/{session_id}/chunk"))
            .cookie(cookie.clone())
            .header(ct)
            .body(body)
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
        let json: serde_json::Value = res.into_json().unwrap();
        assert_eq!(json["segment_index"], i);
    }

    let segments = client.db().list_segments_ordered(&session_id);
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].text, "A");
    assert_eq!(segments[1].text, "B");
    assert_eq!(segments[2].text, "C");
    assert_eq!(segments.iter().map(|s| s.segment_index).collect::<Vec<_>>(), vec![0, 1, 2]);

    let res = client.post(format!("/live/{session_id}/stop")).cookie(cookie).dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    let meeting_id = body["meeting_id"].as_str().unwrap().to_string();

    let owner_id = client.db().find_user_by_email("segments@example.com").unwrap().id;
    let meeting = client.db().get_meeting_owned(&meeting_id, &owner_id).unwrap();
    assert_eq!(meeting.raw_notes, "A\n\nB\n\nC");
}

/// Scenario 6: stopping a session with zero captured segments fails the session and
/// returns a null meeting id.
#[test]
fn stop_with_zero_segments_fails_session() {
    let client = test_client();
    let (_, cookie) = client.sign_up("empty@example.com", "free");

    let started = start_session(&client, cookie.clone(), "Nothing Captured");
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let res = client.post(format!("/live/{session_id}/stop")).cookie(cookie.clone()).dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert!(body["meeting_id"].is_null());
    assert_eq!(body["message"], "No transcript was captured.");

    let user = client.db().find_user_by_email("empty@example.com").unwrap();
    let session = client.db().get_live_session_owned(&session_id, &user.id).unwrap();
    assert_eq!(session.status, "failed");
    assert!(session.meeting_id.is_none());
    assert!(session.ended_at.is_some());
}

/// Stopping an already-stopped session is a clean validation error, not a state corruption.
#[test]
fn stop_twice_is_rejected_cleanly() {
    let client = test_client();
    let (_, cookie) = client.sign_up("twice@example.com", "free");
    let started = start_session(&client, cookie.clone(), "Stop Twice");
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let first = client.post(format!("/live/{session_id}/stop")).cookie(cookie.clone()).dispatch();
    assert_eq!(first.status(), Status::Ok);

    let second = client.post(format!("/live/{session_id}/stop")).cookie(cookie).dispatch();
    assert_eq!(second.status(), Status::BadRequest);
}

#[test]
fn status_endpoint_reports_segment_count() {
    let client = test_client();
    let (_, cookie) = client.sign_up("status@example.com", "free");
    let started = start_session(&client, cookie.clone(), "Status Check");
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let res = client.get(format!("/live/{session_id}/status")).cookie(cookie).dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["status"], "active");
    assert_eq!(body["segment_count"], 0);
}

/// A session not owned by the caller is reported not-found, never forbidden -- §3's
/// ownership summary forbids existence disclosure.
#[test]
fn chunk_on_foreign_session_is_not_found() {
    let client = test_client();
    let (_, owner_cookie) = client.sign_up("owner@example.com", "free");
    let (_, other_cookie) = client.sign_up("other@example.com", "free");

    let started = start_session(&client, owner_cookie, "Owner Session");
    let session_id = started["session_id"].as_str().unwrap().to_string();

    let (ct, body) = multipart_body(&[("timestamp_ms", "0")], "audio", "chunk.webm", b"bytes");
    let res = client
        .post(format!("/live/{session_id}/chunk"))
        .cookie(other_cookie)
        .header(ct)
        .body(body)
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);
}
