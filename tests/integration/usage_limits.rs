use rocket::http::{ContentType, Status};

use crate::common::test_client;

/// Scenario 4: a free-plan user who has already used their lifetime cap of 5 extracts
/// gets a 402-style `limit_reached` error instead of a fresh extraction.
#[test]
fn free_plan_extract_limit_reached() {
    let client = test_client();
    let (user, cookie) = client.sign_up("free-limit@example.com", "free");

    for _ in 0..5 {
        scribe_server::usage::consume(client.db(), &user.id);
    }

    let res = client
        .post("/meetings/extract")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(r#"{"notes": "Sarah: ship the redesign by Friday."}"#)
        .dispatch();

    assert_eq!(res.status(), Status::TooManyRequests);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["error"], "limit_reached");
    assert_eq!(body["used"], 5);
    assert_eq!(body["max"], 5);
}

/// Scenario 4's storage counterpart: a free-plan user at the 3-meeting cap is refused a
/// fourth `POST /meetings`, with the meeting count left unchanged.
#[test]
fn free_plan_meeting_storage_limit_reached() {
    let client = test_client();
    let (_, cookie) = client.sign_up("meeting-limit@example.com", "free");

    for i in 0..3 {
        let res = client
            .post("/meetings")
            .cookie(cookie.clone())
            .header(ContentType::JSON)
            .body(format!(r#"{{"raw_notes": "Call {i}"}}"#))
            .dispatch();
        assert_eq!(res.status(), Status::Ok);
    }

    let res = client
        .post("/meetings")
        .cookie(cookie.clone())
        .header(ContentType::JSON)
        .body(r#"{"raw_notes": "One too many"}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Forbidden);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["error"], "meeting_limit");

    let user = client.db().find_user_by_email("meeting-limit@example.com").unwrap();
    assert_eq!(client.db().count_meetings_owned(&user.id), 3);
}

/// Paid plans carry a monthly cap, not the free lifetime cap, and get a fresh allotment.
#[test]
fn paid_plan_uses_monthly_cap_not_lifetime() {
    let client = test_client();
    let (user, cookie) = client.sign_up("paid@example.com", "sub_basic");

    for _ in 0..10 {
        scribe_server::usage::consume(client.db(), &user.id);
    }

    let res = client
        .post("/meetings/extract")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(r#"{"notes": "Sarah: ship the redesign by Friday."}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
}
