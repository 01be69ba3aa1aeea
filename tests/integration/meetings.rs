use rocket::http::{ContentType, Status};

use crate::common::test_client;

#[test]
fn create_list_get_update_delete_roundtrip() {
    let client = test_client();
    let (_, cookie) = client.sign_up("crud@example.com", "free");

    let create = client
        .post("/meetings")
        .cookie(cookie.clone())
        .header(ContentType::JSON)
        .body(r#"{"raw_notes": "Kickoff call.", "action_items": {"action_items": [], "follow_up_email": ""}}"#)
        .dispatch();
    assert_eq!(create.status(), Status::Ok);
    let created: serde_json::Value = create.into_json().unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let list = client.get("/meetings").cookie(cookie.clone()).dispatch();
    let meetings: serde_json::Value = list.into_json().unwrap();
    assert_eq!(meetings.as_array().unwrap().len(), 1);

    let get = client.get(format!("/meetings/{id}")).cookie(cookie.clone()).dispatch();
    assert_eq!(get.status(), Status::Ok);
    let meeting: serde_json::Value = get.into_json().unwrap();
    assert_eq!(meeting["raw_notes"], "Kickoff call.");

    let patch_transcript = client
        .patch(format!("/meetings/{id}/transcript"))
        .cookie(cookie.clone())
        .header(ContentType::JSON)
        .body(r#"{"transcript": "Updated transcript."}"#)
        .dispatch();
    assert_eq!(patch_transcript.status(), Status::Ok);

    let patch_extraction = client
        .patch(format!("/meetings/{id}/extraction"))
        .cookie(cookie.clone())
        .header(ContentType::JSON)
        .body(r#"{"action_items": [{"task": "Ship it", "owner": "Ann", "deadline": "Friday"}], "follow_up_email": "hi"}"#)
        .dispatch();
    assert_eq!(patch_extraction.status(), Status::Ok);

    let reget = client.get(format!("/meetings/{id}")).cookie(cookie.clone()).dispatch();
    let meeting: serde_json::Value = reget.into_json().unwrap();
    assert_eq!(meeting["raw_notes"], "Updated transcript.");
    assert_eq!(meeting["action_items"]["action_items"][0]["task"], "Ship it");

    let delete = client.delete(format!("/meetings/{id}")).cookie(cookie.clone()).dispatch();
    assert_eq!(delete.status(), Status::Ok);

    let get_after_delete = client.get(format!("/meetings/{id}")).cookie(cookie).dispatch();
    assert_eq!(get_after_delete.status(), Status::NotFound);
}

/// The mock extractor always emits valid (non-fenced) JSON; this exercises the full
/// extract -> tolerant-decode -> quota-consume path end to end.
#[test]
fn extract_notes_returns_record_and_consumes_quota() {
    let client = test_client();
    let (user, cookie) = client.sign_up("extract@example.com", "sub_pro");

    let res = client
        .post("/meetings/extract")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(r#"{"notes": "Sarah: ship the redesign by Friday."}"#)
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let record: serde_json::Value = res.into_json().unwrap();
    assert!(record["action_items"].is_array());
    assert!(record["follow_up_email"].as_str().unwrap().len() > 0);

    let used = client.db().get_usage(&user.id, &scribe_server::usage::current_month());
    assert_eq!(used, 1);
}

#[test]
fn upload_rejects_unsupported_format() {
    let client = test_client();
    let (_, cookie) = client.sign_up("upload@example.com", "free");

    let (ct, body) = crate::common::multipart_body(&[], "audio", "notes.txt", b"not audio");
    let res = client
        .post("/meetings/upload")
        .cookie(cookie)
        .header(ct)
        .body(body)
        .dispatch();
    assert_eq!(res.status(), Status::BadRequest);
}

#[test]
fn upload_transcribes_and_persists_meeting() {
    let client = test_client();
    let (user, cookie) = client.sign_up("upload-ok@example.com", "free");

    let (ct, body) = crate::common::multipart_body(&[], "audio", "call.webm", b"fake bytes");
    let res = client
        .post("/meetings/upload")
        .cookie(cookie)
        .header(ct)
        .body(body)
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert!(!body["transcript"].as_str().unwrap().is_empty());

    assert_eq!(client.db().count_meetings_owned(&user.id), 1);
}
