use rocket::http::{ContentType, Status};

use crate::common::test_client;

#[test]
fn list_and_resolve_roundtrip() {
    let client = test_client();
    let (user, cookie) = client.sign_up("tracked@example.com", "free");

    let issue = client.db().create_tracked_issue(
        &user.id,
        "Fix authentication bug",
        None,
        None,
    );

    let list = client.get("/tracked-issues").cookie(cookie.clone()).dispatch();
    assert_eq!(list.status(), Status::Ok);
    let issues: serde_json::Value = list.into_json().unwrap();
    assert_eq!(issues.as_array().unwrap().len(), 1);
    assert_eq!(issues[0]["resolved"], false);

    let resolve = client
        .patch(format!("/tracked-issues/{}/resolve", issue.id))
        .cookie(cookie.clone())
        .header(ContentType::JSON)
        .body(r#"{"resolved": true}"#)
        .dispatch();
    assert_eq!(resolve.status(), Status::Ok);

    let reloaded = client.db().list_tracked_issues_owned(&user.id);
    assert!(reloaded[0].resolved);
    assert!(reloaded[0].resolved_at.is_some());
}

#[test]
fn resolving_a_foreign_issue_is_not_found() {
    let client = test_client();
    let (owner, _owner_cookie) = client.sign_up("issue-owner@example.com", "free");
    let (_, other_cookie) = client.sign_up("issue-other@example.com", "free");

    let issue = client.db().create_tracked_issue(&owner.id, "Ship the redesign", None, None);

    let res = client
        .patch(format!("/tracked-issues/{}/resolve", issue.id))
        .cookie(other_cookie)
        .header(ContentType::JSON)
        .body(r#"{"resolved": true}"#)
        .dispatch();
    assert_eq!(res.status(), Status::NotFound);
}
