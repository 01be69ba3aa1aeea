use rocket::http::{ContentType, Status};

use crate::common::test_client;

fn create_meeting(
    client: &crate::common::TestClient,
    cookie: rocket::http::Cookie<'static>,
    raw_notes: &str,
    action_items_json: &str,
) -> String {
    let body = format!(r#"{{"raw_notes": {raw_notes:?}, "action_items": {action_items_json}}}"#);
    let res = client
        .post("/meetings")
        .cookie(cookie)
        .header(ContentType::JSON)
        .body(body)
        .dispatch();
    assert_eq!(res.status(), Status::Ok);
    let created: serde_json::Value = res.into_json().unwrap();
    created["id"].as_str().unwrap().to_string()
}

/// Scenario 5: a second meeting sharing topics, an unresolved action item, and
/// overlapping participants with the first surfaces all three insight cards.
#[test]
fn second_meeting_surfaces_recurring_insights() {
    let client = test_client();
    let (_, cookie) = client.sign_up("insights@example.com", "free");

    let m1 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah, John\n\nSarah: dashboard redesign is done. John: fix the authentication bug by Friday.",
        r#"{"action_items": [{"task": "Fix authentication bug", "owner": "John", "deadline": "Friday"}], "follow_up_email": ""}"#,
    );

    // Ensure m2's created_at sorts after m1's for the before/ordered store queries.
    std::thread::sleep(std::time::Duration::from_millis(5));

    let m2 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah, John, Mike\n\nSarah: dashboard redesign feedback positive. John: authentication bug is still open on staging. Mike: client onboarding went well.",
        r#"{"action_items": [], "follow_up_email": ""}"#,
    );
    let _ = m1;

    let res = client.get(format!("/meetings/{m2}/insights")).cookie(cookie).dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    let cards = body["insights"].as_array().unwrap();

    let unresolved = cards.iter().find(|c| c["kind"] == "unresolved_items").expect("unresolved_items card");
    assert!(unresolved["items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|i| i["task"] == "Fix authentication bug"));

    let recurring_topics = cards.iter().find(|c| c["kind"] == "recurring_topics").expect("recurring_topics card");
    let shared: Vec<&str> = recurring_topics["shared_keywords"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(shared.contains(&"dashboard") || shared.contains(&"authentication"));

    let participants = cards.iter().find(|c| c["kind"] == "recurring_participants").expect("recurring_participants card");
    let names: Vec<&str> = participants["participants"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Sarah"));
    assert!(names.contains(&"John"));
}

/// Fetching insights auto-creates a tracked issue for each unresolved item, and refetching
/// doesn't create a duplicate for the same task.
#[test]
fn unresolved_items_are_tracked_and_deduplicated() {
    let client = test_client();
    let (user, cookie) = client.sign_up("tracked-from-insights@example.com", "free");

    let _m1 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah, John\n\nSarah: dashboard redesign is done. John: fix the authentication bug by Friday.",
        r#"{"action_items": [{"task": "Fix authentication bug", "owner": "John", "deadline": "Friday"}], "follow_up_email": ""}"#,
    );
    std::thread::sleep(std::time::Duration::from_millis(5));
    let m2 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah, John\n\nJohn: authentication bug is still open on staging.",
        r#"{"action_items": [], "follow_up_email": ""}"#,
    );

    let res = client.get(format!("/meetings/{m2}/insights")).cookie(cookie.clone()).dispatch();
    assert_eq!(res.status(), Status::Ok);

    let tracked = client.db().list_tracked_issues_owned(&user.id);
    assert_eq!(tracked.len(), 1);
    assert_eq!(tracked[0].issue_text, "Fix authentication bug");
    assert!(!tracked[0].resolved);

    // Re-fetching insights must not create a second row for the same task.
    let res2 = client.get(format!("/meetings/{m2}/insights")).cookie(cookie).dispatch();
    assert_eq!(res2.status(), Status::Ok);
    let tracked_again = client.db().list_tracked_issues_owned(&user.id);
    assert_eq!(tracked_again.len(), 1);
}

/// First meeting has no prior history: insights list is empty and whatchanged has no prior.
#[test]
fn first_meeting_has_no_insights_or_prior() {
    let client = test_client();
    let (_, cookie) = client.sign_up("firstmeeting@example.com", "free");

    let m1 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah\n\nSarah: kickoff call.",
        r#"{"action_items": [], "follow_up_email": ""}"#,
    );

    let insights = client.get(format!("/meetings/{m1}/insights")).cookie(cookie.clone()).dispatch();
    let body: serde_json::Value = insights.into_json().unwrap();
    assert!(body["insights"].as_array().unwrap().is_empty());
    assert!(body["message"].is_string());

    let whatchanged = client.get(format!("/meetings/{m1}/whatchanged")).cookie(cookie).dispatch();
    let body: serde_json::Value = whatchanged.into_json().unwrap();
    assert_eq!(body["has_prior"], false);
}

#[test]
fn whatchanged_diffs_against_most_recent_predecessor() {
    let client = test_client();
    let (_, cookie) = client.sign_up("diff@example.com", "free");

    let _m1 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah\n\nSarah: kickoff call about the roadmap.",
        r#"{"action_items": [{"task": "Draft roadmap", "owner": "Sarah", "deadline": ""}], "follow_up_email": ""}"#,
    );
    std::thread::sleep(std::time::Duration::from_millis(5));
    let m2 = create_meeting(
        &client,
        cookie.clone(),
        "Attendees: Sarah\n\nSarah: roadmap draft is ready, now let's plan launch logistics.",
        r#"{"action_items": [{"task": "Plan launch logistics", "owner": "Sarah", "deadline": ""}], "follow_up_email": ""}"#,
    );

    let res = client.get(format!("/meetings/{m2}/whatchanged")).cookie(cookie).dispatch();
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["has_prior"], true);
    assert!(body["new_action_items"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "plan launch logistics"));
    assert!(body["resolved_since_last"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t == "draft roadmap"));
}
