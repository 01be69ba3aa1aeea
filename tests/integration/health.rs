use rocket::http::Status;

use crate::common::test_client;

#[test]
fn health_reports_ok_and_mock_mode() {
    let client = test_client();
    let res = client.get("/health").dispatch();
    assert_eq!(res.status(), Status::Ok);
    let body: serde_json::Value = res.into_json().unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["mock_mode"].is_boolean());
}

#[test]
fn unknown_route_is_404() {
    let client = test_client();
    let res = client.get("/does-not-exist").dispatch();
    assert_eq!(res.status(), Status::NotFound);
}
