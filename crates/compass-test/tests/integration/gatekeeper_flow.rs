//! End-to-end journeys through the route gatekeeper.

use salvo::http::StatusCode;
use salvo::http::header::LOCATION;
use salvo::test::ResponseExt;
use serde_json::Value;

use super::helpers::*;

fn location(content: &salvo::Response) -> String {
    content
        .headers()
        .get(LOCATION)
        .expect("location header")
        .to_str()
        .expect("ascii location")
        .to_string()
}

#[test_log::test(tokio::test)]
async fn signup_then_visit_own_dashboard() {
    let app = TestApp::new();
    let token = app.signup("student", "alice", "alice@example.com").await;

    // First signup gets user id 1.
    let encoded = app.encoded_id(1);

    let mut content = app
        .get(&format!("/student/{encoded}/dashboard"))
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::OK));
    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["page"], "dashboard");
    assert_eq!(body["user"]["username"], "alice");
}

#[test_log::test(tokio::test)]
async fn anonymous_protected_request_lands_on_home() {
    let app = TestApp::new();

    let content = app.get("/student/abc123/dashboard").send(&app.service).await;

    assert_eq!(content.status_code, Some(StatusCode::FOUND));
    assert_eq!(location(&content), "/");
    // Nothing to clear when no cookie came in.
    assert!(!clears_session_cookie(&content));
}

#[test_log::test(tokio::test)]
async fn foreign_profile_redirects_to_own_dashboard() {
    let app = TestApp::new();
    let alice = app.signup("student", "alice", "alice@example.com").await;
    app.signup("instructor", "irene", "irene@example.com").await;

    // Alice (id 1) tries Irene's (id 2) profile.
    let irene_token = app.encoded_id(2);
    let own_dashboard = format!("/student/{}/dashboard", app.encoded_id(1));

    let content = app
        .get(&format!("/instructor/{irene_token}/profile"))
        .add_header("cookie", cookie_header(&alice), true)
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::FOUND));
    assert_eq!(location(&content), own_dashboard);
}

#[test_log::test(tokio::test)]
async fn auth_screens_bounce_active_sessions() {
    let app = TestApp::new();
    let token = app.signup("instructor", "irene", "irene@example.com").await;
    let own_dashboard = format!("/instructor/{}/dashboard", app.encoded_id(1));

    for path in ["/login/student", "/login/instructor", "/signup/student"] {
        let content = app
            .get(path)
            .add_header("cookie", cookie_header(&token), true)
            .send(&app.service)
            .await;

        assert_eq!(content.status_code, Some(StatusCode::FOUND));
        assert_eq!(location(&content), own_dashboard);
    }
}

#[test_log::test(tokio::test)]
async fn auth_screens_open_to_anonymous_callers() {
    let app = TestApp::new();

    for path in [
        "/login/student",
        "/login/instructor",
        "/signup/student",
        "/signup/instructor",
    ] {
        let content = app.get(path).send(&app.service).await;
        assert_eq!(content.status_code, Some(StatusCode::OK));
    }
}

#[test_log::test(tokio::test)]
async fn stale_cookie_on_protected_path_is_cleared() {
    let app = TestApp::new();
    let token = app.signup("student", "alice", "alice@example.com").await;

    // Log out server-side; the browser still holds the cookie.
    app.post("/api/auth/logout")
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;

    let content = app
        .get(&format!("/student/{}/dashboard", app.encoded_id(1)))
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::FOUND));
    assert_eq!(location(&content), "/");
    assert!(clears_session_cookie(&content));
}

#[test_log::test(tokio::test)]
async fn course_page_requires_login_but_not_ownership() {
    let app = TestApp::new();
    let token = app.signup("student", "alice", "alice@example.com").await;

    let course_token = test_codec().encode(7);

    let mut content = app
        .get(&format!("/courses/{course_token}"))
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::OK));
    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["course_id"], 7);

    // A tampered course token 404s instead of leaking anything.
    let content = app
        .get("/courses/tampered1")
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;
    assert_eq!(content.status_code, Some(StatusCode::NOT_FOUND));
}

#[test_log::test(tokio::test)]
async fn home_and_api_stay_public_with_or_without_cookie() {
    let app = TestApp::new();
    let token = app.signup("student", "alice", "alice@example.com").await;

    for cookie in [None, Some(token)] {
        let mut request = app.get("/");
        if let Some(value) = &cookie {
            request = request.add_header("cookie", cookie_header(value), true);
        }
        let content = request.send(&app.service).await;
        assert_eq!(content.status_code, Some(StatusCode::OK));

        let content = app.get("/api/healthcheck").send(&app.service).await;
        assert_eq!(content.status_code, Some(StatusCode::OK));
    }
}
