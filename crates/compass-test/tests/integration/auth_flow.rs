//! Signup, login, and logout flows through the HTTP API.

use salvo::http::StatusCode;
use salvo::test::ResponseExt;
use serde_json::Value;

use compass_test::component::store::AuthStore;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn signup_returns_identity_and_sets_cookie() {
    let app = TestApp::new();

    let mut content = app
        .post("/api/auth/signup/student")
        .json(&serde_json::json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "hunter2hunter2",
            "avatar_url": "https://example.com/a.png",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::CREATED));
    assert!(session_cookie_value(&content).is_some());

    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["role"], "student");
    // The password never appears in the response.
    assert!(body["user"].get("password_hash").is_none());
}

#[test_log::test(tokio::test)]
async fn signup_rejects_duplicate_email() {
    let app = TestApp::new();
    app.signup("student", "alice", "alice@example.com").await;

    let mut content = app
        .post("/api/auth/signup/instructor")
        .json(&serde_json::json!({
            "username": "other",
            "email": "alice@example.com",
            "password": "hunter2hunter2",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::BAD_REQUEST));
    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "User with this email already exists");
}

#[test_log::test(tokio::test)]
async fn signup_rejects_duplicate_username() {
    let app = TestApp::new();
    app.signup("student", "alice", "alice@example.com").await;

    let mut content = app
        .post("/api/auth/signup/student")
        .json(&serde_json::json!({
            "username": "alice",
            "email": "fresh@example.com",
            "password": "hunter2hunter2",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::BAD_REQUEST));
    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["message"], "Username is already taken");
}

#[test_log::test(tokio::test)]
async fn signup_rejects_missing_fields() {
    let app = TestApp::new();

    let content = app
        .post("/api/auth/signup/student")
        .json(&serde_json::json!({
            "username": "",
            "email": "alice@example.com",
            "password": "hunter2hunter2",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::BAD_REQUEST));
}

#[test_log::test(tokio::test)]
async fn signup_rejects_unknown_role_segment() {
    let app = TestApp::new();

    let content = app
        .post("/api/auth/signup/admin")
        .json(&serde_json::json!({
            "username": "mallory",
            "email": "mallory@example.com",
            "password": "hunter2hunter2",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::BAD_REQUEST));
}

#[test_log::test(tokio::test)]
async fn login_succeeds_with_matching_role() {
    let app = TestApp::new();
    app.signup("instructor", "irene", "irene@example.com").await;

    let mut content = app
        .post("/api/auth/login/instructor")
        .json(&serde_json::json!({
            "email": "irene@example.com",
            "password": "hunter2hunter2",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::OK));
    assert!(session_cookie_value(&content).is_some());

    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["username"], "irene");
}

#[test_log::test(tokio::test)]
async fn login_rejects_wrong_password() {
    let app = TestApp::new();
    app.signup("student", "alice", "alice@example.com").await;

    let mut content = app
        .post("/api/auth/login/student")
        .json(&serde_json::json!({
            "email": "alice@example.com",
            "password": "wrong-password",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::UNAUTHORIZED));
    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["message"], "Invalid email, password, or role");
    assert!(session_cookie_value(&content).is_none());
}

#[test_log::test(tokio::test)]
async fn login_rejects_wrong_role() {
    let app = TestApp::new();
    app.signup("student", "alice", "alice@example.com").await;

    // Right credentials, wrong portal. Indistinguishable from a bad
    // password on the wire.
    let mut content = app
        .post("/api/auth/login/instructor")
        .json(&serde_json::json!({
            "email": "alice@example.com",
            "password": "hunter2hunter2",
        }))
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::UNAUTHORIZED));
    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["message"], "Invalid email, password, or role");
}

#[test_log::test(tokio::test)]
async fn me_reports_the_cookie_owner() {
    let app = TestApp::new();
    let token = app.signup("student", "alice", "alice@example.com").await;

    let mut content = app
        .get("/api/me")
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;

    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["username"], "alice");
}

#[test_log::test(tokio::test)]
async fn me_is_anonymous_without_cookie() {
    let app = TestApp::new();

    let mut content = app.get("/api/me").send(&app.service).await;

    let body: Value = content.take_json().await.expect("json body");
    assert_eq!(body["status"], "anonymous");
}

#[test_log::test(tokio::test)]
async fn logout_deletes_session_and_clears_cookie() {
    let app = TestApp::new();
    let token = app.signup("student", "alice", "alice@example.com").await;

    let content = app
        .post("/api/auth/logout")
        .add_header("cookie", cookie_header(&token), true)
        .send(&app.service)
        .await;

    assert_eq!(content.status_code, Some(StatusCode::OK));
    assert!(clears_session_cookie(&content));

    // The server-side session is gone, so the old token is dead even if
    // the browser kept the cookie.
    assert!(
        app.store
            .find_session(&token)
            .await
            .expect("find session")
            .is_none()
    );
}

#[test_log::test(tokio::test)]
async fn logout_without_cookie_still_succeeds() {
    let app = TestApp::new();

    let content = app.post("/api/auth/logout").send(&app.service).await;

    assert_eq!(content.status_code, Some(StatusCode::OK));
    assert!(clears_session_cookie(&content));
}
