//! Contract Test: POST /account

use crate::support::build_app;
use axum::http::StatusCode;
use realm_portal::accounts::AccountStore;
use serde_json::json;
use std::time::Duration;

fn registration(login: &str, password: &str, token: &str, code: &str) -> serde_json::Value {
    json!({
        "login": login,
        "password": password,
        "captchaId": token,
        "captchaCode": code,
    })
}

#[tokio::test]
async fn valid_registration_creates_account() {
    let app = build_app().await;
    let token = app.put_captcha("aB3xY").await;

    let (status, body) = app
        .post_json("/account", registration("alice", "secret", &token, "ab3xy"))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Account created successfully");
    assert!(app.accounts.account_exists("alice").await.unwrap());
}

#[tokio::test]
async fn wrong_captcha_is_rejected_and_consumed() {
    let app = build_app().await;
    let token = app.put_captcha("right").await;

    let (status, body) = app
        .post_json("/account", registration("alice", "secret", &token, "WRONG"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Invalid captcha");

    // 誤答でトークンは消費済み
    let (status, body) = app
        .post_json("/account", registration("alice", "secret", &token, "right"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid captcha");
    assert!(!app.accounts.account_exists("alice").await.unwrap());
}

#[tokio::test]
async fn captcha_cannot_be_reused_after_success() {
    let app = build_app().await;
    let token = app.put_captcha("abcde").await;

    let (status, _) = app
        .post_json("/account", registration("alice", "secret", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post_json("/account", registration("bob", "secret", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid captcha");
}

#[tokio::test]
async fn unknown_captcha_token_is_rejected() {
    let app = build_app().await;

    let (status, body) = app
        .post_json(
            "/account",
            registration("alice", "secret", "never-issued", "abcde"),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid captcha");
}

#[tokio::test]
async fn expired_captcha_is_rejected() {
    let app = build_app().await;
    let token = "short-lived".to_string();
    app.captcha_store
        .put(token.clone(), "abcde".to_string(), Duration::from_millis(50))
        .await;

    tokio::time::sleep(Duration::from_millis(100)).await;

    let (status, body) = app
        .post_json("/account", registration("alice", "secret", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid captcha");
}

#[tokio::test]
async fn missing_fields_fail_captcha_check() {
    let app = build_app().await;

    let (status, body) = app.post_json("/account", json!({})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid captcha");
}

#[tokio::test]
async fn empty_login_or_password_is_rejected() {
    let app = build_app().await;

    let token = app.put_captcha("abcde").await;
    let (status, body) = app
        .post_json("/account", registration("", "secret", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Login and password are required");

    let token = app.put_captcha("abcde").await;
    let (status, body) = app
        .post_json("/account", registration("alice", "", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Login and password are required");
}

#[tokio::test]
async fn duplicate_login_returns_conflict() {
    let app = build_app().await;

    let token = app.put_captcha("abcde").await;
    let (status, _) = app
        .post_json("/account", registration("alice", "secret", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = app.put_captcha("fghjk").await;
    let (status, body) = app
        .post_json("/account", registration("alice", "other", &token, "fghjk"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "Account with this login already exists");
}

#[tokio::test]
async fn stored_password_is_not_plaintext() {
    let app = build_app().await;
    let token = app.put_captcha("abcde").await;

    app.post_json("/account", registration("alice", "secret", &token, "abcde"))
        .await;

    let (stored,): (String,) = sqlx::query_as("SELECT password FROM accounts WHERE login = ?")
        .bind("alice")
        .fetch_one(app.accounts.pool())
        .await
        .unwrap();
    assert_ne!(stored, "secret");
    assert!(realm_portal::accounts::password::verify_password("secret", &stored).unwrap());
}

#[tokio::test]
async fn unreadable_bodies_get_json_failure_envelope() {
    let app = build_app().await;
    let cases = [
        (None, r#"{"login":"alice"}"#),
        (Some("application/json"), ""),
        (Some("application/json"), "{not json"),
        (Some("text/plain"), "login=alice"),
        (Some("application/json"), r#"{"login":42}"#),
    ];

    for (content_type, body) in cases {
        let (status, json) = app.post_raw("/account", content_type, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["message"], "Invalid captcha");
    }
}

#[tokio::test]
async fn null_fields_fall_through_the_same_checks() {
    let app = build_app().await;

    let (status, body) = app
        .post_json(
            "/account",
            json!({"login": "alice", "password": "secret", "captchaId": "x", "captchaCode": null}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid captcha");

    let token = app.put_captcha("abcde").await;
    let (status, body) = app
        .post_json(
            "/account",
            json!({"login": null, "password": "secret", "captchaId": token, "captchaCode": "abcde"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Login and password are required");
}

#[tokio::test]
async fn login_is_trimmed_before_storing() {
    let app = build_app().await;

    let token = app.put_captcha("abcde").await;
    let (status, _) = app
        .post_json("/account", registration("  alice ", "secret", &token, "abcde"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(app.accounts.account_exists("alice").await.unwrap());

    let token = app.put_captcha("fghjk").await;
    let (status, body) = app
        .post_json("/account", registration("alice", "other", &token, "fghjk"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Account with this login already exists");
}
