//! Contract Test: 静的ファイル配信（APIルート以外のフォールバック）

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use realm_portal::{
    accounts::SqliteAccountStore, api, captcha::ChallengeIssuer, db, health::StatusTable,
    AppState,
};
use std::sync::Arc;
use tower::ServiceExt;

async fn build_static_app(dir: &std::path::Path) -> axum::Router {
    let pool = db::create_pool("sqlite::memory:").await.unwrap();
    let state = AppState {
        status_table: StatusTable::new(),
        captcha: ChallengeIssuer::with_default_ttl(),
        accounts: Arc::new(SqliteAccountStore::new(pool)),
    };
    api::create_app(state, dir)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&body).into_owned())
}

#[tokio::test]
async fn serves_files_from_static_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>Realm</h1>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('portal');").unwrap();
    let app = build_static_app(dir.path()).await;

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<h1>Realm</h1>");

    let (status, body) = get(&app, "/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("portal"));
}

#[tokio::test]
async fn missing_static_file_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_static_app(dir.path()).await;

    let (status, _) = get(&app, "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn api_routes_take_precedence_over_static_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("captcha"), "not the api").unwrap();
    let app = build_static_app(dir.path()).await;

    let (status, body) = get(&app, "/captcha").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("captchaId"));
}
