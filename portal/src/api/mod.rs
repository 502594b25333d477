//! REST APIハンドラー
//!
//! 死活状態の参照、キャプチャ発行、アカウント登録、静的ファイル配信

pub mod account;
pub mod captcha;
pub mod error;
pub mod status;

use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/status", get(status::list_statuses))
        .route("/status/:server_type", get(status::get_status))
        .route("/status/:server_type/", get(status::get_status))
        .route("/captcha", get(captcha::get_captcha))
        .route("/account", post(account::create_account))
        .with_state(state)
}

/// 静的ファイル配信とミドルウェアを含むアプリケーション全体を作成
pub fn create_app(state: AppState, static_files_path: impl AsRef<Path>) -> Router {
    create_router(state)
        .fallback_service(ServeDir::new(static_files_path))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
