//! アカウント登録API
//!
//! キャプチャを先に検証し、失敗理由は区別せずに返す。

use crate::{api::error::AppError, AppState};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use realm_portal_common::{
    error::PortalError,
    protocol::{ApiResponse, RegisterAccountRequest},
};
use tracing::{debug, info};

/// POST /account - アカウント登録
///
/// 読めないボディは空のリクエストとして扱い、同じ検証を通す。
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<RegisterAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse>), AppError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable registration body");
            RegisterAccountRequest::default()
        }
    };

    if !state
        .captcha
        .validate(&request.captcha_id, &request.captcha_code)
        .await
    {
        return Err(PortalError::InvalidCaptcha.into());
    }

    let login = request.login.trim();
    if login.is_empty() || request.password.is_empty() {
        return Err(PortalError::Validation("login or password is empty".to_string()).into());
    }

    if state.accounts.account_exists(login).await? {
        return Err(PortalError::Conflict(login.to_string()).into());
    }

    // 存在確認と作成の間の競合は一意制約が Conflict として返す
    let id = state
        .accounts
        .create_account(login, &request.password)
        .await?;

    info!(account_id = id, login = %login, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_message("Account created successfully")),
    ))
}
