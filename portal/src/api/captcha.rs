//! キャプチャ発行API

use crate::AppState;
use axum::{extract::State, Json};
use realm_portal_common::protocol::{ApiResponse, CaptchaData};

/// GET /captcha - 新しいチャレンジを発行
pub async fn get_captcha(State(state): State<AppState>) -> Json<ApiResponse<CaptchaData>> {
    let challenge = state.captcha.issue().await;

    Json(ApiResponse::success(CaptchaData {
        captcha_id: challenge.token,
        captcha: challenge.image,
    }))
}
