//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング

use axum::{http::StatusCode, response::IntoResponse, Json};
use realm_portal_common::{error::PortalError, protocol::ApiResponse};
use tracing::{error, warn};

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub PortalError);

impl From<PortalError> for AppError {
    fn from(err: PortalError) -> Self {
        AppError(err)
    }
}

impl AppError {
    /// エラーに対応するHTTPステータス
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            PortalError::UnknownEndpoint(_) => StatusCode::NOT_FOUND,
            PortalError::InvalidCaptcha => StatusCode::BAD_REQUEST,
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::DuplicateEndpoint(_)
            | PortalError::Database(_)
            | PortalError::PasswordHash(_)
            | PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // 詳細はログのみに残し、クライアントには external_message() を返す
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(error = %self.0, status = status.as_u16(), "Request rejected");
        }

        let payload = ApiResponse::failed(self.0.external_message());
        (status, Json(payload)).into_response()
    }
}
