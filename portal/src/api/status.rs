//! エンドポイント状態API

use crate::{api::error::AppError, AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use realm_portal_common::{
    error::PortalError,
    protocol::ApiResponse,
    types::{EndpointState, EndpointStatus},
};

/// GET /status/:server_type - 指定エンドポイントの状態
pub async fn get_status(
    State(state): State<AppState>,
    Path(server_type): Path<String>,
) -> Result<Json<ApiResponse<EndpointState>>, AppError> {
    let status = state
        .status_table
        .get(&server_type)
        .await
        .ok_or(PortalError::UnknownEndpoint(server_type))?;

    Ok(Json(ApiResponse::success(status.state)))
}

/// GET /status - 全エンドポイントの状態一覧
pub async fn list_statuses(State(state): State<AppState>) -> Json<ApiResponse<Vec<EndpointStatus>>> {
    Json(ApiResponse::success(state.status_table.list().await))
}
