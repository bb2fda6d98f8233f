use axum::{extract::State, Json};

use crate::entities::position;
use crate::{ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/positions",
    summary = "List positions",
    responses(
        (status = 200, description = "All job positions", body = ApiResponse<Vec<position::Model>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Staff"
)]
pub async fn list_positions(State(state): State<AppState>) -> ApiResult<Vec<position::Model>> {
    let positions = state.services.positions.list_positions().await?;
    Ok(Json(ApiResponse::success(positions)))
}
