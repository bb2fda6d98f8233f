use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use super::common::{created, price_lines};
use crate::auth::AuthUser;
use crate::entities::{order, OrderStatus};
use crate::errors::ServiceError;
use crate::services::customers::CustomerProfile;
use crate::services::orders::{OrderSummary, PlacedOrder};
use crate::{ApiResponse, ApiResult, AppState};

/// A requested line; the unit price defaults to the item's current menu price
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub menu_item_id: i32,
    pub quantity: i32,
    #[schema(value_type = Option<String>, example = "9.50")]
    pub unit_price: Option<Decimal>,
}

/// Order entered by staff on behalf of a guest
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateOrderRequest {
    /// Guest email; the customer is created on first use
    pub customer_email: Option<String>,
    /// Processing employee; defaults to the employee record matching the caller
    pub employee_id: Option<i32>,
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[schema(example = "in progress")]
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    summary = "List orders",
    description = "Every order with customer and employee names, newest first",
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<Vec<OrderSummary>>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 503, description = "Database unavailable", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<OrderSummary>> {
    let orders = state.services.orders.list_orders().await?;
    Ok(Json(ApiResponse::success(orders)))
}

#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    summary = "Get order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with its lines", body = ApiResponse<PlacedOrder>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<PlacedOrder> {
    match state.services.orders.get_order(id).await? {
        Some(order) => Ok(Json(ApiResponse::success(order))),
        None => Err(ServiceError::NotFound(format!("Order {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/orders",
    summary = "Create order",
    description = "Place an order at the counter. All lines are stored in one transaction.",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<PlacedOrder>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 400, description = "Invalid order", body = crate::errors::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown menu item, employee or customer", body = crate::errors::ErrorResponse),
        (status = 503, description = "Database unavailable", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Orders"
)]
#[instrument(skip(state, request), fields(caller = %user.email))]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PlacedOrder>>), ServiceError> {
    let employee_id = match request.employee_id {
        Some(id) => id,
        None => state
            .services
            .employees
            .get_employee_by_email(&user.email)
            .await?
            .map(|employee| employee.employee_id)
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "No employee record for {}; supply employee_id",
                    user.email
                ))
            })?,
    };

    let needs_menu = request.items.iter().any(|line| line.unit_price.is_none());
    let menu = if needs_menu {
        state.services.menu_items.list_menu_items().await?
    } else {
        Vec::new()
    };
    let items = price_lines(
        &menu,
        request
            .items
            .iter()
            .map(|line| (line.menu_item_id, line.quantity, line.unit_price)),
        |id| ServiceError::NotFound(format!("Menu item {} not found", id)),
    )?;

    let customer_id = match request.customer_email.as_deref() {
        Some(email) => Some(
            state
                .services
                .customers
                .ensure_customer(email, CustomerProfile::default())
                .await?,
        ),
        None => None,
    };

    let placed = state
        .services
        .orders
        .place_order(customer_id, employee_id, items)
        .await?;
    Ok(created(placed))
}

#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    summary = "Update order status",
    description = "Any of pending, in progress, completed, cancelled; transitions are not restricted",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<order::Model>),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: AuthUser,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> ApiResult<order::Model> {
    let status = OrderStatus::from_str(request.status.trim()).map_err(|_| {
        ServiceError::ValidationError(format!("Unknown order status: {}", request.status))
    })?;

    let updated = state.services.orders.set_order_status(id, status).await?;
    info!(order_id = %id, status = status.as_str(), by = %user.email, "Status changed");
    Ok(Json(ApiResponse::success(updated)))
}
