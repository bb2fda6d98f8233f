use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::common::created;
use crate::entities::employee;
use crate::errors::ServiceError;
use crate::services::employees::{EmployeeInput, EmployeeWithPosition};
use crate::{ApiResponse, ApiResult, AppState};

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    summary = "List employees",
    description = "All employees with their position name, ordered by last name",
    responses(
        (status = 200, description = "Employees retrieved", body = ApiResponse<Vec<EmployeeWithPosition>>),
        (status = 401, description = "Unauthorized", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Staff"
)]
pub async fn list_employees(
    State(state): State<AppState>,
) -> ApiResult<Vec<EmployeeWithPosition>> {
    let employees = state.services.employees.list_employees().await?;
    Ok(Json(ApiResponse::success(employees)))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    summary = "Get employee",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee retrieved", body = ApiResponse<EmployeeWithPosition>),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Staff"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<EmployeeWithPosition> {
    match state.services.employees.get_employee(id).await? {
        Some(employee) => Ok(Json(ApiResponse::success(employee))),
        None => Err(ServiceError::NotFound(format!("Employee {} not found", id))),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/employees",
    summary = "Hire employee",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Employee created", body = ApiResponse<employee::Model>),
        (status = 400, description = "Invalid employee data", body = crate::errors::ErrorResponse),
        (status = 409, description = "Email already in use", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Staff"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<EmployeeInput>,
) -> Result<(StatusCode, Json<ApiResponse<employee::Model>>), ServiceError> {
    let employee = state.services.employees.create_employee(input).await?;
    Ok(created(employee))
}

#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    summary = "Update employee",
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<employee::Model>),
        (status = 400, description = "Invalid employee data", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Staff"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<EmployeeInput>,
) -> ApiResult<employee::Model> {
    let employee = state.services.employees.update_employee(id, input).await?;
    Ok(Json(ApiResponse::success(employee)))
}
