use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Restaurant ERP API",
        version = "0.1.0",
        description = r#"
# Restaurant ERP API

Back-office API for a single restaurant: menu, staff, customers and the order workflow.

## Authentication

Sign in with `POST /api/v1/auth/login` and send the returned token on every other call:

```
Authorization: Bearer <your-jwt-token>
```

Staff accounts (manager, employee) manage the menu, employees and orders. Customer
accounts use the `/api/v1/portal` endpoints.

## Order status

Orders start as `pending` and can be set to `in progress`, `completed` or `cancelled`.

## Error Handling

```json
{
  "error": "Not Found",
  "message": "Not found: Menu item 42 not found",
  "request_id": "c0a8012e-...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "Auth", description = "Sign-in and identity"),
        (name = "Menu", description = "Menu item management"),
        (name = "Staff", description = "Employees and positions"),
        (name = "Orders", description = "Staff order workflow"),
        (name = "Portal", description = "Customer self-service ordering"),
        (name = "Health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::auth::login,
        crate::handlers::auth::me,

        crate::handlers::positions::list_positions,
        crate::handlers::employees::list_employees,
        crate::handlers::employees::get_employee,
        crate::handlers::employees::create_employee,
        crate::handlers::employees::update_employee,

        crate::handlers::menu_items::list_menu_items,
        crate::handlers::menu_items::get_menu_item,
        crate::handlers::menu_items::create_menu_item,
        crate::handlers::menu_items::update_menu_item,
        crate::handlers::menu_items::delete_menu_item,

        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::create_order,
        crate::handlers::orders::update_order_status,

        crate::handlers::portal::menu,
        crate::handlers::portal::place_order,
        crate::handlers::portal::my_orders,

        crate::health::health_check,
        crate::health::readiness_check,
    ),
    components(
        schemas(
            crate::auth::LoginCredentials,
            crate::auth::TokenResponse,
            crate::auth::AuthUser,
            crate::auth::Role,

            crate::entities::position::Model,
            crate::entities::employee::Model,
            crate::entities::menu_item::Model,
            crate::entities::customer::Model,
            crate::entities::order::Model,
            crate::entities::order_detail::Model,
            crate::entities::OrderStatus,

            crate::services::employees::EmployeeInput,
            crate::services::employees::EmployeeWithPosition,
            crate::services::menu_items::MenuItemInput,
            crate::services::orders::LineItem,
            crate::services::orders::PlacedOrder,
            crate::services::orders::OrderSummary,
            crate::services::orders::CustomerOrderLine,

            crate::handlers::orders::CreateOrderRequest,
            crate::handlers::orders::OrderLineRequest,
            crate::handlers::orders::UpdateOrderStatusRequest,
            crate::handlers::portal::PortalOrderRequest,
            crate::handlers::portal::PortalLine,

            crate::health::HealthInfo,
            crate::health::HealthDetail,
            crate::health::HealthStatus,

            crate::errors::ErrorResponse
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDocV1;

/// Registers the bearer token scheme referenced by `security(("Bearer" = []))`
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_workflow_routes() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Restaurant ERP API"));
        assert!(json.contains("/api/v1/orders/{id}/status"));
        assert!(json.contains("/api/v1/portal/orders"));
        assert!(json.contains("\"Bearer\""));
        assert!(json.contains("req-abc123xyz"));
    }
}
