//! Restaurant ERP library
//!
//! Menu, staff, customer and order management for a single restaurant, served
//! over a JSON API.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use chrono::Utc;
use http::HeaderValue;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
};
use utoipa::ToSchema;

use crate::auth::consts as perm;
use crate::auth::{AuthRouterExt, AuthService};
use crate::db::DbPool;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: config::AppConfig) -> Self {
        let auth = Arc::new(AuthService::from_app_config(&config));
        Self {
            services: handlers::AppServices::new(db.clone()),
            db,
            config,
            auth,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Routes under `/api/v1`, each group gated by its permission
pub fn api_v1_routes() -> Router<AppState> {
    let auth_public = Router::new().route("/auth/login", post(handlers::auth::login));
    let auth_me = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .with_auth();

    let positions_read = Router::new()
        .route("/positions", get(handlers::positions::list_positions))
        .with_permission(perm::POSITIONS_READ);

    let employees_read = Router::new()
        .route("/employees", get(handlers::employees::list_employees))
        .route("/employees/:id", get(handlers::employees::get_employee))
        .with_permission(perm::EMPLOYEES_READ);

    let employees_manage = Router::new()
        .route("/employees", post(handlers::employees::create_employee))
        .route("/employees/:id", put(handlers::employees::update_employee))
        .with_permission(perm::EMPLOYEES_MANAGE);

    let menu_read = Router::new()
        .route("/menu-items", get(handlers::menu_items::list_menu_items))
        .route("/menu-items/:id", get(handlers::menu_items::get_menu_item))
        .with_permission(perm::MENU_READ);

    let menu_manage = Router::new()
        .route("/menu-items", post(handlers::menu_items::create_menu_item))
        .route(
            "/menu-items/:id",
            put(handlers::menu_items::update_menu_item)
                .delete(handlers::menu_items::delete_menu_item),
        )
        .with_permission(perm::MENU_MANAGE);

    let orders_read = Router::new()
        .route("/orders", get(handlers::orders::list_orders))
        .route("/orders/:id", get(handlers::orders::get_order))
        .with_permission(perm::ORDERS_READ);

    let orders_create = Router::new()
        .route("/orders", post(handlers::orders::create_order))
        .with_permission(perm::ORDERS_CREATE);

    let orders_update = Router::new()
        .route(
            "/orders/:id/status",
            put(handlers::orders::update_order_status),
        )
        .with_permission(perm::ORDERS_UPDATE);

    let portal = Router::new()
        .route("/portal/menu", get(handlers::portal::menu))
        .route(
            "/portal/orders",
            get(handlers::portal::my_orders).post(handlers::portal::place_order),
        )
        .with_permission(perm::PORTAL_ACCESS);

    Router::new()
        .route("/status", get(api_status))
        .merge(auth_public)
        .merge(auth_me)
        .merge(positions_read)
        .merge(employees_read)
        .merge(employees_manage)
        .merge(menu_read)
        .merge(menu_manage)
        .merge(orders_read)
        .merge(orders_create)
        .merge(orders_update)
        .merge(portal)
}

async fn api_status() -> Json<ApiResponse<Value>> {
    Json(ApiResponse::success(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git": option_env!("GIT_HASH").unwrap_or("unknown"),
        "build_time": option_env!("BUILD_TIME").unwrap_or("unknown"),
        "service": "restaurant-erp",
        "timestamp": Utc::now().to_rfc3339(),
    })))
}

/// CORS policy from configuration: explicit origins win, then the permissive
/// fallback, otherwise no cross-origin access.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        ::tracing::info!(
            development = cfg.is_development(),
            "Using permissive CORS because explicit origins were not configured"
        );
        CorsLayer::permissive()
    } else {
        ::tracing::warn!("No CORS origins configured; cross-origin requests will be refused");
        CorsLayer::new()
    }
}

/// Full application: banner, health, API v1, Swagger UI and the HTTP middleware stack
pub fn build_router(state: AppState) -> Router {
    let auth = state.auth.clone();
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(|| async { "restaurant-erp up" }))
        .nest("/health", health::health_routes(state.db.clone()))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(crate::tracing::configure_http_tracing())
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(cors)
        // Inject AuthService into request extensions for auth middleware
        .layer(Extension(auth))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            crate::tracing::request_id_middleware,
        ))
        .with_state(state)
}
