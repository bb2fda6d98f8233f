/*!
 * # Health Check Module
 *
 * - Liveness (`/health`, `/health/live`): the process is serving requests
 * - Readiness (`/health/ready`): the database answers a ping
 * - Version (`/health/version`): build metadata
 */

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::db::{check_connection, DbPool};

/// Basic health status
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Health check detail
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthDetail {
    pub status: HealthStatus,
    pub message: Option<String>,
}

/// Overall health information
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct HealthInfo {
    pub status: HealthStatus,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub details: HashMap<String, HealthDetail>,
}

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub db_pool: Arc<DbPool>,
    pub started: Instant,
}

impl HealthState {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    /// Probes every dependency and folds the results into one status
    pub async fn probe(&self) -> HealthInfo {
        let mut details = HashMap::new();

        let database = match check_connection(&self.db_pool).await {
            Ok(()) => HealthDetail {
                status: HealthStatus::Up,
                message: None,
            },
            Err(e) => {
                error!(error = %e, "Database health check failed");
                HealthDetail {
                    status: HealthStatus::Down,
                    message: Some(e.response_message()),
                }
            }
        };
        details.insert("database".to_string(), database);

        let status = if details.values().any(|d| d.status == HealthStatus::Down) {
            HealthStatus::Down
        } else {
            HealthStatus::Up
        };

        HealthInfo {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            uptime_seconds: self.uptime(),
            details,
        }
    }
}

/// Returns build and version information
pub async fn version_info() -> impl IntoResponse {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "commit": option_env!("GIT_HASH").unwrap_or("unknown"),
        "built": option_env!("BUILD_TIME").unwrap_or("unknown"),
    }))
}

/// Liveness check endpoint
#[utoipa::path(
    get,
    path = "/health",
    summary = "Liveness",
    responses((status = 200, description = "Process is up")),
    tag = "Health"
)]
pub async fn health_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    debug!("Health check endpoint called");
    (
        StatusCode::OK,
        Json(json!({
            "status": HealthStatus::Up,
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_seconds": state.uptime(),
            "timestamp": Utc::now().to_rfc3339(),
        })),
    )
}

/// Readiness check endpoint
#[utoipa::path(
    get,
    path = "/health/ready",
    summary = "Readiness",
    responses(
        (status = 200, description = "Database reachable", body = HealthInfo),
        (status = 503, description = "Database unreachable", body = HealthInfo),
    ),
    tag = "Health"
)]
pub async fn readiness_check(State(state): State<Arc<HealthState>>) -> impl IntoResponse {
    let health = state.probe().await;
    let status_code = match health.status {
        HealthStatus::Up => StatusCode::OK,
        HealthStatus::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// Creates router with health check endpoints
pub fn health_routes<S>(db_pool: Arc<DbPool>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let health_state = Arc::new(HealthState::new(db_pool));

    Router::new()
        .route("/", get(health_check))
        .route("/live", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/version", get(version_info))
        .with_state(health_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::establish_connection;

    #[tokio::test]
    async fn probe_reports_database_up() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        let state = HealthState::new(Arc::new(db));

        let info = state.probe().await;
        assert_eq!(info.status, HealthStatus::Up);
        assert_eq!(info.details["database"].status, HealthStatus::Up);
    }

    #[tokio::test]
    async fn probe_reports_closed_pool_as_down() {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        let shared = Arc::new(db);
        let state = HealthState::new(shared.clone());
        shared.as_ref().clone().close().await.unwrap();

        let info = state.probe().await;
        assert_eq!(info.status, HealthStatus::Down);
    }
}
