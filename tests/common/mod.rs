#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use restaurant_erp::{
    auth::Role,
    build_router,
    config::{AppConfig, DEV_DEFAULT_JWT_SECRET},
    db,
    entities::{employee, menu_item},
    services::{employees::EmployeeInput, menu_items::MenuItemInput},
    AppState,
};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseBackend as DbBackend, Statement};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MANAGER: &str = "manager@restaurant.com";
pub const WAITER: &str = "waiter@restaurant.com";
pub const CHEF: &str = "chef@restaurant.com";
pub const CUSTOMER: &str = "customer@example.com";

/// Application backed by a fresh SQLite file that lives as long as the harness.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("restaurant.db").display()
        );

        let mut cfg = AppConfig::new(
            url,
            DEV_DEFAULT_JWT_SECRET.to_string(),
            3600,
            "127.0.0.1".to_string(),
            18_080,
            "development".to_string(),
        );
        cfg.db_max_connections = 4;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = build_router(state.clone());

        Self {
            router,
            state,
            _dir: dir,
        }
    }

    /// Bearer token for one of the configured accounts.
    pub fn token_for(&self, email: &str) -> String {
        let role: Role = self
            .state
            .auth
            .directory()
            .role_of(email)
            .expect("account is configured");
        self.state
            .auth
            .generate_token(email, role)
            .expect("token generation")
    }

    /// Send a request against the router with an optional bearer token.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Request on behalf of a configured account.
    pub async fn request_as(
        &self,
        email: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> Response {
        let token = self.token_for(email);
        self.request(method, uri, body, Some(&token)).await
    }

    pub async fn seed_employee(&self, email: &str, position: &str) -> employee::Model {
        let positions = self
            .state
            .services
            .positions
            .list_positions()
            .await
            .expect("list positions");
        let position_id = positions
            .iter()
            .find(|p| p.position_name == position)
            .map(|p| p.position_id)
            .expect("position is seeded");

        let local = email.split('@').next().unwrap_or("staff");
        self.state
            .services
            .employees
            .create_employee(EmployeeInput {
                first_name: local.to_string(),
                last_name: "Tester".to_string(),
                email: email.to_string(),
                phone_number: None,
                hire_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                salary: Decimal::from(2500),
                position_id,
            })
            .await
            .expect("seed employee")
    }

    pub async fn seed_menu_item(&self, name: &str, price: Decimal, active: bool) -> menu_item::Model {
        self.state
            .services
            .menu_items
            .create_menu_item(MenuItemInput {
                item_name: name.to_string(),
                description: None,
                price,
                is_active: active,
            })
            .await
            .expect("seed menu item")
    }

    /// Runs raw SQL against the test database.
    pub async fn execute_sql(&self, sql: &str) {
        self.state
            .db
            .execute_unprepared(sql)
            .await
            .expect("raw sql");
    }

    /// Row count of a table, read straight from the database.
    pub async fn count(&self, table: &str) -> i64 {
        let row = self
            .state
            .db
            .query_one(Statement::from_string(
                DbBackend::Sqlite,
                format!("SELECT COUNT(*) AS n FROM {table}"),
            ))
            .await
            .expect("count query")
            .expect("count row");
        row.try_get::<i64>("", "n").expect("count value")
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

/// Reads a decimal that may have been serialized as a string or a number.
pub fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => Decimal::from_str(&n.to_string()).expect("decimal number"),
        other => panic!("not a decimal: {other}"),
    }
}
