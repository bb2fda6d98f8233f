mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn login_returns_token_for_configured_account() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"email": "Manager@Restaurant.com", "password": "admin"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "manager");
    assert_eq!(body["data"]["token_type"], "Bearer");

    let token = body["data"]["access_token"].as_str().unwrap().to_string();
    let me = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(me.status(), StatusCode::OK);
    let me = body_json(me).await;
    assert_eq!(me["data"]["email"], "manager@restaurant.com");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"email": common::WAITER, "password": "nope"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn staff_routes_require_a_token() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/orders", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::GET, "/api/v1/orders", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn customers_cannot_reach_staff_routes() {
    let app = TestApp::new().await;

    for (method, uri) in [
        (Method::GET, "/api/v1/orders"),
        (Method::GET, "/api/v1/employees"),
        (Method::GET, "/api/v1/positions"),
        (Method::GET, "/api/v1/menu-items"),
    ] {
        let response = app.request_as(common::CUSTOMER, method, uri, None).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
    }

    let response = app
        .request_as(
            common::CUSTOMER,
            Method::POST,
            "/api/v1/menu-items",
            Some(json!({"item_name": "Free Lunch", "price": "0.01"})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.count("menu_items").await, 0);
}

#[tokio::test]
async fn staff_cannot_use_the_portal() {
    let app = TestApp::new().await;

    let response = app
        .request_as(common::WAITER, Method::GET, "/api/v1/portal/menu", None)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn responses_echo_the_request_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/v1/status", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("request id header");
    let body = body_json(response).await;
    assert_eq!(body["meta"]["request_id"], header.as_str());
}

#[tokio::test]
async fn health_endpoints_report_database() {
    let app = TestApp::new().await;

    let live = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(ready.status(), StatusCode::OK);
    let body = body_json(ready).await;
    assert_eq!(body["details"]["database"]["status"], "up");
}

#[tokio::test]
async fn portal_order_flow_prices_from_the_menu() {
    let app = TestApp::new().await;
    app.seed_employee(common::WAITER, "Waiter").await;
    let burger = app.seed_menu_item("Burger", dec!(9.50), true).await;
    let soup = app.seed_menu_item("Soup", dec!(6.00), false).await;

    let menu = app
        .request_as(common::CUSTOMER, Method::GET, "/api/v1/portal/menu", None)
        .await;
    assert_eq!(menu.status(), StatusCode::OK);
    let menu = body_json(menu).await;
    let names: Vec<_> = menu["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["item_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Burger".to_string()]);

    let placed = app
        .request_as(
            common::CUSTOMER,
            Method::POST,
            "/api/v1/portal/orders",
            Some(json!({"items": [
                {"menu_item_id": burger.menu_item_id, "quantity": 2},
                {"menu_item_id": soup.menu_item_id, "quantity": 0}
            ]})),
        )
        .await;
    assert_eq!(placed.status(), StatusCode::CREATED);
    let placed = body_json(placed).await;
    assert_eq!(decimal(&placed["data"]["total_amount"]), dec!(19.00));
    assert_eq!(placed["data"]["status"], "pending");
    assert_eq!(placed["data"]["details"].as_array().unwrap().len(), 1);

    let history = app
        .request_as(common::CUSTOMER, Method::GET, "/api/v1/portal/orders", None)
        .await;
    assert_eq!(history.status(), StatusCode::OK);
    let history = body_json(history).await;
    let lines = history["data"].as_array().unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["item_name"], "Burger");
    assert_eq!(lines[0]["quantity"], 2);
    assert_eq!(decimal(&lines[0]["price_at_time_of_order"]), dec!(9.50));
    assert_eq!(app.count("customers").await, 1);
}

#[tokio::test]
async fn portal_rejects_inactive_items_and_empty_baskets() {
    let app = TestApp::new().await;
    app.seed_employee(common::WAITER, "Waiter").await;
    let soup = app.seed_menu_item("Soup", dec!(6.00), false).await;

    let response = app
        .request_as(
            common::CUSTOMER,
            Method::POST,
            "/api/v1/portal/orders",
            Some(json!({"items": [{"menu_item_id": soup.menu_item_id, "quantity": 1}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_as(
            common::CUSTOMER,
            Method::POST,
            "/api/v1/portal/orders",
            Some(json!({"items": [{"menu_item_id": soup.menu_item_id, "quantity": 0}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count("orders").await, 0);
}

#[tokio::test]
async fn staff_order_then_status_update() {
    let app = TestApp::new().await;
    app.seed_employee(common::WAITER, "Waiter").await;
    let burger = app.seed_menu_item("Burger", dec!(9.50), true).await;

    let created = app
        .request_as(
            common::WAITER,
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_email": "walkin@example.com",
                "items": [{"menu_item_id": burger.menu_item_id, "quantity": 2}]
            })),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    let order_id = created["data"]["order_id"].as_str().unwrap().to_string();
    assert_eq!(decimal(&created["data"]["total_amount"]), dec!(19.00));

    let updated = app
        .request_as(
            common::CHEF,
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({"status": "in progress"})),
        )
        .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let updated = body_json(updated).await;
    assert_eq!(updated["data"]["status"], "in progress");

    let rejected = app
        .request_as(
            common::CHEF,
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({"status": "shipped"})),
        )
        .await;
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);

    let board = app
        .request_as(common::MANAGER, Method::GET, "/api/v1/orders", None)
        .await;
    let board = body_json(board).await;
    assert_eq!(board["data"].as_array().unwrap().len(), 1);
    assert_eq!(board["data"][0]["status"], "in progress");
}

#[tokio::test]
async fn staff_order_with_unknown_item_is_not_found() {
    let app = TestApp::new().await;
    app.seed_employee(common::WAITER, "Waiter").await;

    let response = app
        .request_as(
            common::WAITER,
            Method::POST,
            "/api/v1/orders",
            Some(json!({"items": [{"menu_item_id": 404, "quantity": 1, "unit_price": "3.00"}]})),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.count("orders").await, 0);
    assert_eq!(app.count("order_details").await, 0);
}

#[tokio::test]
async fn staff_order_with_out_of_range_prices_is_a_bad_request() {
    let app = TestApp::new().await;
    app.seed_employee(common::WAITER, "Waiter").await;
    let burger = app.seed_menu_item("Burger", dec!(9.50), true).await;

    for unit_price in ["79228162514264337593543950335", "0.005"] {
        let response = app
            .request_as(
                common::WAITER,
                Method::POST,
                "/api/v1/orders",
                Some(json!({
                    "items": [{"menu_item_id": burger.menu_item_id, "quantity": 2, "unit_price": unit_price}]
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "unit price {unit_price}");
    }

    let response = app
        .request_as(
            common::WAITER,
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "items": [{"menu_item_id": burger.menu_item_id, "quantity": 2, "unit_price": "99999999.99"}]
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count("orders").await, 0);
}
