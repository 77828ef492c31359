//! HTTP API tests - full router with every middleware, in-memory store

use axum::Router;
use axum::body::Body;
use http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use pos_server::api::build_app;
use pos_server::auth::JwtConfig;
use pos_server::bootstrap::ensure_admin;
use pos_server::reporting::{
    PdfReceiptRenderer, RenderedDocument, ReportError, ReportRenderer,
};
use pos_server::store::RedbStore;
use pos_server::{Config, ServerState};
use serde_json::{Value, json};
use shared::models::Order;
use std::sync::Arc;
use tower::ServiceExt;

const ADMIN_USER: &str = "admin";
const ADMIN_PASS: &str = "admin-pass";

struct TestApp {
    app: Router,
    state: ServerState,
}

struct Reply {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Reply {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("json body")
    }
}

fn test_state() -> ServerState {
    let mut config = Config::with_jwt(JwtConfig::ephemeral().unwrap());
    config.admin_username = ADMIN_USER.to_string();
    config.admin_password = Some(ADMIN_PASS.to_string());
    config.restaurant_name = "Test Bistro".to_string();
    ServerState::new(config, Arc::new(RedbStore::open_in_memory().unwrap()))
}

async fn spawn_app(state: ServerState) -> TestApp {
    ensure_admin(&state).await.unwrap();
    let app = build_app(&state).with_state(state.clone());
    TestApp { app, state }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Reply {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        Reply {
            status,
            headers,
            body,
        }
    }

    async fn login(&self, username: &str, password: &str) -> Reply {
        self.send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    async fn admin_token(&self) -> String {
        let reply = self.login(ADMIN_USER, ADMIN_PASS).await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.json()["access_token"].as_str().unwrap().to_string()
    }

    async fn create_table(&self, token: &str, number: u32) -> String {
        let reply = self
            .send(
                Method::POST,
                "/api/tables",
                Some(token),
                Some(json!({ "number": number, "capacity": 4 })),
            )
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        reply.json()["id"].as_str().unwrap().to_string()
    }

    async fn create_order(&self, token: &str, body: Value) -> Value {
        let reply = self.send(Method::POST, "/api/orders", Some(token), Some(body)).await;
        assert_eq!(reply.status, StatusCode::OK, "{}", String::from_utf8_lossy(&reply.body));
        reply.json()
    }

    /// Registers, approves and logs in a courier; returns (token, courier id)
    async fn approved_courier(&self, admin: &str, username: &str) -> (String, String) {
        let reply = self
            .send(Method::POST, "/api/auth/register", None, Some(register_body(username)))
            .await;
        assert_eq!(reply.status, StatusCode::OK);
        let courier_id = reply.json()["courier_id"].as_str().unwrap().to_string();

        let approve = self
            .send(
                Method::PUT,
                &format!("/api/couriers/{}/approve", courier_id),
                Some(admin),
                None,
            )
            .await;
        assert_eq!(approve.status, StatusCode::OK);

        let login = self.login(username, "rider-pass").await;
        assert_eq!(login.status, StatusCode::OK);
        let token = login.json()["access_token"].as_str().unwrap().to_string();
        (token, courier_id)
    }
}

fn register_body(username: &str) -> Value {
    json!({
        "username": username,
        "password": "rider-pass",
        "first_name": "Mila",
        "last_name": "Rider",
        "phone_number": "555-0100",
        "vehicle_type": "scooter"
    })
}

fn items() -> Value {
    json!([
        { "product_id": "p-1", "product_name": "Pizza", "quantity": 2, "price": 12.5 },
        { "product_id": "p-2", "product_name": "Water", "quantity": 1, "price": 2.0 }
    ])
}

#[tokio::test]
async fn test_health_is_public() {
    let app = spawn_app(test_state()).await;
    let reply = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["status"], "ok");
    assert!(reply.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_courier_registration_requires_approval() {
    let app = spawn_app(test_state()).await;
    let admin = app.admin_token().await;

    let reply = app
        .send(Method::POST, "/api/auth/register", None, Some(register_body("mila")))
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let user = reply.json();
    assert_eq!(user["role"], "courier");
    assert_eq!(user["is_approved"], false);
    assert!(user.get("password_hash").is_none());
    let courier_id = user["courier_id"].as_str().unwrap().to_string();

    let duplicate = app
        .send(Method::POST, "/api/auth/register", None, Some(register_body("mila")))
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let pending = app.login("mila", "rider-pass").await;
    assert_eq!(pending.status, StatusCode::FORBIDDEN);
    assert_eq!(pending.json()["code"], 1005);

    let listed = app
        .send(Method::GET, "/api/couriers/pending", Some(&admin), None)
        .await;
    assert_eq!(listed.json().as_array().unwrap().len(), 1);

    let approve = app
        .send(
            Method::PUT,
            &format!("/api/couriers/{}/approve", courier_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(approve.status, StatusCode::OK);
    assert_eq!(approve.json()["is_approved"], true);

    let login = app.login("mila", "rider-pass").await;
    assert_eq!(login.status, StatusCode::OK);
    let body = login.json();
    assert_eq!(body["token_type"], "bearer");
    assert_eq!(body["user"]["courier_id"], courier_id.as_str());

    let token = body["access_token"].as_str().unwrap();
    let claims = app.state.jwt_service().validate_token(token).unwrap();
    assert_eq!(claims.username, "mila");
    assert!(claims.is_approved);
    assert_eq!(claims.courier_id.as_deref(), Some(courier_id.as_str()));

    let me = app.send(Method::GET, "/api/auth/me", Some(token), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.json()["username"], "mila");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = spawn_app(test_state()).await;
    let mut body = register_body("shorty");
    body["password"] = json!("12345");
    let reply = app.send(Method::POST, "/api/auth/register", None, Some(body)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.json()["code"], 1006);
}

#[tokio::test]
async fn test_error_status_mapping() {
    let app = spawn_app(test_state()).await;
    let admin = app.admin_token().await;

    let wrong = app.login(ADMIN_USER, "nope").await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);

    let anonymous = app.send(Method::GET, "/api/orders", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let garbage = app.send(Method::GET, "/api/orders", Some("not-a-jwt"), None).await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);

    let missing = app
        .send(Method::GET, "/api/orders/does-not-exist", Some(&admin), None)
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["code"], 4001);

    let order = app
        .create_order(&admin, json!({ "items": items(), "order_type": "takeaway" }))
        .await;
    let order_id = order["id"].as_str().unwrap();

    let bad_status = app
        .send(
            Method::PUT,
            &format!("/api/orders/{}/status", order_id),
            Some(&admin),
            Some(json!({ "status": "shipped" })),
        )
        .await;
    assert_eq!(bad_status.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_status.json()["code"], 4003);

    let empty = app
        .send(
            Method::POST,
            "/api/orders",
            Some(&admin),
            Some(json!({ "items": [], "order_type": "takeaway" })),
        )
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let (courier, _) = app.approved_courier(&admin, "rider").await;
    let forbidden = app.send(Method::GET, "/api/orders", Some(&courier), None).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.json()["code"], 2002);

    let admin_on_courier = app
        .send(Method::GET, "/api/courier/packages", Some(&admin), None)
        .await;
    assert_eq!(admin_on_courier.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dine_in_flow_and_receipt() {
    let app = spawn_app(test_state()).await;
    let admin = app.admin_token().await;
    let table_id = app.create_table(&admin, 7).await;

    let order = app
        .create_order(
            &admin,
            json!({ "items": items(), "order_type": "dine-in", "table_id": table_id }),
        )
        .await;
    assert_eq!(order["status"], "pending");
    assert_eq!(order["table_name"], "Table 7");
    assert!(order["order_number"].as_str().unwrap().ends_with("-0001"));
    let order_id = order["id"].as_str().unwrap().to_string();

    let tables = app.send(Method::GET, "/api/tables", Some(&admin), None).await;
    assert_eq!(tables.json()[0]["is_occupied"], true);

    let receipt = app
        .send(
            Method::GET,
            &format!("/api/orders/{}/receipt", order_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(receipt.status, StatusCode::OK);
    assert_eq!(receipt.headers[header::CONTENT_TYPE], "application/pdf");
    assert!(
        receipt.headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("receipt_SIP-")
    );
    assert!(receipt.body.starts_with(b"%PDF-1.4"));

    let delivered = app
        .send(
            Method::PUT,
            &format!("/api/orders/{}/status", order_id),
            Some(&admin),
            Some(json!({ "status": "delivered" })),
        )
        .await;
    assert_eq!(delivered.status, StatusCode::OK);

    let back = app
        .send(
            Method::PUT,
            &format!("/api/orders/{}/status", order_id),
            Some(&admin),
            Some(json!({ "status": "ready" })),
        )
        .await;
    assert_eq!(back.status, StatusCode::BAD_REQUEST);
    assert_eq!(back.json()["code"], 4004);

    let tables = app.send(Method::GET, "/api/tables", Some(&admin), None).await;
    assert_eq!(tables.json()[0]["is_occupied"], false);
}

#[tokio::test]
async fn test_courier_takes_and_delivers_package() {
    let app = spawn_app(test_state()).await;
    let admin = app.admin_token().await;
    let (courier, courier_id) = app.approved_courier(&admin, "rider").await;

    let order = app
        .create_order(
            &admin,
            json!({
                "items": items(),
                "order_type": "delivery",
                "customer_name": "Dana",
                "customer_address": "1 Harbour Road"
            }),
        )
        .await;
    let order_id = order["id"].as_str().unwrap().to_string();

    let packages = app.send(Method::GET, "/api/courier/packages", Some(&courier), None).await;
    assert_eq!(packages.json().as_array().unwrap().len(), 1);

    let taken = app
        .send(
            Method::PUT,
            &format!("/api/courier/orders/{}/take", order_id),
            Some(&courier),
            None,
        )
        .await;
    assert_eq!(taken.status, StatusCode::OK);
    assert_eq!(taken.json()["courier_id"], courier_id.as_str());
    assert_eq!(taken.json()["status"], "preparing");

    let in_use = app
        .send(
            Method::DELETE,
            &format!("/api/couriers/{}", courier_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(in_use.status, StatusCode::CONFLICT);
    assert_eq!(in_use.json()["code"], 5003);

    let delivered = app
        .send(
            Method::PUT,
            &format!("/api/courier/orders/{}/deliver", order_id),
            Some(&courier),
            None,
        )
        .await;
    assert_eq!(delivered.status, StatusCode::OK);
    assert_eq!(delivered.json()["status"], "delivered");

    let stats = app.send(Method::GET, "/api/courier/my-stats", Some(&courier), None).await;
    let stats = stats.json();
    assert_eq!(stats["deliveries_today"], 1);
    assert_eq!(stats["active_orders"], 0);

    let couriers = app
        .send(Method::GET, "/api/couriers?available_only=true", Some(&admin), None)
        .await;
    assert_eq!(couriers.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_daily_export_clears_todays_orders() {
    let app = spawn_app(test_state()).await;
    let admin = app.admin_token().await;
    let table_id = app.create_table(&admin, 3).await;

    app.create_order(
        &admin,
        json!({ "items": items(), "order_type": "dine-in", "table_id": table_id }),
    )
    .await;
    app.create_order(&admin, json!({ "items": items(), "order_type": "takeaway" }))
        .await;

    let reply = app
        .send(Method::POST, "/api/admin/export/daily-and-clear", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(
        reply.headers[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(reply.headers["x-deleted-orders"], "2");
    assert!(reply.body.starts_with(b"PK"));

    let orders = app.send(Method::GET, "/api/orders", Some(&admin), None).await;
    assert!(orders.json().as_array().unwrap().is_empty());

    let tables = app.send(Method::GET, "/api/tables", Some(&admin), None).await;
    assert_eq!(tables.json()[0]["is_occupied"], false);
}

struct BrokenReports;

impl ReportRenderer for BrokenReports {
    fn render_report(
        &self,
        _title: &str,
        _file_stem: &str,
        _orders: &[Order],
    ) -> Result<RenderedDocument, ReportError> {
        Err(ReportError::Report("disk full".into()))
    }
}

#[tokio::test]
async fn test_failed_export_deletes_nothing() {
    let state = test_state().with_renderers(
        Arc::new(PdfReceiptRenderer::new("Test Bistro")),
        Arc::new(BrokenReports),
    );
    let app = spawn_app(state).await;
    let admin = app.admin_token().await;

    app.create_order(&admin, json!({ "items": items(), "order_type": "takeaway" }))
        .await;

    let reply = app
        .send(Method::POST, "/api/admin/export/daily-and-clear", Some(&admin), None)
        .await;
    assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(reply.json()["code"], 8002);
    assert!(!reply.headers.contains_key("x-deleted-orders"));

    let orders = app.send(Method::GET, "/api/orders", Some(&admin), None).await;
    assert_eq!(orders.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_catalog_hides_inactive_categories() {
    let app = spawn_app(test_state()).await;
    let admin = app.admin_token().await;

    let category = app
        .send(
            Method::POST,
            "/api/categories",
            Some(&admin),
            Some(json!({ "name": "Desserts" })),
        )
        .await
        .json();
    let category_id = category["id"].as_str().unwrap();

    let product = app
        .send(
            Method::POST,
            "/api/products",
            Some(&admin),
            Some(json!({ "name": "Tiramisu", "price": 6.5, "category_id": category_id })),
        )
        .await;
    assert_eq!(product.status, StatusCode::OK);

    let orphan = app
        .send(
            Method::POST,
            "/api/products",
            Some(&admin),
            Some(json!({ "name": "Ghost", "price": 1.0, "category_id": "missing" })),
        )
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);

    let listed = app.send(Method::GET, "/api/products", Some(&admin), None).await;
    assert_eq!(listed.json().as_array().unwrap().len(), 1);

    let removed = app
        .send(
            Method::DELETE,
            &format!("/api/categories/{}", category_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(removed.json()["is_active"], false);

    let listed = app.send(Method::GET, "/api/products", Some(&admin), None).await;
    assert!(listed.json().as_array().unwrap().is_empty());
    let all = app
        .send(Method::GET, "/api/products?available_only=false", Some(&admin), None)
        .await;
    assert_eq!(all.json().as_array().unwrap().len(), 1);
}
