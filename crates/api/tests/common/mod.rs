#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use leadflow_api::auth::jwt::{generate_access_token, JwtConfig};
use leadflow_api::auth::password::hash_password;
use leadflow_api::config::ServerConfig;
use leadflow_api::router::build_app_router;
use leadflow_api::state::AppState;
use leadflow_core::roles::{Role, UserStatus};
use leadflow_core::types::DbId;
use leadflow_db::models::user::CreateUser;
use leadflow_db::repositories::UserRepo;
use sqlx::PgPool;
use tower::ServiceExt;

/// Password given to every seeded user.
pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        bootstrap_admin: None,
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A seeded user plus a valid bearer token for them.
pub struct TestUser {
    pub id: DbId,
    pub token: String,
}

pub async fn seed_user_with_status(
    pool: &PgPool,
    email: &str,
    role: Role,
    status: UserStatus,
) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap().to_string(),
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role,
            status: Some(status),
        },
    )
    .await
    .unwrap();
    let token = generate_access_token(user.id, role, &test_config().jwt).unwrap();
    TestUser { id: user.id, token }
}

pub async fn seed_user(pool: &PgPool, email: &str, role: Role) -> TestUser {
    seed_user_with_status(pool, email, role, UserStatus::Active).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn campaign_body(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "product_name": "Gold Membership",
        "platforms": ["meta", "tiktok"],
        "budget": 5000.0,
        "start_date": "2024-01-01",
        "end_date": "2024-01-31",
    })
}

/// Create a campaign through the API and return its id.
pub async fn create_campaign(app: Router, token: &str, title: &str) -> DbId {
    let response = post_json_auth(app, "/api/v1/campaigns", campaign_body(title), token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a lead through the API and return its id.
pub async fn create_lead(app: Router, token: &str, campaign_id: Option<DbId>) -> DbId {
    let body = serde_json::json!({
        "full_name": "Noura Al-Thani",
        "phone": "+974 5555 1234",
        "platform": "meta",
        "campaign_id": campaign_id,
    });
    let response = post_json_auth(app, "/api/v1/leads", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
