//! Login, token handling and admin user management over HTTP.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_lead, delete_auth, get, get_auth, post_json, post_json_auth, put_json_auth,
    seed_user, seed_user_with_status, TEST_PASSWORD,
};
use leadflow_core::roles::{Role, UserStatus};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_returns_token_and_user(pool: PgPool) {
    let agent = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    // Email lookup ignores case.
    let body = json!({ "email": "Sara@LeadFlow.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], agent.id);
    assert_eq!(json["user"]["role"], "sales");
    assert!(json["user"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_is_unauthorized(pool: PgPool) {
    seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "sara@leadflow.test", "password": "not-the-password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_email_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "email": "ghost@leadflow.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_account_cannot_log_in(pool: PgPool) {
    seed_user_with_status(&pool, "old@leadflow.test", Role::Sales, UserStatus::Inactive).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "old@leadflow.test", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_requires_a_token(pool: PgPool) {
    let marketer = seed_user(&pool, "mona@leadflow.test", Role::Marketing).await;
    let app = common::build_test_app(pool);

    let response = get(app.clone(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.clone(), "/api/v1/auth/me", "garbage").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app, "/api/v1/auth/me", &marketer.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["email"], "mona@leadflow.test");
    assert_eq!(json["data"]["role"], "marketing");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_manages_users(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Khalid",
        "email": "khalid@leadflow.test",
        "password": "long-enough-pass",
        "role": "sales",
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["status"], "active");

    // Duplicate email hits the unique constraint.
    let body = json!({
        "name": "Khalid Again",
        "email": "khalid@leadflow.test",
        "password": "long-enough-pass",
        "role": "sales",
    });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{id}"),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/admin/users/{id}"), &admin.token).await;
    assert_eq!(body_json(response).await["data"]["status"], "inactive");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn weak_password_and_bad_email_rejected(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let app = common::build_test_app(pool);

    let body = json!({ "name": "A", "email": "a@leadflow.test", "password": "short", "role": "sales" });
    let response = post_json_auth(app.clone(), "/api/v1/admin/users", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "name": "A", "email": "not-an-email", "password": "long-enough-pass", "role": "sales" });
    let response = post_json_auth(app, "/api/v1/admin/users", body, &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_demote_self(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let app = common::build_test_app(pool);

    let uri = format!("/api/v1/admin/users/{}", admin.id);
    let response = put_json_auth(app.clone(), &uri, json!({ "role": "sales" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete_auth(app, &uri, &admin.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_manage_users(pool: PgPool) {
    let marketer = seed_user(&pool, "mona@leadflow.test", Role::Marketing).await;
    let agent = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    for token in [&marketer.token, &agent.token] {
        let response = get_auth(app.clone(), "/api/v1/admin/users", token).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    // The agent picker is open to marketing but not to sales.
    let response = get_auth(app.clone(), "/api/v1/users/agents", &marketer.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let agents = body_json(response).await;
    assert_eq!(agents["data"].as_array().unwrap().len(), 1);
    assert_eq!(agents["data"][0]["id"], agent.id);

    let response = get_auth(app, "/api/v1/users/agents", &agent.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_resets_a_password(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let agent = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/admin/users/{}/reset-password", agent.id);

    let response =
        post_json_auth(app.clone(), &uri, json!({ "new_password": "short" }), &admin.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json!({ "new_password": "fresh-pipeline-2024" });
    let response = post_json_auth(app.clone(), &uri, body.clone(), &agent.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(app.clone(), &uri, body.clone(), &admin.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let old = json!({ "email": "sara@leadflow.test", "password": TEST_PASSWORD });
    let response = post_json(app.clone(), "/api/v1/auth/login", old).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let new = json!({ "email": "sara@leadflow.test", "password": "fresh-pipeline-2024" });
    let response = post_json(app.clone(), "/api/v1/auth/login", new).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(
        app,
        "/api/v1/admin/users/999999/reset-password",
        body,
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn account_changes_apply_to_issued_tokens(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let marketer = seed_user(&pool, "mona@leadflow.test", Role::Marketing).await;
    let agent = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);
    let lead = create_lead(app.clone(), &agent.token, None).await;

    let response = delete_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", agent.id),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{lead}"),
        json!({ "status": "contacted" }),
        &agent.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let response = get_auth(app.clone(), "/api/v1/auth/me", &agent.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // A role change is picked up without logging in again.
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/admin/users/{}", marketer.id),
        json!({ "role": "sales" }),
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = get_auth(app.clone(), "/api/v1/users/agents", &marketer.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), &format!("/api/v1/leads/{lead}"), &admin.token).await;
    assert_eq!(body_json(response).await["data"]["status"], "new");
}
