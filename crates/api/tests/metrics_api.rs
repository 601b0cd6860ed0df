//! Scoped performance reports over HTTP.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_campaign, create_lead, get_auth, put_json_auth, seed_user};
use leadflow_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn report_is_scoped_to_the_caller(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let marketer = seed_user(&pool, "mona@leadflow.test", Role::Marketing).await;
    let sara = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let ali = seed_user(&pool, "ali@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    let campaign = create_campaign(app.clone(), &marketer.token, "Ramadan Promo").await;
    let won = create_lead(app.clone(), &sara.token, Some(campaign)).await;
    create_lead(app.clone(), &sara.token, Some(campaign)).await;
    create_lead(app.clone(), &ali.token, None).await;

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{won}"),
        json!({ "status": "closed-won", "sale_value": 6000.0 }),
        &sara.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app.clone(), "/api/v1/metrics", &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let all = body_json(response).await;
    assert_eq!(all["data"]["group_by"], "platform");
    assert_eq!(all["data"]["summary"]["total_leads"], 3);
    assert_eq!(all["data"]["summary"]["conversions"], 1);
    assert_eq!(all["data"]["summary"]["revenue"], 6000.0);

    let response = get_auth(app.clone(), "/api/v1/metrics", &sara.token).await;
    let own = body_json(response).await;
    assert_eq!(own["data"]["summary"]["total_leads"], 2);
    assert_eq!(own["data"]["summary"]["conversion_rate"], 50.0);

    let response = get_auth(app.clone(), "/api/v1/metrics", &marketer.token).await;
    assert_eq!(body_json(response).await["data"]["summary"]["total_leads"], 2);

    let response = get_auth(app, "/api/v1/metrics", &ali.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["summary"]["total_leads"], 1);
    assert_eq!(json["data"]["summary"]["revenue"], 0.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn campaign_grouping_carries_roi(pool: PgPool) {
    let marketer = seed_user(&pool, "mona@leadflow.test", Role::Marketing).await;
    let sara = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    let campaign = create_campaign(app.clone(), &marketer.token, "Ramadan Promo").await;
    let won = create_lead(app.clone(), &sara.token, Some(campaign)).await;
    put_json_auth(
        app.clone(),
        &format!("/api/v1/leads/{won}"),
        json!({ "status": "closed-won", "sale_value": 6000.0 }),
        &sara.token,
    )
    .await;

    let response = get_auth(
        app.clone(),
        "/api/v1/metrics?group_by=campaign",
        &marketer.token,
    )
    .await;
    let json = body_json(response).await;
    let group = &json["data"]["groups"][0];
    assert_eq!(group["key"], campaign.to_string());
    assert_eq!(group["label"], "Ramadan Promo");
    assert_eq!(group["budget"], 5000.0);
    assert_eq!(group["roi"], 20.0);

    let uri = format!("/api/v1/metrics/campaigns/{campaign}");
    let response = get_auth(app.clone(), &uri, &marketer.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let report = body_json(response).await;
    assert_eq!(report["data"]["leads"], 1);
    assert_eq!(report["data"]["roi"], 20.0);

    let response = get_auth(app, &uri, &sara.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_ranges_rejected(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        app.clone(),
        "/api/v1/metrics?from=2024-03-01&to=2024-02-01",
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        app.clone(),
        "/api/v1/metrics?from=2022-01-01&to=2024-01-01",
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        app,
        "/api/v1/metrics?from=2024-01-01&to=2024-01-07&group_by=day",
        &admin.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["groups"].as_array().unwrap().len(), 7);
}
