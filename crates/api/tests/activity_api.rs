//! Daily activity reporting and the weekly / team rollups.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, put_json_auth, seed_user};
use leadflow_core::roles::Role;
use serde_json::json;
use sqlx::PgPool;

fn report(date: &str, contacted: i32, calls: i32, qar: f64) -> serde_json::Value {
    json!({
        "activity_date": date,
        "leads_contacted": contacted,
        "calls_made": calls,
        "qar_closed": qar,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn daily_report_is_upserted(pool: PgPool) {
    let agent = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/activity/daily",
        report("2024-05-15", 4, 10, 0.0),
        &agent.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Refiling the same day replaces the counters.
    let mut corrected = report("2024-05-15", 5, 12, 800.0);
    corrected["notes"] = json!("Closed one gym membership");
    let response =
        put_json_auth(app.clone(), "/api/v1/activity/daily", corrected, &agent.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["calls_made"], 12);
    assert_eq!(json["data"]["notes"], "Closed one gym membership");

    let response = put_json_auth(
        app.clone(),
        "/api/v1/activity/daily",
        report("2024-05-13", 2, 6, 0.0),
        &agent.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, "/api/v1/activity/weekly?date=2024-05-15", &agent.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let week = body_json(response).await;
    assert_eq!(week["data"]["week_start"], "2024-05-13");
    assert_eq!(week["data"]["week_end"], "2024-05-19");
    assert_eq!(week["data"]["days"].as_array().unwrap().len(), 7);
    assert_eq!(week["data"]["days_reported"], 2);
    assert_eq!(week["data"]["totals"]["calls_made"], 18);
    assert_eq!(week["data"]["totals"]["qar_closed"], 800.0);
    assert_eq!(week["data"]["avg_calls_per_day"], 9.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_reports_rejected(pool: PgPool) {
    let agent = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let marketer = seed_user(&pool, "mona@leadflow.test", Role::Marketing).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/activity/daily",
        report("2024-05-15", -1, 10, 0.0),
        &agent.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/activity/daily",
        report("2024-05-15", i32::MAX, 10, 0.0),
        &agent.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app.clone(),
        "/api/v1/activity/daily",
        report("2999-01-01", 1, 1, 0.0),
        &agent.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app,
        "/api/v1/activity/daily",
        report("2024-05-15", 1, 1, 0.0),
        &marketer.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn team_rollup_is_admin_only_and_ranked(pool: PgPool) {
    let admin = seed_user(&pool, "admin@leadflow.test", Role::Admin).await;
    let sara = seed_user(&pool, "sara@leadflow.test", Role::Sales).await;
    let ali = seed_user(&pool, "ali@leadflow.test", Role::Sales).await;
    let app = common::build_test_app(pool);

    for (user, qar) in [(&sara, 300.0), (&ali, 900.0)] {
        let response = put_json_auth(
            app.clone(),
            "/api/v1/activity/daily",
            report("2024-05-15", 3, 8, qar),
            &user.token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(app.clone(), "/api/v1/activity/team?date=2024-05-15", &sara.token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app, "/api/v1/activity/team?date=2024-05-15", &admin.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let team = body_json(response).await;
    assert_eq!(team["data"]["agents_reported"], 2);
    assert_eq!(team["data"]["agents"][0]["user_id"], ali.id);
    assert_eq!(team["data"]["totals"]["qar_closed"], 1200.0);
    assert_eq!(team["data"]["totals"]["leads_contacted"], 6);
}
