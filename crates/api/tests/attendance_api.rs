//! HTTP-level tests for the `/attendance` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json_auth, put_json_auth, PNG_DATA_URL};
use helpdesk_core::clock;
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_in_creates_todays_row(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let response = post_json_auth(
        t.app(),
        "/api/v1/attendance/check-in",
        json!({ "staff_name": " Somchai " }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let row = body_json(response).await["data"].clone();
    assert_eq!(row["staff_name"], "Somchai");
    assert_eq!(row["work_date"], clock::civil_now().date().to_string());
    assert!(row["time_in"].is_string());
    assert!(row["time_out"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_check_in_keeps_one_row(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    for _ in 0..2 {
        let response = post_json_auth(
            t.app(),
            "/api/v1/attendance/check-in",
            json!({ "staff_name": "Somchai" }),
            &t.token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = body_json(get_auth(t.app(), "/api/v1/attendance?staff_name=Somchai", &t.token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_out_without_check_in_is_a_no_op(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let response = post_json_auth(
        t.app(),
        "/api/v1/attendance/check-out",
        json!({ "staff_name": "Somchai" }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], false);
    assert!(json["data"]["attendance"].is_null());

    let json = body_json(get_auth(t.app(), "/api/v1/attendance", &t.token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn check_out_after_check_in_sets_time_out(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    let body = json!({ "staff_name": "Somchai" });
    post_json_auth(t.app(), "/api/v1/attendance/check-in", body.clone(), &t.token).await;

    let response = post_json_auth(t.app(), "/api/v1/attendance/check-out", body, &t.token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], true);
    assert!(json["data"]["attendance"]["time_out"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_staff_name_is_rejected(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let response = post_json_auth(
        t.app(),
        "/api/v1/attendance/check-in",
        json!({ "staff_name": "  " }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_month(pool: SqlitePool) {
    sqlx::query(
        "INSERT INTO attendance (staff_name, work_date, time_in) VALUES \
         ('Somchai', '2024-02-01', '08:30:00'), \
         ('Dao', '2024-02-03', '08:45:00'), \
         ('Somchai', '2024-03-01', '08:30:00')",
    )
    .execute(&pool)
    .await
    .unwrap();
    let t = common::build_test_app(pool);

    let json = body_json(get_auth(t.app(), "/api/v1/attendance?year=2024&month=2", &t.token).await).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["staff_name"], "Dao");
    assert_eq!(rows[1]["work_date"], "2024-02-01");

    let uri = "/api/v1/attendance?year=2024&month=2&staff_name=Somchai";
    let json = body_json(get_auth(t.app(), uri, &t.token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = get_auth(t.app(), "/api/v1/attendance?year=2024&month=13", &t.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_signature_is_stored_under_staff_dir(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let response = put_json_auth(
        t.app(),
        "/api/v1/attendance/signatures/Somchai",
        json!({ "signature": PNG_DATA_URL }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["bytes"], 16);
    assert!(t.staff_signature_path("Somchai").exists());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_signatures_are_not_publicly_served(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    let response = put_json_auth(
        t.app(),
        "/api/v1/attendance/signatures/Somchai",
        json!({ "signature": PNG_DATA_URL }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    for uri in [
        "/signatures/staff/Somchai.png",
        "/signatures/Somchai.png",
        "/signatures/../staff/Somchai.png",
    ] {
        let response = get(t.app(), uri).await;
        assert_ne!(response.status(), StatusCode::OK, "{uri} must not be served");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_staff_signature_is_rejected(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let response = put_json_auth(
        t.app(),
        "/api/v1/attendance/signatures/Somchai",
        json!({ "signature": "data:image/png;base64,bm90IGEgcG5n" }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        t.app(),
        "/api/v1/attendance/signatures/..%2Fescape",
        json!({ "signature": PNG_DATA_URL }),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!t.storage_dir.path().join("escape.png").exists());
    assert!(t.stored_signatures().is_empty());
}
