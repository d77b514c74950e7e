//! HTTP-level tests for the `/assets` resource.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, encode, get_auth, post_auth, post_json_auth, put_json_auth, TestApp};
use serde_json::{json, Value};
use sqlx::SqlitePool;

fn asset_body(asset_no: &str, asset_type: &str, department: &str) -> Value {
    json!({
        "asset_no": asset_no,
        "asset_type": asset_type,
        "asset_model": "ThinkCentre",
        "owner_name": "Nok",
        "department": department,
    })
}

async fn create(t: &TestApp, body: Value) -> Value {
    let response = post_json_auth(t.app(), "/api/v1/assets", body, &t.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_trims_and_defaults_status(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let asset = create(&t, asset_body("  C/001  ", "Computer", "ศพท.")).await;
    assert_eq!(asset["asset_no"], "C/001");
    assert_eq!(asset["status"], "ใช้งาน");
    assert_eq!(asset["owner_name"], "Nok");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_asset_no_is_409(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    create(&t, asset_body("C/001", "Computer", "ศพท.")).await;

    let response = post_json_auth(
        t.app(),
        "/api/v1/assets",
        asset_body("C/001", "Notebook", "กกม."),
        &t.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_validates_required_fields(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    for body in [
        asset_body("C/001", "Computer", "XYZ"),
        asset_body("   ", "Computer", "ศพท."),
        json!({ "asset_no": "C/001", "department": "ศพท." }),
    ] {
        let response = post_json_auth(t.app(), "/api/v1/assets", body, &t.token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_update_delete_round(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    let asset = create(&t, asset_body("C/001", "Computer", "ศพท.")).await;
    let id = asset["id"].as_i64().unwrap();
    let uri = format!("/api/v1/assets/{id}");

    let mut body = asset_body("C/001", "Notebook", "กกม.");
    body["status"] = json!("ยังไม่ได้ตรวจสอบ");
    let response = put_json_auth(t.app(), &uri, body, &t.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await["data"].clone();
    assert_eq!(updated["asset_type"], "Notebook");
    assert_eq!(updated["status"], "ยังไม่ได้ตรวจสอบ");

    let response = get_auth(t.app(), &uri, &t.token).await;
    assert_eq!(body_json(response).await["data"]["department"], "กกม.");

    let response = delete_auth(t.app(), &uri, &t.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(t.app(), &uri, &t.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = delete_auth(t.app(), &uri, &t.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_uses_inventory_order_and_filters(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    create(&t, asset_body("P/10", "Printer", "ศพท.")).await;
    create(&t, asset_body("X/1", "Router", "ศพท.")).await;
    create(&t, asset_body("C/001", "Computer", "ศพท.")).await;
    create(&t, asset_body("P/2", "Printer", "กกม.")).await;

    let json = body_json(get_auth(t.app(), "/api/v1/assets", &t.token).await).await;
    let order: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["asset_no"].as_str().unwrap())
        .collect();
    assert_eq!(order, ["C/001", "P/2", "P/10", "X/1"]);

    let uri = format!("/api/v1/assets?dept={}", encode("กกม."));
    let json = body_json(get_auth(t.app(), &uri, &t.token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reset_status_marks_in_use_assets_unverified(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    create(&t, asset_body("C/001", "Computer", "ศพท.")).await;
    create(&t, asset_body("C/002", "Computer", "ศพท.")).await;
    let mut broken = asset_body("C/003", "Computer", "ศพท.");
    broken["status"] = json!("ชำรุด");
    create(&t, broken).await;

    let response = post_auth(t.app(), "/api/v1/assets/reset-status", &t.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["updated"], 2);

    let uri = format!("/api/v1/assets?status={}", encode("ยังไม่ได้ตรวจสอบ"));
    let json = body_json(get_auth(t.app(), &uri, &t.token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_resolves_department_and_skips_bad_rows(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    create(&t, asset_body("C/001", "Computer", "ศพท.")).await;

    let body = json!({
        "department": "ศูนย์ข้อมูลและพัฒนาระบบเทคโนโลยีสารสนเทศ",
        "rows": [
            { "asset_no": "C/001", "asset_type": "Computer" },
            { "asset_no": "N/001", "asset_type": "Notebook" },
            { "asset_no": "", "asset_type": "Printer" },
            { "asset_no": "N/002", "asset_type": "Notebook" },
        ],
    });
    let response = post_json_auth(t.app(), "/api/v1/assets/import", body, &t.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["imported"], 2);
    assert_eq!(json["data"]["skipped"], 2);

    let json = body_json(get_auth(t.app(), "/api/v1/assets", &t.token).await).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|a| a["department"] == "ศพท."));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_rejects_unknown_department(pool: SqlitePool) {
    let t = common::build_test_app(pool);

    let body = json!({ "department": "Nowhere", "rows": [{ "asset_no": "A/1", "asset_type": "UPS" }] });
    let response = post_json_auth(t.app(), "/api/v1/assets/import", body, &t.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_counts_and_detail_lookup(pool: SqlitePool) {
    let t = common::build_test_app(pool);
    create(&t, asset_body("C/001", "Computer", "ศพท.")).await;
    create(&t, asset_body("C/002", "Computer", "กกม.")).await;
    create(&t, asset_body("U/001", "UPS", "ศพท.")).await;

    let json = body_json(get_auth(t.app(), "/api/v1/assets/summary", &t.token).await).await;
    let summary = &json["data"]["summary"];
    assert_eq!(summary["grand_total"], 3);
    assert_eq!(summary["type_total"]["Computer"], 2);
    assert_eq!(summary["departments"]["ศพท."]["total"], 2);
    assert_eq!(summary["types"], json!(["Computer", "UPS"]));
    assert!(json["data"]["detail"].is_null());

    let json = body_json(get_auth(t.app(), "/api/v1/assets/summary?q=C%2F002", &t.token).await).await;
    assert_eq!(json["data"]["summary"]["grand_total"], 1);
    assert_eq!(json["data"]["detail"]["department"], "กกม.");
}
