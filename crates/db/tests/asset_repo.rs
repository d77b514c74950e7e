//! Asset inventory repository: CRUD, inventory ordering, bulk operations.

use sqlx::SqlitePool;

use helpdesk_core::asset::{STATUS_IN_USE, STATUS_UNVERIFIED};
use helpdesk_db::models::asset::{AssetFields, ImportAssetRow};
use helpdesk_db::repositories::AssetRepo;

fn asset(asset_no: &str, asset_type: &str) -> AssetFields {
    AssetFields {
        asset_no: asset_no.to_string(),
        asset_type: asset_type.to_string(),
        asset_model: None,
        serial_no: None,
        mac_address: None,
        hostname: None,
        owner_name: None,
        position: None,
        department: "ศพท.".to_string(),
        status: STATUS_IN_USE.to_string(),
        note: None,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_asset_no_is_unique_violation(pool: SqlitePool) {
    AssetRepo::create(&pool, &asset("A-1", "Computer")).await.unwrap();
    let err = AssetRepo::create(&pool, &asset("A-1", "Printer"))
        .await
        .unwrap_err();
    assert!(helpdesk_db::is_unique_violation(&err));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_delete(pool: SqlitePool) {
    let created = AssetRepo::create(&pool, &asset("A-1", "Computer")).await.unwrap();

    let mut changed = asset("A-1", "Notebook");
    changed.owner_name = Some("Nok".to_string());
    let updated = AssetRepo::update(&pool, created.id, &changed)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.asset_type, "Notebook");
    assert_eq!(updated.owner_name.as_deref(), Some("Nok"));

    assert!(AssetRepo::delete(&pool, created.id).await.unwrap());
    assert!(!AssetRepo::delete(&pool, created.id).await.unwrap());
    assert!(AssetRepo::find_by_id(&pool, created.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_uses_inventory_order(pool: SqlitePool) {
    for (no, ty) in [
        ("X/1", "Monitor"),
        ("UPS-1", "UPS"),
        ("D-1", "จอประชาสัมพันธ์"),
        ("P/10", "Printer"),
        ("P/2", "Printer"),
        ("C/OO1", "Computer"),
        ("IIC/12", "Computer"),
        ("CC/12", "Computer"),
    ] {
        AssetRepo::create(&pool, &asset(no, ty)).await.unwrap();
    }

    let listed = AssetRepo::list(&pool, None, None).await.unwrap();
    let order: Vec<&str> = listed.iter().map(|a| a.asset_no.as_str()).collect();
    assert_eq!(
        order,
        vec!["C/OO1", "IIC/12", "CC/12", "P/2", "P/10", "UPS-1", "D-1", "X/1"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters(pool: SqlitePool) {
    AssetRepo::create(&pool, &asset("A-1", "Computer")).await.unwrap();
    let mut other = asset("A-2", "Computer");
    other.department = "กกม.".to_string();
    other.status = STATUS_UNVERIFIED.to_string();
    AssetRepo::create(&pool, &other).await.unwrap();

    assert_eq!(AssetRepo::list(&pool, Some("กกม."), None).await.unwrap().len(), 1);
    assert_eq!(
        AssetRepo::list(&pool, None, Some(STATUS_IN_USE)).await.unwrap().len(),
        1
    );
    assert!(AssetRepo::list(&pool, Some("กกม."), Some(STATUS_IN_USE))
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_status_only_touches_in_use(pool: SqlitePool) {
    AssetRepo::create(&pool, &asset("A-1", "Computer")).await.unwrap();
    AssetRepo::create(&pool, &asset("A-2", "Computer")).await.unwrap();
    let mut broken = asset("A-3", "Computer");
    broken.status = "ชำรุด".to_string();
    AssetRepo::create(&pool, &broken).await.unwrap();

    assert_eq!(AssetRepo::reset_status(&pool).await.unwrap(), 2);

    let a3 = AssetRepo::find_by_asset_no(&pool, "A-3").await.unwrap().unwrap();
    assert_eq!(a3.status, "ชำรุด");
    let a1 = AssetRepo::find_by_asset_no(&pool, "A-1").await.unwrap().unwrap();
    assert_eq!(a1.status, STATUS_UNVERIFIED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_skips_duplicates_and_blank_rows(pool: SqlitePool) {
    AssetRepo::create(&pool, &asset("A-1", "Computer")).await.unwrap();

    let rows: Vec<_> = ["A-1", "A-2", "  ", "A-3", "A-2"]
        .iter()
        .map(|no| {
            ImportAssetRow {
                asset_no: no.to_string(),
                asset_type: "Printer".to_string(),
                ..ImportAssetRow::default()
            }
            .to_fields("กกม.")
        })
        .collect();

    let outcome = AssetRepo::import(&pool, &rows).await.unwrap();
    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.skipped, 3);

    let imported = AssetRepo::list(&pool, Some("กกม."), None).await.unwrap();
    assert_eq!(imported.len(), 2);
    assert!(imported.iter().all(|a| a.status == STATUS_IN_USE));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_type_pairs_filter_by_asset_no(pool: SqlitePool) {
    AssetRepo::create(&pool, &asset("7440-001", "Computer")).await.unwrap();
    AssetRepo::create(&pool, &asset("7440-002", "Printer")).await.unwrap();
    AssetRepo::create(&pool, &asset("6000-001", "UPS")).await.unwrap();

    assert_eq!(AssetRepo::type_pairs(&pool, None).await.unwrap().len(), 3);
    let filtered = AssetRepo::type_pairs(&pool, Some("7440")).await.unwrap();
    assert_eq!(filtered.len(), 2);
}
