// ==========================================
// FuelImportApi / FlypassApi 集成测试
// ==========================================
// 测试目标: 验证 API 层的错误映射与返回值
// ==========================================


use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::NaiveDate;
use fleet_ops::api::{FlypassApi, FuelImportApi};
use fleet_ops::app::AppState;
use test_helpers::{create_test_db, open_shared, seed_flypass, seed_vehicles};

const VALID_CSV: &str = "Fecha,Placa,Cantidad,Total,Proveedor\n15/01/2024,ABC123,50,200000,Terpel\n";

#[tokio::test]
async fn test_upload_then_list_recent() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_vehicles(&conn, &[("ABC123", true)]).unwrap();
    let api = FuelImportApi::new(conn.clone());

    let report = api
        .import_upload(Some("compras.csv".to_string()), Some(VALID_CSV.as_bytes().to_vec()))
        .await
        .unwrap();
    assert_eq!(report.summary.processed, 1);

    let recent = api.list_recent(None).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].vehicle.plate, "ABC123");
    assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
}

#[tokio::test]
async fn test_input_errors_are_bad_request() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let api = FuelImportApi::new(open_shared(&db_path).unwrap());

    let missing = api.import_upload(None, Some(vec![1, 2, 3])).await.unwrap_err();
    assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);

    let wrong_type = api
        .import_upload(Some("foto.png".to_string()), Some(vec![0x89, 0x50]))
        .await
        .unwrap_err();
    assert_eq!(wrong_type.status_code(), StatusCode::BAD_REQUEST);

    let empty = api
        .import_upload(Some("vacio.csv".to_string()), Some(Vec::new()))
        .await
        .unwrap_err();
    assert_eq!(empty.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(empty.into_response().status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_row_errors_still_return_report() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let api = FuelImportApi::new(open_shared(&db_path).unwrap());

    let report = api
        .import_upload(Some("compras.csv".to_string()), Some(VALID_CSV.as_bytes().to_vec()))
        .await
        .unwrap();

    assert_eq!(report.summary.processed, 0);
    assert_eq!(report.summary.errors, 1);
    assert_eq!(
        report.message,
        "Importación completada: 0 registros procesados, 1 errores"
    );
}

#[tokio::test]
async fn test_flypass_stats() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_flypass(&conn, 4, 1, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();

    let stats = FlypassApi::new(conn).accounted_stats().await.unwrap();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.accounted, 1);
    assert_eq!(stats.percentage, 25.0);
}

#[tokio::test]
async fn test_app_state_shares_one_connection() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path.clone()).unwrap();

    let template = state.fuel_import_api.template_csv().unwrap();
    assert!(template.starts_with("Fecha (dd/mm/aaaa),"));

    let stats = state.flypass_api.accounted_stats().await.unwrap();
    assert_eq!(stats.total, 0);
}
