// ==========================================
// FuelImporter 集成测试
// ==========================================
// 测试目标: 验证从上传字节到数据库的完整导入流程
// ==========================================


use chrono::NaiveDate;
use fleet_ops::config::{config_keys, ConfigManager};
use fleet_ops::importer::{FuelImporter, FuelImporterImpl, ImportError, RowErrorKind};
use fleet_ops::logging;
use fleet_ops::repository::{
    FuelPurchaseRepository, FuelPurchaseRepositoryImpl, VehicleRepositoryImpl,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use test_helpers::{build_fuel_workbook, create_test_db, open_shared, seed_vehicles};

type TestImporter =
    FuelImporterImpl<VehicleRepositoryImpl, FuelPurchaseRepositoryImpl, ConfigManager>;

/// 创建测试用的 FuelImporter 实例
fn create_test_importer(conn: &Arc<Mutex<Connection>>) -> TestImporter {
    FuelImporterImpl::with_defaults(
        VehicleRepositoryImpl::from_connection(conn.clone()),
        FuelPurchaseRepositoryImpl::from_connection(conn.clone()),
        ConfigManager::from_connection(conn.clone()),
    )
}

const HEADER: &str = "Fecha (dd/mm/aaaa),Vehículo (Placa),Cantidad (Galones),Total ($),Proveedor\n";

#[tokio::test]
async fn test_import_single_valid_row() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    let vehicles = seed_vehicles(&conn, &[("ABC123", true)]).unwrap();

    let importer = create_test_importer(&conn);
    let csv = format!("{}15/01/2024,ABC123,50,200000,Terpel\n", HEADER);
    let report = importer
        .import_from_bytes("compras.csv", csv.into_bytes())
        .await
        .unwrap();

    assert_eq!(report.summary.total_rows, 1);
    assert_eq!(report.summary.processed, 1);
    assert_eq!(report.summary.errors, 0);
    assert!(report.details.is_empty());

    let record = &report.created[0];
    assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(record.vehicle_id, vehicles[0].1);
    assert_eq!(record.vehicle.plate, "ABC123");
    assert_eq!(record.quantity, 50.0);
    assert_eq!(record.total, 200000.0);
    assert_eq!(record.provider, "Terpel");

    assert_eq!(importer.purchase_repo().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_import_fixture_with_mixed_errors() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_vehicles(&conn, &[("ABC123", true), ("DEF456", true)]).unwrap();

    let importer = create_test_importer(&conn);
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fuel_purchases.csv");
    let report = importer.import_from_path(&path).await.unwrap();

    assert_eq!(report.summary.total_rows, 6);
    assert_eq!(report.summary.processed, 2);
    assert_eq!(report.summary.errors, 4);

    // 行号与文件顺序一致（表头为第 1 行）
    let rows: Vec<usize> = report.row_errors.iter().map(|e| e.row_number).collect();
    assert_eq!(rows, vec![4, 5, 6, 7]);

    assert_eq!(
        report.details[0],
        "Fila 4: Vehículo con placa ZZZ999 no encontrado o inactivo"
    );
    assert!(matches!(
        report.row_errors[1].kind,
        RowErrorKind::InvalidDate(_)
    ));
    assert_eq!(report.details[2], "Fila 6: Cantidad inválida: 0");
    assert!(matches!(
        &report.row_errors[3].kind,
        RowErrorKind::MissingFields { fields } if fields == &vec!["total".to_string()]
    ));

    // 序列号 45306 = 2024-01-15，小写车牌匹配
    assert_eq!(report.created[1].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    assert_eq!(report.created[1].vehicle.plate, "ABC123");
    assert_eq!(importer.purchase_repo().count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_inactive_vehicle_is_rejected() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_vehicles(&conn, &[("XYZ789", false)]).unwrap();

    let importer = create_test_importer(&conn);
    let csv = format!("{}15/01/2024,XYZ789,10,40000,Terpel\n", HEADER);
    let report = importer
        .import_from_bytes("compras.csv", csv.into_bytes())
        .await
        .unwrap();

    assert_eq!(report.summary.processed, 0);
    assert_eq!(
        report.details,
        vec!["Fila 2: Vehículo con placa XYZ789 no encontrado o inactivo".to_string()]
    );
}

#[tokio::test]
async fn test_header_synonyms() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_vehicles(&conn, &[("ABC123", true)]).unwrap();

    let importer = create_test_importer(&conn);
    let csv = " fecha ,PLACA,Galones,Valor Total,Estación\n2024-02-29,ABC123,5,21000,EDS Norte\n";
    let report = importer
        .import_from_bytes("compras.csv", csv.as_bytes().to_vec())
        .await
        .unwrap();

    assert_eq!(report.summary.processed, 1, "details: {:?}", report.details);
    assert_eq!(report.created[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(report.created[0].provider, "EDS Norte");
}

#[tokio::test]
async fn test_empty_file_is_input_error() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();

    let importer = create_test_importer(&conn);
    let result = importer
        .import_from_bytes("compras.csv", HEADER.as_bytes().to_vec())
        .await;

    assert!(matches!(result, Err(ImportError::EmptySheet)));
}

#[tokio::test]
async fn test_unsupported_extension() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();

    let importer = create_test_importer(&conn);
    let result = importer
        .import_from_bytes("compras.pdf", b"%PDF-1.4".to_vec())
        .await;

    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_upload_size_limit_from_config() {
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_vehicles(&conn, &[("ABC123", true)]).unwrap();

    ConfigManager::from_connection(conn.clone())
        .set_global_config_value(config_keys::FUEL_IMPORT_MAX_UPLOAD_BYTES, "16")
        .unwrap();

    let importer = create_test_importer(&conn);
    let csv = format!("{}15/01/2024,ABC123,50,200000,Terpel\n", HEADER);
    let result = importer.import_from_bytes("compras.csv", csv.into_bytes()).await;

    assert!(matches!(
        result,
        Err(ImportError::FileTooLarge { max_bytes: 16, .. })
    ));
    assert_eq!(importer.purchase_repo().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_import_xlsx_date_cells() {
    logging::init_test();
    let (_tmp, db_path) = create_test_db().unwrap();
    let conn = open_shared(&db_path).unwrap();
    seed_vehicles(&conn, &[("ABC123", true)]).unwrap();

    let importer = create_test_importer(&conn);
    let bytes = build_fuel_workbook().unwrap();
    let report = importer.import_from_bytes("compras.xlsx", bytes).await.unwrap();

    // 只读取第一张表
    assert_eq!(report.summary.total_rows, 3, "details: {:?}", report.details);
    assert_eq!(report.summary.processed, 3, "details: {:?}", report.details);
    assert_eq!(report.summary.errors, 0);

    let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    for record in &report.created {
        assert_eq!(record.date, expected);
        assert_eq!(record.vehicle.plate, "ABC123");
    }
    let quantities: Vec<f64> = report.created.iter().map(|r| r.quantity).collect();
    assert_eq!(quantities, vec![10.0, 20.0, 30.0]);
}
