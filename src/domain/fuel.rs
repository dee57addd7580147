// ==========================================
// 车队运营后台 - 燃油采购领域模型
// ==========================================
// 职责: 导入行 / 校验结果 / 持久化实体 / 导入报告
// 红线: 不含数据访问逻辑
// ==========================================

use crate::domain::types::CellValue;
use crate::domain::vehicle::VehicleSummary;
use crate::importer::row_error::RowError;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// ImportRow - 导入中间结构体
// ==========================================
// 用途: 文件解析 → 字段映射后的固定形态行
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    pub date: CellValue,
    pub plate: CellValue,
    pub quantity: CellValue,
    pub total: CellValue,
    pub provider: CellValue,

    // 元信息
    pub row_number: usize, // 表格行号（数据行索引 + 2）
}

// ==========================================
// ValidatedFuelPurchase - 校验通过的记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedFuelPurchase {
    pub date: NaiveDate,
    pub vehicle_id: i64,
    pub quantity: f64,
    pub total: f64,
    pub provider: String,
}

// 持久化协作方的入参形态与校验结果一致
pub type NewFuelPurchase = ValidatedFuelPurchase;

// ==========================================
// FuelPurchaseRecord - 燃油采购实体
// ==========================================
// 对齐: fuel_purchases 表（JOIN vehicles 取车辆摘要）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelPurchaseRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub vehicle_id: i64,
    pub quantity: f64,
    pub total: f64,
    pub provider: String,
    pub created_at: NaiveDateTime,
    pub vehicle: VehicleSummary,
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub total_rows: usize,
    pub processed: usize,
    pub errors: usize,
}

// ==========================================
// FuelImportReport - 导入报告
// ==========================================
// 用途: 导入接口返回值（HTTP 200 响应体）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelImportReport {
    pub message: String,
    pub summary: ImportSummary,
    pub details: Vec<String>,              // "Fila {n}: {reason}"
    pub created: Vec<FuelPurchaseRecord>,

    // 结构化行错误（仅供程序内部判断错误类型）
    #[serde(skip)]
    pub row_errors: Vec<RowError>,
}

impl FuelImportReport {
    /// 由行结果构造报告（details 在此处统一渲染）
    pub fn new(total_rows: usize, created: Vec<FuelPurchaseRecord>, row_errors: Vec<RowError>) -> Self {
        let summary = ImportSummary {
            total_rows,
            processed: created.len(),
            errors: row_errors.len(),
        };
        let message = format!(
            "Importación completada: {} registros procesados, {} errores",
            summary.processed, summary.errors
        );
        let details = row_errors.iter().map(|e| e.to_string()).collect();

        Self {
            message,
            summary,
            details,
            created,
            row_errors,
        }
    }
}
