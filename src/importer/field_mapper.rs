// ==========================================
// 车队运营后台 - 字段映射器实现
// ==========================================
// 职责: 表头同义词 → 列位置（读取表头时解析一次）
//       数据行 → 固定形态 ImportRow
// ==========================================

use crate::domain::fuel::ImportRow;
use crate::domain::types::CellValue;
use crate::importer::fuel_importer_trait::FieldMapper as FieldMapperTrait;
use serde::Serialize;

// 各逻辑字段接受的表头写法（按优先级排列）
pub const DATE_HEADERS: &[&str] = &["Fecha (dd/mm/aaaa)", "Fecha", "fecha", "FECHA", "Date"];
pub const PLATE_HEADERS: &[&str] = &[
    "Vehículo (Placa)",
    "Vehiculo (Placa)",
    "Placa",
    "placa",
    "Vehículo",
    "Vehiculo",
    "vehiculo",
];
pub const QUANTITY_HEADERS: &[&str] = &["Cantidad (Galones)", "Cantidad", "cantidad", "Galones"];
pub const TOTAL_HEADERS: &[&str] = &["Total ($)", "Total", "total", "Valor Total"];
pub const PROVIDER_HEADERS: &[&str] = &["Proveedor", "proveedor", "PROVEEDOR", "Estación"];

// ==========================================
// ColumnMap - 逻辑字段 → 列索引
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub plate: Option<usize>,
    pub quantity: Option<usize>,
    pub total: Option<usize>,
    pub provider: Option<usize>,
}

impl ColumnMap {
    /// 未找到的逻辑字段（用于日志提示）
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("fecha");
        }
        if self.plate.is_none() {
            missing.push("vehiculo");
        }
        if self.quantity.is_none() {
            missing.push("cantidad");
        }
        if self.total.is_none() {
            missing.push("total");
        }
        if self.provider.is_none() {
            missing.push("proveedor");
        }
        missing
    }
}

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn resolve_columns(&self, headers: &[String]) -> ColumnMap {
        ColumnMap {
            date: find_column(headers, DATE_HEADERS),
            plate: find_column(headers, PLATE_HEADERS),
            quantity: find_column(headers, QUANTITY_HEADERS),
            total: find_column(headers, TOTAL_HEADERS),
            provider: find_column(headers, PROVIDER_HEADERS),
        }
    }

    fn map_row(&self, columns: &ColumnMap, cells: &[CellValue], row_number: usize) -> ImportRow {
        let cell_at = |idx: Option<usize>| {
            idx.and_then(|i| cells.get(i))
                .cloned()
                .unwrap_or(CellValue::Empty)
        };

        ImportRow {
            date: cell_at(columns.date),
            plate: cell_at(columns.plate),
            quantity: cell_at(columns.quantity),
            total: cell_at(columns.total),
            provider: cell_at(columns.provider),
            row_number,
        }
    }
}

/// 按同义词顺序查找列
///
/// 先精确匹配,再做 TRIM + 忽略大小写匹配
fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            return Some(idx);
        }
    }

    for alias in aliases {
        let wanted = alias.to_lowercase();
        if let Some(idx) = headers
            .iter()
            .position(|h| h.trim().to_lowercase() == wanted)
        {
            return Some(idx);
        }
    }

    None
}
