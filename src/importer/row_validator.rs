// ==========================================
// 车队运营后台 - 行校验器实现
// ==========================================
// 职责: ImportRow + 有效车辆索引 → 校验通过的记录 / 拒绝原因
// 顺序: 必填 → 日期 → 车牌 → 数量 → 总额（首个失败项即返回）
// 约束: 全有或全无,不修改输入,可重复调用
// ==========================================

use crate::domain::fuel::{ImportRow, ValidatedFuelPurchase};
use crate::domain::types::CellValue;
use crate::domain::vehicle::VehicleLookup;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::date_normalizer;
use crate::importer::fuel_importer_trait::{DataCleaner as _, RowValidator};
use crate::importer::row_error::RowErrorKind;

pub struct RowValidatorImpl {
    cleaner: DataCleaner,
}

impl RowValidatorImpl {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 收集缺失的必填字段（按表头顺序）
    fn missing_fields(row: &ImportRow) -> Vec<String> {
        [
            ("fecha", &row.date),
            ("vehiculo", &row.plate),
            ("cantidad", &row.quantity),
            ("total", &row.total),
            ("proveedor", &row.provider),
        ]
        .iter()
        .filter(|(_, cell)| cell.is_blank())
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

impl Default for RowValidatorImpl {
    fn default() -> Self {
        Self::new()
    }
}

impl RowValidator for RowValidatorImpl {
    fn validate(
        &self,
        row: &ImportRow,
        lookup: &VehicleLookup,
    ) -> Result<ValidatedFuelPurchase, RowErrorKind> {
        // 1. 必填字段
        let missing = Self::missing_fields(row);
        if !missing.is_empty() {
            return Err(RowErrorKind::MissingFields { fields: missing });
        }

        // 2. 日期
        let date = date_normalizer::normalize(&row.date)?;

        // 3. 车牌 → 车辆
        let plate = VehicleLookup::normalize_plate(&row.plate.to_string());
        let vehicle_id = lookup
            .resolve(&plate)
            .ok_or_else(|| RowErrorKind::UnknownVehicle {
                plate: plate.clone(),
            })?;

        // 4. 数量 > 0
        let quantity = self
            .cleaner
            .parse_positive(&row.quantity)
            .ok_or_else(|| RowErrorKind::InvalidQuantity {
                value: display_value(&row.quantity),
            })?;

        // 5. 总额 > 0
        let total = self
            .cleaner
            .parse_positive(&row.total)
            .ok_or_else(|| RowErrorKind::InvalidTotal {
                value: display_value(&row.total),
            })?;

        Ok(ValidatedFuelPurchase {
            date,
            vehicle_id,
            quantity,
            total,
            provider: self.cleaner.clean_text(&row.provider.to_string(), false),
        })
    }
}

fn display_value(cell: &CellValue) -> String {
    cell.to_string().trim().to_string()
}
