// ==========================================
// 车队运营后台 - 导入累计器
// ==========================================
// 职责: 逐行校验 → 落库 → 汇总为导入报告
// 约束: 严格按文件顺序处理; 单行落库失败只记为该行错误
// ==========================================

use crate::domain::fuel::{FuelImportReport, FuelPurchaseRecord, ImportRow};
use crate::domain::vehicle::VehicleLookup;
use crate::importer::fuel_importer_trait::RowValidator;
use crate::importer::row_error::{RowError, RowErrorKind};
use crate::repository::FuelPurchaseRepository;
use tracing::{debug, warn};

// ==========================================
// ImportAccumulator - 行结果累计
// ==========================================
#[derive(Debug, Default)]
pub struct ImportAccumulator {
    total_rows: usize,
    created: Vec<FuelPurchaseRecord>,
    row_errors: Vec<RowError>,
}

impl ImportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, record: FuelPurchaseRecord) {
        self.total_rows += 1;
        self.created.push(record);
    }

    pub fn record_failure(&mut self, row_number: usize, kind: RowErrorKind) {
        self.total_rows += 1;
        self.row_errors.push(RowError::new(row_number, kind));
    }

    pub fn processed(&self) -> usize {
        self.created.len()
    }

    pub fn errors(&self) -> usize {
        self.row_errors.len()
    }

    pub fn finish(self) -> FuelImportReport {
        FuelImportReport::new(self.total_rows, self.created, self.row_errors)
    }

    /// 处理全部行
    ///
    /// # 返回
    /// - FuelImportReport（行级错误不会中断处理）
    pub async fn run(
        rows: Vec<ImportRow>,
        lookup: &VehicleLookup,
        validator: &dyn RowValidator,
        repo: &dyn FuelPurchaseRepository,
    ) -> FuelImportReport {
        let mut acc = Self::new();

        for row in rows {
            let validated = match validator.validate(&row, lookup) {
                Ok(v) => v,
                Err(kind) => {
                    warn!(row_number = row.row_number, reason = %kind, "行校验失败");
                    acc.record_failure(row.row_number, kind);
                    continue;
                }
            };

            match repo.create(validated).await {
                Ok(record) => {
                    debug!(row_number = row.row_number, id = record.id, "行已保存");
                    acc.record_success(record);
                }
                Err(e) => {
                    warn!(row_number = row.row_number, error = %e, "行保存失败");
                    acc.record_failure(
                        row.row_number,
                        RowErrorKind::Persistence {
                            message: e.to_string(),
                        },
                    );
                }
            }
        }

        acc.finish()
    }
}
