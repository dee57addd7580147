// ==========================================
// 车队运营后台 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod flypass;
pub mod fuel;
pub mod types;
pub mod vehicle;

// 重导出核心类型
pub use flypass::{
    AccountedStats, FlypassCandidate, FlypassRecord, RestoreMode, RestoreReport, RestoreRunResult,
};
pub use fuel::{
    FuelImportReport, FuelPurchaseRecord, ImportRow, ImportSummary, NewFuelPurchase,
    ValidatedFuelPurchase,
};
pub use types::CellValue;
pub use vehicle::{VehicleLookup, VehicleSummary};
