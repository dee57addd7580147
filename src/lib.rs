// ==========================================
// 车队运营后台 - 核心库
// ==========================================
// 范围: 燃油采购表格导入 + Flypass 记账状态修复
// 技术栈: axum + Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 记账状态修复
pub mod engine;

// 导入层 - 燃油采购表格
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{
    AccountedStats, CellValue, FlypassCandidate, FuelImportReport, FuelPurchaseRecord,
    ImportRow, RestoreReport, RestoreRunResult, VehicleLookup, VehicleSummary,
};

// 引擎
pub use engine::{AccountedStatusRestorer, RestoreOptions};

// 导入
pub use importer::{FuelImporter, FuelImporterImpl, ImportError};

// API
pub use api::{ApiError, FlypassApi, FuelImportApi};

// ==========================================
// 系统常量
// ==========================================

/// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 系统名称
pub const APP_NAME: &str = "车队运营后台";
