// ==========================================
// 车队运营后台 - 数据仓储层
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod error;
pub mod flypass_repo;
pub mod fuel_purchase_repo;
pub mod fuel_purchase_repo_impl;
pub mod vehicle_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use flypass_repo::{FlypassRepository, FlypassRepositoryImpl};
pub use fuel_purchase_repo::FuelPurchaseRepository;
pub use fuel_purchase_repo_impl::FuelPurchaseRepositoryImpl;
pub use vehicle_repo::{VehicleRepository, VehicleRepositoryImpl};
