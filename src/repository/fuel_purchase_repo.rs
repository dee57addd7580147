// ==========================================
// 车队运营后台 - 燃油采购 Repository Trait
// ==========================================
// 职责: 定义燃油采购数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::fuel::{FuelPurchaseRecord, NewFuelPurchase};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// FuelPurchaseRepository Trait
// ==========================================
// 用途: 导入累计器的持久化协作方
// 实现者: FuelPurchaseRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait FuelPurchaseRepository: Send + Sync {
    /// 新增一条燃油采购记录
    ///
    /// # 返回
    /// - Ok(FuelPurchaseRecord): 含车辆摘要的持久化记录
    /// - Err: 数据库错误（仅影响当前行）
    async fn create(&self, purchase: NewFuelPurchase) -> RepositoryResult<FuelPurchaseRecord>;

    /// 最近创建的记录（按 id 倒序）
    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<FuelPurchaseRecord>>;

    /// 记录总数
    async fn count(&self) -> RepositoryResult<i64>;
}
