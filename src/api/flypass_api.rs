// ==========================================
// 车队运营后台 - Flypass API
// ==========================================
// 职责: 记账状态统计查询（只读）
// ==========================================

use crate::api::error::ApiResult;
use crate::domain::flypass::AccountedStats;
use crate::repository::{FlypassRepository, FlypassRepositoryImpl};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Flypass API
pub struct FlypassApi {
    repo: FlypassRepositoryImpl,
}

impl FlypassApi {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            repo: FlypassRepositoryImpl::from_connection(conn),
        }
    }

    /// 当前记账统计
    pub async fn accounted_stats(&self) -> ApiResult<AccountedStats> {
        Ok(self.repo.stats().await?)
    }
}
