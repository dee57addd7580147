// ==========================================
// 车队运营后台 - 引擎层
// ==========================================
// 职责: 实现数据修复规则,不拼 SQL
// ==========================================

pub mod accounted_status_restorer;

// 重导出核心引擎
pub use accounted_status_restorer::{
    target_accounted, AccountedStatusRestorer, RestoreOptions, RestoreTask, SAMPLE_SIZE,
};
