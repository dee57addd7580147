// ==========================================
// 车队运营后台 - 运行配置读取 Trait
// ==========================================
// 职责: 定义导入与状态恢复所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use chrono::NaiveDate;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块 / 恢复脚本所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 燃油导入 =====

    /// 上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 10 MiB
    async fn get_max_upload_bytes(&self) -> RepositoryResult<usize>;

    // ===== Flypass 记账状态恢复 =====

    /// 目标记账比例（百分比）
    ///
    /// # 默认值
    /// - 85
    async fn get_restore_target_percentage(&self) -> RepositoryResult<f64>;

    /// 候选记录的创建时间上限（不含）
    ///
    /// # 默认值
    /// - 2024-12-01
    async fn get_restore_date_threshold(&self) -> RepositoryResult<NaiveDate>;
}
