// ==========================================
// 车队运营后台 - 配置层
// ==========================================
// 职责: 运行配置读取（导入上限 / 恢复参数）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
