// ==========================================
// 车队运营后台 - 配置管理器
// ==========================================
// 职责: 配置查询、覆写
// 存储: config_kv 表 (scope_id + key → value)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

/// 上传文件默认上限: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// 默认目标记账比例
pub const DEFAULT_TARGET_PERCENTAGE: f64 = 85.0;

/// 默认日期阈值
pub const DEFAULT_DATE_THRESHOLD: &str = "2024-12-01";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入 global 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取并解析配置,缺失或格式错误时返回默认值
    fn get_parsed_or_default<T, F>(&self, key: &str, default: T, parse: F) -> RepositoryResult<T>
    where
        F: Fn(&str) -> Option<T>,
    {
        let raw = match self.get_global_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };

        match parse(raw.trim()) {
            Some(value) => Ok(value),
            None => {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }
}

// ==========================================
// ImportConfigReader Trait 实现
// ==========================================
#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_max_upload_bytes(&self) -> RepositoryResult<usize> {
        self.get_parsed_or_default(
            config_keys::FUEL_IMPORT_MAX_UPLOAD_BYTES,
            DEFAULT_MAX_UPLOAD_BYTES,
            |v| v.parse::<usize>().ok().filter(|n| *n > 0),
        )
    }

    async fn get_restore_target_percentage(&self) -> RepositoryResult<f64> {
        self.get_parsed_or_default(
            config_keys::FLYPASS_RESTORE_TARGET_PERCENTAGE,
            DEFAULT_TARGET_PERCENTAGE,
            |v| {
                v.parse::<f64>()
                    .ok()
                    .filter(|p| p.is_finite() && (0.0..=100.0).contains(p))
            },
        )
    }

    async fn get_restore_date_threshold(&self) -> RepositoryResult<NaiveDate> {
        let default = NaiveDate::parse_from_str(DEFAULT_DATE_THRESHOLD, "%Y-%m-%d")
            .map_err(|e| RepositoryError::InternalError(e.to_string()))?;
        self.get_parsed_or_default(
            config_keys::FLYPASS_RESTORE_DATE_THRESHOLD,
            default,
            |v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok(),
        )
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 燃油导入
    pub const FUEL_IMPORT_MAX_UPLOAD_BYTES: &str = "fuel_import.max_upload_bytes";

    // Flypass 记账状态恢复
    pub const FLYPASS_RESTORE_TARGET_PERCENTAGE: &str = "flypass.restore.target_percentage";
    pub const FLYPASS_RESTORE_DATE_THRESHOLD: &str = "flypass.restore.date_threshold";
}
