// ==========================================
// 车队运营后台 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{FlypassApi, FuelImportApi};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "FLEET_OPS_DB_PATH";

/// 监听地址环境变量
pub const BIND_ADDR_ENV: &str = "FLEET_OPS_BIND";

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// 应用状态
///
/// 包含所有API实例和共享资源，由 axum Router 以 Arc 共享
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 燃油采购导入API
    pub fuel_import_api: Arc<FuelImportApi>,

    /// Flypass API
    pub flypass_api: Arc<FlypassApi>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// 打开（必要时创建）数据库并建表
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)?;
        init_schema(&conn)?;

        Ok(Self::from_connection(db_path, conn))
    }

    /// 从已打开并建表的连接创建（测试使用内存库）
    pub fn from_connection(db_path: String, conn: Connection) -> Self {
        match read_schema_version(&conn) {
            Ok(Some(v)) if v != CURRENT_SCHEMA_VERSION => {
                tracing::warn!(found = v, expected = CURRENT_SCHEMA_VERSION, "schema_version 不一致");
            }
            Err(e) => tracing::warn!(error = %e, "读取 schema_version 失败"),
            _ => {}
        }

        let conn = Arc::new(Mutex::new(conn));

        Self {
            db_path,
            fuel_import_api: Arc::new(FuelImportApi::new(conn.clone())),
            flypass_api: Arc::new(FlypassApi::new(conn)),
        }
    }
}

/// 获取默认数据库路径
///
/// 优先级: FLEET_OPS_DB_PATH → 用户数据目录/fleet-ops/fleet_ops.db → ./fleet_ops.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("fleet-ops");
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join("fleet_ops.db").to_string_lossy().to_string();
        }
    }

    "./fleet_ops.db".to_string()
}

/// 获取监听地址（FLEET_OPS_BIND，格式错误时回退默认值）
pub fn get_bind_addr() -> SocketAddr {
    let fallback = || {
        DEFAULT_BIND_ADDR
            .parse::<SocketAddr>()
            .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 3000)))
    };

    match std::env::var(BIND_ADDR_ENV) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!(value = %raw, error = %e, "监听地址格式错误，使用默认值");
            fallback()
        }),
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_on_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.db");
        let state = AppState::new(path.to_string_lossy().to_string()).unwrap();
        assert!(state.db_path.ends_with("state.db"));
        assert!(path.exists());
    }
}
