// ==========================================
// 车队运营后台 - 车辆仓储
// ==========================================
// 职责: vehicles 表读取（导入时构建车牌索引）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::vehicle::VehicleSummary;
use crate::repository::error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// VehicleRepository Trait
// ==========================================
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// 查询所有启用状态的车辆
    async fn list_active(&self) -> RepositoryResult<Vec<VehicleSummary>>;
}

// ==========================================
// VehicleRepositoryImpl
// ==========================================
pub struct VehicleRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl VehicleRepositoryImpl {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增车辆，返回 id
    pub fn insert(&self, plate: &str, active: bool) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO vehicles (plate, active) VALUES (?1, ?2)",
            params![plate.trim().to_uppercase(), active],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

#[async_trait]
impl VehicleRepository for VehicleRepositoryImpl {
    async fn list_active(&self) -> RepositoryResult<Vec<VehicleSummary>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, plate FROM vehicles WHERE active = 1 ORDER BY id")?;

        let vehicles = stmt
            .query_map([], |row| {
                Ok(VehicleSummary {
                    id: row.get(0)?,
                    plate: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(vehicles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    #[tokio::test]
    async fn test_list_active_skips_inactive() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let repo = VehicleRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)));

        let a = repo.insert("abc123", true).unwrap();
        repo.insert("OLD999", false).unwrap();

        let active = repo.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a);
        assert_eq!(active[0].plate, "ABC123");
    }
}
