// ==========================================
// 车队运营后台 - 燃油采购 Repository 实现
// ==========================================
// 职责: 实现燃油采购数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::fuel::{FuelPurchaseRecord, NewFuelPurchase};
use crate::domain::vehicle::VehicleSummary;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::fuel_purchase_repo::FuelPurchaseRepository;
use async_trait::async_trait;
use chrono::Local;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 时间戳存储格式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SELECT_WITH_VEHICLE: &str = r#"
    SELECT fp.id, fp.date, fp.vehicle_id, fp.quantity, fp.total, fp.provider,
           fp.created_at, v.id, v.plate
    FROM fuel_purchases fp
    JOIN vehicles v ON v.id = fp.vehicle_id
"#;

// ==========================================
// FuelPurchaseRepositoryImpl
// ==========================================
pub struct FuelPurchaseRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl FuelPurchaseRepositoryImpl {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<FuelPurchaseRecord> {
        Ok(FuelPurchaseRecord {
            id: row.get(0)?,
            date: row.get(1)?,
            vehicle_id: row.get(2)?,
            quantity: row.get(3)?,
            total: row.get(4)?,
            provider: row.get(5)?,
            created_at: row.get(6)?,
            vehicle: VehicleSummary {
                id: row.get(7)?,
                plate: row.get(8)?,
            },
        })
    }

    fn find_by_id(conn: &Connection, id: i64) -> RepositoryResult<FuelPurchaseRecord> {
        let sql = format!("{} WHERE fp.id = ?1", SELECT_WITH_VEHICLE);
        conn.query_row(&sql, params![id], Self::map_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                    entity: "fuel_purchase".to_string(),
                    id: id.to_string(),
                },
                other => other.into(),
            })
    }
}

#[async_trait]
impl FuelPurchaseRepository for FuelPurchaseRepositoryImpl {
    async fn create(&self, purchase: NewFuelPurchase) -> RepositoryResult<FuelPurchaseRecord> {
        let conn = self.get_conn()?;
        let created_at = Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string();

        conn.execute(
            r#"
            INSERT INTO fuel_purchases (date, vehicle_id, quantity, total, provider, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                purchase.date.format("%Y-%m-%d").to_string(),
                purchase.vehicle_id,
                purchase.quantity,
                purchase.total,
                purchase.provider,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::find_by_id(&conn, id)
    }

    async fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<FuelPurchaseRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY fp.id DESC LIMIT ?1", SELECT_WITH_VEHICLE);
        let mut stmt = conn.prepare(&sql)?;

        let records = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    async fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM fuel_purchases", [], |row| row.get(0))?;
        Ok(count)
    }
}
