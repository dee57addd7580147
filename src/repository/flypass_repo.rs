// ==========================================
// 车队运营后台 - Flypass 通行费仓储
// ==========================================
// 职责: flypass_records 表计数 / 候选查询 / 批量标记已记账
// 红线: Repository 不含业务逻辑（目标比例、阈值由调用方传入）
// ==========================================

use crate::domain::flypass::{AccountedStats, FlypassCandidate, FlypassRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::fuel_purchase_repo_impl::TIMESTAMP_FORMAT;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};

/// 批量更新时每条 UPDATE 的最大 id 数（SQLite 变量上限）
const UPDATE_CHUNK_SIZE: usize = 500;

// ==========================================
// FlypassRepository Trait
// ==========================================
// 用途: AccountedStatusRestorer 的存储协作方
// 实现者: FlypassRepositoryImpl
#[async_trait]
pub trait FlypassRepository: Send + Sync {
    async fn count_total(&self) -> RepositoryResult<i64>;

    async fn count_accounted(&self) -> RepositoryResult<i64>;

    /// 当前记账统计
    async fn stats(&self) -> RepositoryResult<AccountedStats> {
        let total = self.count_total().await?;
        let accounted = self.count_accounted().await?;
        Ok(AccountedStats::new(total, accounted))
    }

    /// 最早的未记账记录
    ///
    /// # 条件
    /// - accounted = 0 AND created_at < before AND total > 0
    /// - 按 created_at 升序，同一时间按 id 升序
    async fn select_oldest_unaccounted(
        &self,
        before: NaiveDate,
        limit: i64,
    ) -> RepositoryResult<Vec<FlypassCandidate>>;

    /// 区间内全部未记账记录（start <= created_at < end_exclusive）
    async fn select_unaccounted_between(
        &self,
        start: NaiveDateTime,
        end_exclusive: NaiveDateTime,
    ) -> RepositoryResult<Vec<FlypassCandidate>>;

    /// 在单个事务中把给定 id 标记为已记账
    ///
    /// # 返回
    /// - Ok(usize): 实际更新的行数
    /// - Err: 数据库错误（事务回滚，无部分更新）
    async fn mark_accounted(&self, ids: &[i64]) -> RepositoryResult<usize>;
}

// ==========================================
// FlypassRepositoryImpl
// ==========================================
pub struct FlypassRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl FlypassRepositoryImpl {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_candidate(row: &Row<'_>) -> rusqlite::Result<FlypassCandidate> {
        Ok(FlypassCandidate {
            id: row.get(0)?,
            document_number: row.get(1)?,
            toll_name: row.get(2)?,
            total: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    /// 新增记录，返回 id
    pub fn insert(
        &self,
        document_number: &str,
        toll_name: &str,
        total: f64,
        accounted: bool,
        created_at: NaiveDateTime,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO flypass_records (document_number, toll_name, total, accounted, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                document_number,
                toll_name,
                total,
                accounted,
                created_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按 id 查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<FlypassRecord>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            r#"
            SELECT id, document_number, toll_name, total, accounted, created_at
            FROM flypass_records WHERE id = ?1
            "#,
            params![id],
            |row| {
                Ok(FlypassRecord {
                    id: row.get(0)?,
                    document_number: row.get(1)?,
                    toll_name: row.get(2)?,
                    total: row.get(3)?,
                    accounted: row.get(4)?,
                    created_at: row.get(5)?,
                })
            },
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn day_start(date: NaiveDate) -> String {
    date.format("%Y-%m-%d 00:00:00").to_string()
}

#[async_trait]
impl FlypassRepository for FlypassRepositoryImpl {
    async fn count_total(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM flypass_records", [], |row| row.get(0))?;
        Ok(count)
    }

    async fn count_accounted(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM flypass_records WHERE accounted = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    async fn select_oldest_unaccounted(
        &self,
        before: NaiveDate,
        limit: i64,
    ) -> RepositoryResult<Vec<FlypassCandidate>> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, document_number, toll_name, total, created_at
            FROM flypass_records
            WHERE accounted = 0 AND created_at < ?1 AND total > 0
            ORDER BY created_at ASC, id ASC
            LIMIT ?2
            "#,
        )?;

        let candidates = stmt
            .query_map(params![day_start(before), limit], Self::map_candidate)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(candidates)
    }

    async fn select_unaccounted_between(
        &self,
        start: NaiveDateTime,
        end_exclusive: NaiveDateTime,
    ) -> RepositoryResult<Vec<FlypassCandidate>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, document_number, toll_name, total, created_at
            FROM flypass_records
            WHERE accounted = 0 AND created_at >= ?1 AND created_at < ?2
            ORDER BY created_at ASC, id ASC
            "#,
        )?;

        let candidates = stmt
            .query_map(
                params![
                    start.format(TIMESTAMP_FORMAT).to_string(),
                    end_exclusive.format(TIMESTAMP_FORMAT).to_string(),
                ],
                Self::map_candidate,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(candidates)
    }

    async fn mark_accounted(&self, ids: &[i64]) -> RepositoryResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut updated = 0;
        for chunk in ids.chunks(UPDATE_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "UPDATE flypass_records SET accounted = 1 WHERE accounted = 0 AND id IN ({})",
                placeholders
            );
            updated += tx.execute(&sql, params_from_iter(chunk.iter()))?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(updated)
    }
}
