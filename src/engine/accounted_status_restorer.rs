// ==========================================
// 车队运营后台 - Flypass 记账状态恢复引擎
// ==========================================
// 职责: 按目标比例补齐 / 按日期区间标记 Flypass 记录为已记账
// 输入: 记账统计 + RestoreOptions
// 输出: RestoreReport（前后统计、候选数、实际更新数、样本）
// 红线: Engine 不拼 SQL; 只翻转 accounted 字段
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::flypass::{
    AccountedStats, FlypassCandidate, RestoreMode, RestoreReport, RestoreRunResult,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::FlypassRepository;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{error, info, instrument};

/// 报告中保留的候选样本数
pub const SAMPLE_SIZE: usize = 5;

// ==========================================
// RestoreOptions - 恢复参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreOptions {
    pub dry_run: bool,
    pub target_percentage: f64,
    pub date_threshold: NaiveDate,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            target_percentage: 85.0,
            date_threshold: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap_or_default(),
        }
    }
}

impl RestoreOptions {
    /// 从 config_kv 读取目标比例与日期阈值
    pub async fn from_config<C: ImportConfigReader + ?Sized>(
        config: &C,
        dry_run: bool,
    ) -> RepositoryResult<Self> {
        Ok(Self {
            dry_run,
            target_percentage: config.get_restore_target_percentage().await?,
            date_threshold: config.get_restore_date_threshold().await?,
        })
    }

    /// 在 config_kv 的值之上应用显式覆盖（None 保留原值）
    pub fn with_overrides(
        mut self,
        target_percentage: Option<f64>,
        date_threshold: Option<NaiveDate>,
    ) -> Self {
        if let Some(pct) = target_percentage {
            self.target_percentage = pct;
        }
        if let Some(threshold) = date_threshold {
            self.date_threshold = threshold;
        }
        self
    }

    fn validate(&self) -> RepositoryResult<()> {
        if !self.target_percentage.is_finite() || !(0.0..=100.0).contains(&self.target_percentage) {
            return Err(RepositoryError::ValidationError(format!(
                "porcentaje objetivo fuera de rango (0-100): {}",
                self.target_percentage
            )));
        }
        Ok(())
    }
}

// ==========================================
// RestoreTask - 脚本任务
// ==========================================
// 百分比模式中为 None 的字段取 config_kv（缺省 85 / 2024-12-01）
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreTask {
    Percentage {
        target_percentage: Option<f64>,
        date_threshold: Option<NaiveDate>,
    },
    DateRange {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

/// 目标记账数 = floor(total × pct / 100)
pub fn target_accounted(total: i64, target_percentage: f64) -> i64 {
    (total as f64 * target_percentage / 100.0).floor() as i64
}

// ==========================================
// AccountedStatusRestorer - 记账状态恢复引擎
// ==========================================
pub struct AccountedStatusRestorer<R>
where
    R: FlypassRepository,
{
    repo: R,
}

impl<R> AccountedStatusRestorer<R>
where
    R: FlypassRepository,
{
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// 按目标比例补齐
    ///
    /// # 规则
    /// 1. deficit = floor(total × pct / 100) − accounted
    /// 2. deficit <= 0 → 不做任何修改
    /// 3. 选取最早的 deficit 条（accounted = 0, created_at < 阈值, total > 0）
    /// 4. dry_run → 只报告; 否则单事务批量标记
    #[instrument(skip(self), fields(dry_run = options.dry_run))]
    pub async fn restore(&self, options: &RestoreOptions) -> RepositoryResult<RestoreReport> {
        options.validate()?;

        // 1. 当前统计
        let before = self.repo.stats().await?;
        info!(
            total = before.total,
            accounted = before.accounted,
            percentage = before.percentage,
            "当前记账统计"
        );

        // 2. 目标与缺口
        let target = target_accounted(before.total, options.target_percentage);
        let deficit = target - before.accounted;
        let mode = RestoreMode::Percentage {
            target_percentage: options.target_percentage,
            target_accounted: target,
            deficit,
        };
        info!(target, deficit, "计算目标缺口");

        // 3. 已达标
        if deficit <= 0 {
            info!("已达到目标比例，无需修改");
            return Ok(RestoreReport {
                mode,
                dry_run: options.dry_run,
                before,
                after: before,
                candidates_found: 0,
                records_updated: 0,
                sample: Vec::new(),
            });
        }

        // 4. 候选
        let candidates = self
            .repo
            .select_oldest_unaccounted(options.date_threshold, deficit)
            .await?;
        info!(
            candidates = candidates.len(),
            date_threshold = %options.date_threshold,
            "候选记录查询完成"
        );

        let sample = candidates.iter().take(SAMPLE_SIZE).cloned().collect();
        let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();

        self.finish(mode, options.dry_run, before, ids, sample).await
    }

    /// 按日期区间全部标记（含首尾两天，无数量上限）
    #[instrument(skip(self))]
    pub async fn restore_by_date_pattern(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        dry_run: bool,
    ) -> RepositoryResult<RestoreReport> {
        if start_date > end_date {
            return Err(RepositoryError::ValidationError(format!(
                "rango de fechas inválido: {} > {}",
                start_date, end_date
            )));
        }

        let before = self.repo.stats().await?;

        let start = start_date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            RepositoryError::ValidationError(format!("fecha inválida: {}", start_date))
        })?;
        let end_exclusive = end_date
            .succ_opt()
            .and_then(|next| next.and_hms_opt(0, 0, 0))
            .ok_or_else(|| {
                RepositoryError::ValidationError(format!("fecha final fuera de rango: {}", end_date))
            })?;

        let candidates = self
            .repo
            .select_unaccounted_between(start, end_exclusive)
            .await?;
        info!(
            candidates = candidates.len(),
            start = %start_date,
            end = %end_date,
            "区间候选记录查询完成"
        );

        let sample = candidates.iter().take(SAMPLE_SIZE).cloned().collect();
        let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
        let mode = RestoreMode::DateRange {
            start_date,
            end_date,
        };

        self.finish(mode, dry_run, before, ids, sample).await
    }

    async fn finish(
        &self,
        mode: RestoreMode,
        dry_run: bool,
        before: AccountedStats,
        ids: Vec<i64>,
        sample: Vec<FlypassCandidate>,
    ) -> RepositoryResult<RestoreReport> {
        let candidates_found = ids.len();

        if dry_run {
            info!(candidates_found, "模拟运行，不修改数据");
            return Ok(RestoreReport {
                mode,
                dry_run,
                before,
                after: before,
                candidates_found,
                records_updated: 0,
                sample,
            });
        }

        let records_updated = self.repo.mark_accounted(&ids).await?;
        let after = self.repo.stats().await?;
        info!(
            records_updated,
            accounted = after.accounted,
            percentage = after.percentage,
            "批量标记完成"
        );

        Ok(RestoreReport {
            mode,
            dry_run,
            before,
            after,
            candidates_found,
            records_updated,
            sample,
        })
    }

    /// 执行脚本任务（百分比参数先读 config_kv 再应用覆盖）
    pub async fn run_task<C: ImportConfigReader + ?Sized>(
        &self,
        task: &RestoreTask,
        dry_run: bool,
        config: &C,
    ) -> RestoreRunResult {
        match task {
            RestoreTask::Percentage {
                target_percentage,
                date_threshold,
            } => {
                let start = Instant::now();
                match RestoreOptions::from_config(config, dry_run).await {
                    Ok(base) => {
                        let options = base.with_overrides(*target_percentage, *date_threshold);
                        self.run_restore(&options).await
                    }
                    Err(e) => Self::to_run_result(Err(e), start),
                }
            }
            RestoreTask::DateRange {
                start_date,
                end_date,
            } => {
                self.run_restore_by_date_pattern(*start_date, *end_date, dry_run)
                    .await
            }
        }
    }

    /// 执行并包装为脚本结果（含耗时）
    pub async fn run_restore(&self, options: &RestoreOptions) -> RestoreRunResult {
        let start = Instant::now();
        let result = self.restore(options).await;
        Self::to_run_result(result, start)
    }

    /// 区间模式的脚本结果包装
    pub async fn run_restore_by_date_pattern(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        dry_run: bool,
    ) -> RestoreRunResult {
        let start = Instant::now();
        let result = self
            .restore_by_date_pattern(start_date, end_date, dry_run)
            .await;
        Self::to_run_result(result, start)
    }

    fn to_run_result(result: RepositoryResult<RestoreReport>, start: Instant) -> RestoreRunResult {
        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(report) => RestoreRunResult {
                success: true,
                records_processed: Some(if report.dry_run {
                    report.candidates_found
                } else {
                    report.records_updated
                }),
                duration_ms,
                error: None,
                report: Some(report),
            },
            Err(e) => {
                error!(error = %e, duration_ms, "记账状态恢复失败");
                RestoreRunResult {
                    success: false,
                    records_processed: None,
                    duration_ms,
                    error: Some(e.to_string()),
                    report: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::sync::Mutex;

    // 内存仓储：(id, accounted, created_at, total)
    struct MemoryFlypass {
        rows: Mutex<Vec<(i64, bool, NaiveDateTime, f64)>>,
        fail_update: bool,
    }

    impl MemoryFlypass {
        fn new(rows: Vec<(i64, bool, NaiveDateTime, f64)>) -> Self {
            Self {
                rows: Mutex::new(rows),
                fail_update: false,
            }
        }

        fn candidate(row: &(i64, bool, NaiveDateTime, f64)) -> FlypassCandidate {
            FlypassCandidate {
                id: row.0,
                document_number: format!("F-{}", row.0),
                toll_name: "Peaje".to_string(),
                total: row.3,
                created_at: row.2,
            }
        }
    }

    #[async_trait]
    impl FlypassRepository for MemoryFlypass {
        async fn count_total(&self) -> RepositoryResult<i64> {
            Ok(self.rows.lock().unwrap().len() as i64)
        }

        async fn count_accounted(&self) -> RepositoryResult<i64> {
            Ok(self.rows.lock().unwrap().iter().filter(|r| r.1).count() as i64)
        }

        async fn select_oldest_unaccounted(
            &self,
            before: NaiveDate,
            limit: i64,
        ) -> RepositoryResult<Vec<FlypassCandidate>> {
            let mut rows: Vec<_> = self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| !r.1 && r.2.date() < before && r.3 > 0.0)
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.2.cmp(&b.2).then(a.0.cmp(&b.0)));
            Ok(rows
                .iter()
                .take(limit.max(0) as usize)
                .map(Self::candidate)
                .collect())
        }

        async fn select_unaccounted_between(
            &self,
            start: NaiveDateTime,
            end_exclusive: NaiveDateTime,
        ) -> RepositoryResult<Vec<FlypassCandidate>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|r| !r.1 && r.2 >= start && r.2 < end_exclusive)
                .map(Self::candidate)
                .collect())
        }

        async fn mark_accounted(&self, ids: &[i64]) -> RepositoryResult<usize> {
            if self.fail_update {
                return Err(RepositoryError::DatabaseTransactionError("locked".to_string()));
            }
            let mut updated = 0;
            for row in self.rows.lock().unwrap().iter_mut() {
                if ids.contains(&row.0) && !row.1 {
                    row.1 = true;
                    updated += 1;
                }
            }
            Ok(updated)
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn options(dry_run: bool) -> RestoreOptions {
        RestoreOptions {
            dry_run,
            ..RestoreOptions::default()
        }
    }

    #[test]
    fn test_target_accounted_floor() {
        assert_eq!(target_accounted(1000, 85.0), 850);
        assert_eq!(target_accounted(7, 85.0), 5);
        assert_eq!(target_accounted(0, 85.0), 0);
    }

    #[test]
    fn test_default_options() {
        let opts = RestoreOptions::default();
        assert!(!opts.dry_run);
        assert_eq!(opts.target_percentage, 85.0);
        assert_eq!(opts.date_threshold, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
    }

    #[tokio::test]
    async fn test_fills_deficit_oldest_first() {
        // 10 条，已记账 6 → 目标 8，缺口 2
        let mut rows = Vec::new();
        for i in 0..6 {
            rows.push((i, true, day(2024, 1, 1), 10.0));
        }
        rows.push((10, false, day(2024, 6, 1), 10.0));
        rows.push((11, false, day(2024, 2, 1), 10.0));
        rows.push((12, false, day(2024, 3, 1), 10.0));
        rows.push((13, false, day(2024, 12, 5), 10.0)); // 阈值之后
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(rows));

        let report = restorer.restore(&options(false)).await.unwrap();

        assert_eq!(report.records_updated, 2);
        assert_eq!(report.after.accounted, 8);
        let updated: Vec<i64> = report.sample.iter().map(|c| c.id).collect();
        assert_eq!(updated, vec![11, 12]);
        assert!(matches!(report.mode, RestoreMode::Percentage { deficit: 2, .. }));
    }

    #[tokio::test]
    async fn test_fixed_point_when_goal_met() {
        let rows = vec![(1, true, day(2024, 1, 1), 1.0), (2, false, day(2024, 1, 1), 1.0)];
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(rows));
        let opts = RestoreOptions {
            target_percentage: 50.0,
            ..options(false)
        };

        let report = restorer.restore(&opts).await.unwrap();

        assert_eq!(report.records_updated, 0);
        assert_eq!(report.candidates_found, 0);
        assert_eq!(report.after, report.before);
    }

    #[tokio::test]
    async fn test_dry_run_does_not_mutate() {
        let rows = (0..10).map(|i| (i, false, day(2024, 1, 1), 1.0)).collect();
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(rows));

        let report = restorer.restore(&options(true)).await.unwrap();

        assert!(report.dry_run);
        assert_eq!(report.candidates_found, 8);
        assert_eq!(report.sample.len(), SAMPLE_SIZE);
        assert_eq!(report.records_updated, 0);
        assert_eq!(restorer.repo().count_accounted().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_percentage_rejected() {
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(Vec::new()));
        let opts = RestoreOptions {
            target_percentage: 150.0,
            ..options(false)
        };

        assert!(matches!(
            restorer.restore(&opts).await,
            Err(RepositoryError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_date_range_inclusive_end() {
        let rows = vec![
            (1, false, day(2024, 3, 1), 1.0),
            (
                2,
                false,
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap().and_hms_opt(23, 59, 59).unwrap(),
                1.0,
            ),
            (3, false, day(2024, 4, 1), 1.0),
            (4, true, day(2024, 3, 15), 1.0),
            (5, false, day(2024, 2, 29), 0.0),
        ];
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(rows));

        let report = restorer
            .restore_by_date_pattern(
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                false,
            )
            .await
            .unwrap();

        assert_eq!(report.candidates_found, 2);
        assert_eq!(report.records_updated, 2);
        assert_eq!(report.after.accounted, 3);
    }

    #[tokio::test]
    async fn test_date_range_reversed_rejected() {
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(Vec::new()));
        let result = restorer
            .restore_by_date_pattern(
                NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                true,
            )
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_date_range_end_overflow_is_reported() {
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(Vec::new()));

        let result = restorer
            .run_restore_by_date_pattern(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::MAX,
                true,
            )
            .await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("fuera de rango"));
    }

    #[test]
    fn test_with_overrides() {
        let base = RestoreOptions::default();
        let threshold = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let kept = base.clone().with_overrides(None, None);
        assert_eq!(kept, base);

        let changed = base.with_overrides(Some(90.0), Some(threshold));
        assert_eq!(changed.target_percentage, 90.0);
        assert_eq!(changed.date_threshold, threshold);
    }

    #[tokio::test]
    async fn test_run_result_reports_failure() {
        let rows = (0..10).map(|i| (i, false, day(2024, 1, 1), 1.0)).collect();
        let mut repo = MemoryFlypass::new(rows);
        repo.fail_update = true;
        let restorer = AccountedStatusRestorer::new(repo);

        let result = restorer.run_restore(&options(false)).await;

        assert!(!result.success);
        assert!(result.error.is_some());
        assert!(result.records_processed.is_none());
        assert_eq!(restorer.repo().count_accounted().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_result_success_json() {
        let rows = vec![(1, false, day(2024, 1, 1), 1.0)];
        let restorer = AccountedStatusRestorer::new(MemoryFlypass::new(rows));

        let result = restorer.run_restore(&options(false)).await;
        assert!(result.success);
        assert_eq!(result.records_processed, Some(0)); // floor(1 × 0.85) = 0

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert!(json.get("error").is_none());
        let _stats: AccountedStats = serde_json::from_value(json["report"]["before"].clone()).unwrap();
    }
}
