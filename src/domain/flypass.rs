// ==========================================
// 车队运营后台 - Flypass 通行费领域模型
// ==========================================
// 职责: 通行费记录 / 记账状态统计 / 修复报告
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// FlypassRecord - 通行费记录
// ==========================================
// 对齐: flypass_records 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlypassRecord {
    pub id: i64,
    pub document_number: String,
    pub toll_name: String,
    pub total: f64,
    pub accounted: bool,
    pub created_at: NaiveDateTime,
}

// ==========================================
// FlypassCandidate - 待标记候选（只读投影）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlypassCandidate {
    pub id: i64,
    pub document_number: String,
    pub toll_name: String,
    pub total: f64,
    pub created_at: NaiveDateTime,
}

// ==========================================
// AccountedStats - 记账状态统计
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccountedStats {
    pub total: i64,
    pub accounted: i64,
    pub percentage: f64, // 0-100，保留两位小数
}

impl AccountedStats {
    pub fn new(total: i64, accounted: i64) -> Self {
        let percentage = if total > 0 {
            ((accounted as f64 / total as f64) * 10_000.0).round() / 100.0
        } else {
            0.0
        };
        Self {
            total,
            accounted,
            percentage,
        }
    }
}

// ==========================================
// RestoreMode - 修复模式
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RestoreMode {
    /// 按目标百分比补齐（最早优先 + 日期阈值）
    Percentage {
        target_percentage: f64,
        target_accounted: i64,
        deficit: i64,
    },
    /// 按日期区间全部标记
    DateRange {
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    },
}

// ==========================================
// RestoreReport - 修复报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreReport {
    pub mode: RestoreMode,
    pub dry_run: bool,
    pub before: AccountedStats,
    pub after: AccountedStats,
    pub candidates_found: usize,
    pub records_updated: usize,
    pub sample: Vec<FlypassCandidate>, // 前 5 条候选
}

// ==========================================
// RestoreRunResult - 脚本执行结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRunResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records_processed: Option<usize>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<RestoreReport>,
}
