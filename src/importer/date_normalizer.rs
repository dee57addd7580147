// ==========================================
// 车队运营后台 - 日期归一化
// ==========================================
// 职责: 任意形态的日期单元格 → 日历日期 (NaiveDate)
// 支持: 原生日期 / Excel 序列号 / dd/mm/aaaa 文本 / ISO 类文本
// 约束: 纯函数,无副作用
// ==========================================

use crate::domain::types::CellValue;
use crate::importer::row_error::DateError;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// Excel 序列号有效下限（含）
pub const EXCEL_SERIAL_MIN: f64 = 1.0;

/// Excel 序列号有效上限（含）,对应 9999-12-31
pub const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

/// 低于该年份的 dd/mm/aaaa 视为非法（两位年份不做推断）
const MIN_TEXT_YEAR: i32 = 100;

// 通用日期文本格式（按顺序尝试）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%d %b %Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// 归一化日期单元格
///
/// # 规则（按顺序）
/// 1. 原生日期 → 取日历日期（忽略时分秒）
/// 2. 数值 / 可完整解析为数值的文本 → Excel 序列号
/// 3. 含 '/' 的文本 → 日/月/年
/// 4. 其他文本 → 通用日期解析
pub fn normalize(cell: &CellValue) -> Result<NaiveDate, DateError> {
    match cell {
        CellValue::DateTime(dt) => Ok(dt.date()),
        CellValue::Number(n) => excel_serial_to_date(*n, &cell.to_string()),
        CellValue::Text(s) => normalize_text(s),
        CellValue::Empty => Err(DateError::InvalidDate {
            value: String::new(),
        }),
    }
}

fn normalize_text(raw: &str) -> Result<NaiveDate, DateError> {
    let trimmed = raw.trim();

    if let Some(serial) = parse_full_number(trimmed) {
        return excel_serial_to_date(serial, trimmed);
    }

    if trimmed.contains('/') {
        return parse_day_month_year(trimmed);
    }

    parse_generic(trimmed)
}

/// 文本必须整体解析为有限数值
fn parse_full_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Excel 序列号 → 日期
///
/// # 规则
/// - 有效范围 [1, 2958465]
/// - date = 1900-01-01 + (serial - 2) 天
///   (-2: Excel 从 1 开始计数 + 虚构的 1900-02-29)
/// - 小数部分为当日时间,截断
pub fn excel_serial_to_date(serial: f64, raw: &str) -> Result<NaiveDate, DateError> {
    if !(EXCEL_SERIAL_MIN..=EXCEL_SERIAL_MAX).contains(&serial) {
        return Err(DateError::SerialOutOfRange {
            value: raw.to_string(),
        });
    }

    let days = serial.trunc() as i64;
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(days - 2)))
        .ok_or_else(|| DateError::InvalidSerialDate {
            value: raw.to_string(),
        })
}

/// 解析 dd/mm/aaaa（固定日在前,不随区域设置变化）
fn parse_day_month_year(value: &str) -> Result<NaiveDate, DateError> {
    let format_error = || DateError::InvalidDateFormat {
        value: value.to_string(),
    };

    let parts: Vec<&str> = value.split('/').map(str::trim).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(format_error());
    }

    let day: u32 = parts[0].parse().map_err(|_| format_error())?;
    let month: u32 = parts[1].parse().map_err(|_| format_error())?;
    let year: i32 = parts[2].parse().map_err(|_| format_error())?;

    if year < MIN_TEXT_YEAR {
        return Err(DateError::InvalidDate {
            value: value.to_string(),
        });
    }

    // from_ymd_opt 拒绝越界的日/月（如 31/04、29/02 非闰年）
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| DateError::InvalidDate {
        value: value.to_string(),
    })
}

/// 通用日期文本解析（ISO 8601 / RFC 3339 / 常见英文格式）
fn parse_generic(value: &str) -> Result<NaiveDate, DateError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.date_naive());
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt.date());
        }
    }

    Err(DateError::InvalidDate {
        value: value.to_string(),
    })
}
