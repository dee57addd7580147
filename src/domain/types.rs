// ==========================================
// 车队运营后台 - 领域类型定义
// ==========================================
// 职责: 表格单元格的显式形态（导入管道统一输入）
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 单元格值 (Cell Value)
// ==========================================
// 文件解析阶段把 calamine/csv 的单元格统一转换为此类型,
// 之后的日期归一化与行校验只面对这四种形态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime), // 原生日期单元格
}

impl CellValue {
    /// 由文本构造（空白文本视为 Empty）
    pub fn from_text(value: &str) -> Self {
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }

    /// 是否为空（Empty 或仅含空白的文本）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::DateTime(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            // 整数值不带小数点输出（与表格显示一致）
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".to_string()).is_blank());
        assert!(!CellValue::Text("x".to_string()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_from_text() {
        assert_eq!(CellValue::from_text("  "), CellValue::Empty);
        assert_eq!(
            CellValue::from_text("ABC123"),
            CellValue::Text("ABC123".to_string())
        );
    }

    #[test]
    fn test_display_number() {
        assert_eq!(CellValue::Number(45306.0).to_string(), "45306");
        assert_eq!(CellValue::Number(12.5).to_string(), "12.5");
    }
}
