// ==========================================
// 车队运营后台 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / 数值解析
// ==========================================

use crate::domain::types::CellValue;
use crate::importer::fuel_importer_trait::DataCleaner as DataCleanerTrait;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    fn parse_number(&self, cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }
}

impl DataCleaner {
    /// 解析严格正数（> 0）
    pub fn parse_positive(&self, cell: &CellValue) -> Option<f64> {
        self.parse_number(cell).filter(|n| *n > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  abc123  ", false), "abc123");
        assert_eq!(cleaner.clean_text("  abc123  ", true), "ABC123");
    }

    #[test]
    fn test_parse_number() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_number(&CellValue::Number(50.0)), Some(50.0));
        assert_eq!(
            cleaner.parse_number(&CellValue::Text(" 200000 ".to_string())),
            Some(200000.0)
        );
        assert_eq!(
            cleaner.parse_number(&CellValue::Text("12.5".to_string())),
            Some(12.5)
        );
        assert_eq!(cleaner.parse_number(&CellValue::Text("abc".to_string())), None);
        assert_eq!(cleaner.parse_number(&CellValue::Text("NaN".to_string())), None);
        assert_eq!(cleaner.parse_number(&CellValue::Empty), None);
    }

    #[test]
    fn test_parse_positive() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_positive(&CellValue::Number(0.0)), None);
        assert_eq!(cleaner.parse_positive(&CellValue::Number(-3.0)), None);
        assert_eq!(cleaner.parse_positive(&CellValue::Number(0.5)), Some(0.5));
    }
}
