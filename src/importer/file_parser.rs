// ==========================================
// 车队运营后台 - 文件解析器实现
// ==========================================
// 职责: 上传文件 → 表头 + 数据行 (CellValue)
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 约束: 仅读取第一个工作表,跳过完全空白的行
// ==========================================

use crate::domain::types::CellValue;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::fuel_importer_trait::FileParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::io::Cursor;
use std::path::Path;

/// 支持的文件扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

// ==========================================
// RawTable - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Vec<CellValue> = record.iter().map(CellValue::from_text).collect();

            // 跳过完全空白的行
            if row.iter().all(CellValue::is_blank) {
                continue;
            }
            rows.push(row);
        }

        finish_table(headers, rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable> {
        // 按内容识别 xlsx / xls
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(ImportError::EmptySheet)?;

        let range = workbook.worksheet_range(&sheet_name)?;

        let mut raw_rows = range.rows();
        let header_row = match raw_rows.next() {
            Some(row) => row,
            None => return Err(ImportError::EmptySheet),
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for data_row in raw_rows {
            let row: Vec<CellValue> = data_row.iter().map(convert_cell).collect();

            if row.iter().all(CellValue::is_blank) {
                continue;
            }
            rows.push(row);
        }

        finish_table(headers, rows)
    }
}

/// 表头为空或无数据行 → EmptySheet
fn finish_table(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> ImportResult<RawTable> {
    if rows.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(ImportError::EmptySheet);
    }
    Ok(RawTable { headers, rows })
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => serial_to_datetime(dt.as_f64())
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .map(CellValue::DateTime)
            .unwrap_or_else(|_| CellValue::from_text(s)),
        Data::DurationIso(s) => CellValue::from_text(s),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
    }
}

/// 原生日期单元格的序列值 → 日期时间
///
/// 基准日 1899-12-30（与 Excel 显示一致,1900-03-01 之后无偏差）
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    base.checked_add_signed(Duration::milliseconds(millis))
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 校验扩展名（大小写不敏感）
    pub fn detect_extension(file_name: &str) -> ImportResult<String> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(ext)
        } else {
            Err(ImportError::UnsupportedFormat(file_name.to_string()))
        }
    }

    pub fn parse(&self, file_name: &str, bytes: &[u8]) -> ImportResult<RawTable> {
        match Self::detect_extension(file_name)?.as_str() {
            "csv" => CsvParser.parse_bytes(bytes),
            _ => ExcelParser.parse_bytes(bytes),
        }
    }

    pub fn parse_path<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Self::detect_extension(&file_name)?;

        let bytes = std::fs::read(path)?;
        self.parse(&file_name, &bytes)
    }
}
