// ==========================================
// 车队运营后台 - 燃油采购导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解析 → 表头映射 → 行校验 → 累计落库
// ==========================================

use crate::domain::fuel::{FuelImportReport, ImportRow, ValidatedFuelPurchase};
use crate::domain::types::CellValue;
use crate::domain::vehicle::VehicleLookup;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::ColumnMap;
use crate::importer::file_parser::RawTable;
use crate::importer::row_error::RowErrorKind;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// FuelImporter Trait
// ==========================================
// 用途: 燃油采购导入主接口
// 实现者: FuelImporterImpl
#[async_trait]
pub trait FuelImporter: Send + Sync {
    /// 从内存中的上传文件导入
    ///
    /// # 参数
    /// - file_name: 原始文件名（用于判断格式）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(FuelImportReport): 逐行结果汇总（行级错误不会导致 Err）
    /// - Err: 输入级错误（格式不支持、无法读取、空表、数据库不可用）
    async fn import_from_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ImportResult<FuelImportReport>;

    /// 从磁盘文件导入
    async fn import_from_path<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<FuelImportReport>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（仅第一个工作表）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析为表头 + 数据行（完全空白的行已跳过）
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<RawTable>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 表头同义词解析 + 行映射
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 读取表头时解析一次列位置
    fn resolve_columns(&self, headers: &[String]) -> ColumnMap;

    /// 按列位置提取固定形态的行
    fn map_row(&self, columns: &ColumnMap, cells: &[CellValue], row_number: usize) -> ImportRow;
}

// ==========================================
// DataCleaner Trait
// ==========================================
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（TRIM + 可选 UPPER）
    fn clean_text(&self, value: &str, uppercase: bool) -> String;

    /// 单元格 → 有限数值（文本需整体可解析）
    fn parse_number(&self, cell: &CellValue) -> Option<f64>;
}

// ==========================================
// RowValidator Trait
// ==========================================
// 用途: 单行校验（首个失败项即返回,全有或全无）
// 实现者: RowValidatorImpl
pub trait RowValidator: Send + Sync {
    fn validate(
        &self,
        row: &ImportRow,
        lookup: &VehicleLookup,
    ) -> Result<ValidatedFuelPurchase, RowErrorKind>;
}
