// ==========================================
// 车队运营后台 - 导入层
// ==========================================
// 职责: 燃油采购表格导入
// 支持: Excel (.xlsx/.xls), CSV
// 流程: 解析 → 表头映射 → 日期归一化 + 行校验 → 累计落库
// ==========================================

// 模块声明
pub mod accumulator;
pub mod data_cleaner;
pub mod date_normalizer;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod fuel_importer_impl;
pub mod fuel_importer_trait;
pub mod row_error;
pub mod row_validator;

// 重导出核心类型
pub use accumulator::ImportAccumulator;
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ColumnMap, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, RawTable, UniversalFileParser};
pub use fuel_importer_impl::FuelImporterImpl;
pub use row_error::{DateError, RowError, RowErrorKind};
pub use row_validator::RowValidatorImpl;

// 重导出 Trait 接口
pub use fuel_importer_trait::{DataCleaner, FieldMapper, FileParser, FuelImporter, RowValidator};
