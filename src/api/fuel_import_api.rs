// ==========================================
// 车队运营后台 - 燃油采购导入 API
// ==========================================
// 职责: 封装燃油采购上传导入 / 最近记录 / 导入模板
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::fuel::{FuelImportReport, FuelPurchaseRecord};
use crate::importer::field_mapper::{
    DATE_HEADERS, PLATE_HEADERS, PROVIDER_HEADERS, QUANTITY_HEADERS, TOTAL_HEADERS,
};
use crate::importer::{FuelImporter, FuelImporterImpl, ImportError};
use crate::repository::{
    FuelPurchaseRepository, FuelPurchaseRepositoryImpl, VehicleRepositoryImpl,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 最近记录默认条数
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// 最近记录最大条数
pub const MAX_LIST_LIMIT: usize = 500;

type DefaultFuelImporter =
    FuelImporterImpl<VehicleRepositoryImpl, FuelPurchaseRepositoryImpl, ConfigManager>;

/// 燃油采购导入API
pub struct FuelImportApi {
    conn: Arc<Mutex<Connection>>,
}

impl FuelImportApi {
    /// 创建新的 FuelImportApi 实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn create_importer(&self) -> DefaultFuelImporter {
        FuelImporterImpl::with_defaults(
            VehicleRepositoryImpl::from_connection(self.conn.clone()),
            FuelPurchaseRepositoryImpl::from_connection(self.conn.clone()),
            ConfigManager::from_connection(self.conn.clone()),
        )
    }

    /// 导入上传的表格
    ///
    /// # 参数
    /// - file_name: 上传文件名（None 表示未上传文件）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(FuelImportReport): 逐行结果汇总
    /// - Err(ApiError): 缺文件/格式错误/空表 → 400，其余 → 500
    pub async fn import_upload(
        &self,
        file_name: Option<String>,
        bytes: Option<Vec<u8>>,
    ) -> ApiResult<FuelImportReport> {
        let (file_name, bytes) = match (file_name, bytes) {
            (Some(name), Some(bytes)) if !name.trim().is_empty() => (name, bytes),
            _ => return Err(ImportError::MissingFile.into()),
        };

        let importer = self.create_importer();
        let report = importer.import_from_bytes(&file_name, bytes).await?;
        Ok(report)
    }

    /// 最近导入的记录
    pub async fn list_recent(&self, limit: Option<usize>) -> ApiResult<Vec<FuelPurchaseRecord>> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
        let repo = FuelPurchaseRepositoryImpl::from_connection(self.conn.clone());
        repo.list_recent(limit).await.map_err(ApiError::from)
    }

    /// 导入模板（CSV，使用标准表头 + 一行示例）
    pub fn template_csv(&self) -> ApiResult<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                DATE_HEADERS[0],
                PLATE_HEADERS[0],
                QUANTITY_HEADERS[0],
                TOTAL_HEADERS[0],
                PROVIDER_HEADERS[0],
            ])
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        writer
            .write_record(["15/01/2024", "ABC123", "50", "200000", "Terpel"])
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let bytes = writer
            .into_inner()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ApiError::InternalError(e.to_string()))
    }
}
