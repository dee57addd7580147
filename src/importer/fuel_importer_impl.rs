// ==========================================
// 车队运营后台 - 燃油采购导入器实现
// ==========================================
// 职责: 整合导入流程，从上传文件到数据库
// 流程: 大小校验 → 解析 → 表头映射 → 车辆索引 → 逐行校验落库 → 报告
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::fuel::{FuelImportReport, ImportRow};
use crate::domain::vehicle::VehicleLookup;
use crate::importer::accumulator::ImportAccumulator;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::fuel_importer_trait::{FieldMapper, FuelImporter, RowValidator};
use crate::importer::row_validator::RowValidatorImpl;
use crate::repository::{FuelPurchaseRepository, VehicleRepository};
use async_trait::async_trait;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// FuelImporterImpl - 燃油采购导入器实现
// ==========================================
pub struct FuelImporterImpl<V, F, C>
where
    V: VehicleRepository,
    F: FuelPurchaseRepository,
    C: ImportConfigReader,
{
    // 数据访问层
    vehicle_repo: V,
    purchase_repo: F,

    // 配置读取器
    config: C,

    // 导入组件
    file_parser: UniversalFileParser,
    field_mapper: Box<dyn FieldMapper>,
    row_validator: Box<dyn RowValidator>,
}

impl<V, F, C> FuelImporterImpl<V, F, C>
where
    V: VehicleRepository,
    F: FuelPurchaseRepository,
    C: ImportConfigReader,
{
    /// 创建新的 FuelImporter 实例
    ///
    /// # 参数
    /// - vehicle_repo: 车辆仓储（构建车牌索引）
    /// - purchase_repo: 燃油采购仓储（逐行落库）
    /// - config: 配置读取器
    /// - field_mapper: 字段映射器
    /// - row_validator: 行校验器
    pub fn new(
        vehicle_repo: V,
        purchase_repo: F,
        config: C,
        field_mapper: Box<dyn FieldMapper>,
        row_validator: Box<dyn RowValidator>,
    ) -> Self {
        Self {
            vehicle_repo,
            purchase_repo,
            config,
            file_parser: UniversalFileParser,
            field_mapper,
            row_validator,
        }
    }

    /// 使用默认映射器与校验器
    pub fn with_defaults(vehicle_repo: V, purchase_repo: F, config: C) -> Self {
        Self::new(
            vehicle_repo,
            purchase_repo,
            config,
            Box::new(FieldMapperImpl),
            Box::new(RowValidatorImpl::new()),
        )
    }

    pub fn purchase_repo(&self) -> &F {
        &self.purchase_repo
    }
}

#[async_trait]
impl<V, F, C> FuelImporter for FuelImporterImpl<V, F, C>
where
    V: VehicleRepository,
    F: FuelPurchaseRepository,
    C: ImportConfigReader,
{
    #[instrument(skip(self, file_name, bytes), fields(batch_id, file_name = %file_name, size = bytes.len()))]
    async fn import_from_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> ImportResult<FuelImportReport> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!("开始导入燃油采购数据");

        // === 步骤 1: 大小与格式校验 ===
        let max_bytes = self.config.get_max_upload_bytes().await?;
        if bytes.len() > max_bytes {
            warn!(size = bytes.len(), max_bytes, "上传文件超过大小上限");
            return Err(ImportError::FileTooLarge {
                size: bytes.len(),
                max_bytes,
            });
        }
        UniversalFileParser::detect_extension(file_name)?;

        // === 步骤 2: 解析文件 ===
        debug!("步骤 2: 解析文件");
        let table = self.file_parser.parse(file_name, &bytes).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        info!(total_rows = table.row_count(), "文件解析完成");

        // === 步骤 3: 表头映射（只解析一次）===
        let columns = self.field_mapper.resolve_columns(&table.headers);
        let missing = columns.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, headers = ?table.headers, "表头缺少部分列，相关行将报缺字段");
        }

        let rows: Vec<ImportRow> = table
            .rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| self.field_mapper.map_row(&columns, cells, idx + 2))
            .collect();

        // === 步骤 4: 车辆索引 ===
        let vehicles = self.vehicle_repo.list_active().await?;
        let lookup = VehicleLookup::from_vehicles(&vehicles);
        debug!(active_vehicles = lookup.len(), "车辆索引构建完成");

        // === 步骤 5: 逐行校验落库 ===
        let report = ImportAccumulator::run(
            rows,
            &lookup,
            self.row_validator.as_ref(),
            &self.purchase_repo,
        )
        .await;

        info!(
            batch_id = %batch_id,
            total = report.summary.total_rows,
            processed = report.summary.processed,
            errors = report.summary.errors,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "燃油采购导入完成"
        );

        Ok(report)
    }

    async fn import_from_path<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
    ) -> ImportResult<FuelImportReport> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let bytes = tokio::fs::read(path).await?;

        self.import_from_bytes(&file_name, bytes).await
    }
}
