// ==========================================
// 车队运营后台 - 导入模块错误类型
// ==========================================
// 范围: 输入级错误（整次导入失败）
// 行级错误见 row_error.rs（不会越过行循环）
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("No se ha proporcionado ningún archivo")]
    MissingFile,

    #[error("Archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato de archivo no soportado: {0} (solo .xlsx/.xls/.csv)")]
    UnsupportedFormat(String),

    #[error("El archivo supera el tamaño máximo permitido ({max_bytes} bytes)")]
    FileTooLarge { size: usize, max_bytes: usize },

    #[error("Error al leer el archivo: {0}")]
    FileReadError(String),

    #[error("Error al procesar el Excel: {0}")]
    ExcelParseError(String),

    #[error("Error al procesar el CSV: {0}")]
    CsvParseError(String),

    #[error("El archivo está vacío")]
    EmptySheet,

    // ===== 数据库错误 =====
    #[error("Error de base de datos: {0}")]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("Error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否属于调用方输入问题（HTTP 400）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ImportError::MissingFile
                | ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileTooLarge { .. }
                | ImportError::EmptySheet
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
