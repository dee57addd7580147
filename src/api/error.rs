// ==========================================
// 车队运营后台 - API层错误类型
// ==========================================
// 职责: 把导入层/仓储层错误转换为 HTTP 状态码 + {error} 响应体
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 调用方错误 (400)
    // ==========================================
    #[error("{0}")]
    InvalidInput(String),

    #[error("Error de validación: {0}")]
    ValidationError(String),

    #[error("Recurso no encontrado: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误 (500)
    // ==========================================
    #[error("Error de base de datos: {0}")]
    DatabaseError(String),

    #[error("No se pudo conectar a la base de datos: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误 (500)
    // ==========================================
    #[error("Error interno del servidor: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 错误响应体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DatabaseError(_)
            | ApiError::DatabaseConnectionError(_)
            | ApiError::InternalError(_)
            | ApiError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "请求处理失败");
        } else {
            tracing::warn!(error = %self, "请求被拒绝");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::LockError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::ValidationError(msg) => ApiError::ValidationError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_client_error() {
            return ApiError::InvalidInput(err.to_string());
        }
        match err {
            ImportError::Repository(e) => e.into(),
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
