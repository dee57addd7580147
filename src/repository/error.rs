// ==========================================
// 车队运营后台 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 数据库错误 =====
    #[error("Registro no encontrado: {entity} con id={id}")]
    NotFound { entity: String, id: String },

    #[error("No se pudo obtener el bloqueo de la base de datos: {0}")]
    LockError(String),

    #[error("Falló la transacción: {0}")]
    DatabaseTransactionError(String),

    #[error("Falló la consulta: {0}")]
    DatabaseQueryError(String),

    #[error("Violación de restricción única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Violación de clave foránea: {0}")]
    ForeignKeyViolation(String),

    // ===== 数据质量错误 =====
    #[error("Error de validación: {0}")]
    ValidationError(String),

    // ===== 通用错误 =====
    #[error("Error interno: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
