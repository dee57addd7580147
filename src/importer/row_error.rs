// ==========================================
// 车队运营后台 - 行级错误类型
// ==========================================
// 范围: 行级可恢复错误（缺字段 / 日期 / 车牌 / 数值 / 落库失败）
// 约束: 错误类型携带结构化字段,仅在报告边界渲染为文本
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// DateError - 日期归一化错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateError {
    #[error("fecha inválida: {value}")]
    InvalidDate { value: String },

    #[error("número de serie de fecha inválido: {value}")]
    InvalidSerialDate { value: String },

    #[error("número de serie de fecha fuera de rango (1-2958465): {value}")]
    SerialOutOfRange { value: String },

    #[error("formato de fecha inválido, se espera dd/mm/aaaa: {value}")]
    InvalidDateFormat { value: String },
}

// ==========================================
// RowErrorKind - 行错误类型
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowErrorKind {
    #[error("Faltan campos requeridos ({})", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("{0}")]
    InvalidDate(DateError),

    #[error("Vehículo con placa {plate} no encontrado o inactivo")]
    UnknownVehicle { plate: String },

    #[error("Cantidad inválida: {value}")]
    InvalidQuantity { value: String },

    #[error("Total inválido: {value}")]
    InvalidTotal { value: String },

    #[error("Error al guardar el registro: {message}")]
    Persistence { message: String },
}

impl From<DateError> for RowErrorKind {
    fn from(err: DateError) -> Self {
        RowErrorKind::InvalidDate(err)
    }
}

// ==========================================
// RowError - 带行号的行错误
// ==========================================
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("Fila {row_number}: {kind}")]
pub struct RowError {
    pub row_number: usize,
    pub kind: RowErrorKind,
}

impl RowError {
    pub fn new(row_number: usize, kind: RowErrorKind) -> Self {
        Self { row_number, kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_error_display() {
        let err = RowError::new(
            5,
            RowErrorKind::UnknownVehicle {
                plate: "ZZZ999".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Fila 5: Vehículo con placa ZZZ999 no encontrado o inactivo"
        );
    }

    #[test]
    fn test_missing_fields_display() {
        let err = RowError::new(
            2,
            RowErrorKind::MissingFields {
                fields: vec!["fecha".to_string(), "total".to_string()],
            },
        );
        assert_eq!(err.to_string(), "Fila 2: Faltan campos requeridos (fecha, total)");
    }

    #[test]
    fn test_date_error_wraps() {
        let kind: RowErrorKind = DateError::InvalidDateFormat {
            value: "1/2".to_string(),
        }
        .into();
        assert!(kind.to_string().contains("dd/mm/aaaa"));
        assert!(matches!(kind, RowErrorKind::InvalidDate(DateError::InvalidDateFormat { .. })));
    }
}
