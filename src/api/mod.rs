// ==========================================
// 车队运营后台 - API层
// ==========================================
// 职责: 封装业务逻辑，供 HTTP 路由调用
// ==========================================

pub mod error;
pub mod flypass_api;
pub mod fuel_import_api;

// 重导出
pub use error::{ApiError, ApiResult, ErrorBody};
pub use flypass_api::FlypassApi;
pub use fuel_import_api::FuelImportApi;
