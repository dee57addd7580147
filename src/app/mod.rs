// ==========================================
// 车队运营后台 - 应用层
// ==========================================
// 职责: HTTP 集成（axum），连接前端与后端
// ==========================================

pub mod routes;
pub mod state;

// 重导出
pub use routes::build_router;
pub use state::{get_bind_addr, get_default_db_path, AppState};
