// ==========================================
// 车队运营后台 - HTTP 服务主入口
// ==========================================
// 技术栈: axum + tokio + SQLite
// ==========================================

use std::sync::Arc;

use fleet_ops::app::{build_router, get_bind_addr, get_default_db_path, AppState};
use fleet_ops::logging;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} v{}", fleet_ops::APP_NAME, fleet_ops::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    let state = Arc::new(AppState::new(db_path)?);
    tracing::info!("AppState初始化成功");

    let app = build_router(state);

    let addr = get_bind_addr();
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("监听地址: http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
