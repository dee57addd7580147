// Offline repair of the Flypass `accounted` flag.
//
// Usage:
//   cargo run --bin restore_flypass_accounted -- [db_path]
//
// Edit DRY_RUN and restore_task() below. In percentage mode a `None` keeps the
// value stored in config_kv (flypass.restore.*), which defaults to 85 % and
// 2024-12-01; `DateRange` flags every unaccounted record in the inclusive range.

use chrono::NaiveDate;
use fleet_ops::app::get_default_db_path;
use fleet_ops::config::ConfigManager;
use fleet_ops::db::{close_sqlite_connection, init_schema, open_sqlite_connection};
use fleet_ops::engine::{AccountedStatusRestorer, RestoreTask};
use fleet_ops::logging;
use fleet_ops::repository::FlypassRepositoryImpl;
use std::sync::{Arc, Mutex};

const DRY_RUN: bool = true;

// Date range example:
//   RestoreTask::DateRange { start_date: date(2024, 11, 1)?, end_date: date(2024, 11, 30)? }
fn restore_task() -> anyhow::Result<RestoreTask> {
    Ok(RestoreTask::Percentage {
        target_percentage: None,
        date_threshold: Some(date(2024, 12, 1)?),
    })
}

fn date(y: i32, m: u32, d: u32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| anyhow::anyhow!("fecha inválida: {}-{}-{}", y, m, d))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let db_path = std::env::args()
        .nth(1)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(get_default_db_path);
    let task = restore_task()?;

    println!("Base de datos: {}", db_path);
    println!(
        "Modo: {} | tarea: {:?}",
        if DRY_RUN { "simulación" } else { "escritura" },
        task
    );

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let result = {
        let config = ConfigManager::from_connection(conn.clone());
        let restorer = AccountedStatusRestorer::new(FlypassRepositoryImpl::from_connection(conn.clone()));
        restorer.run_task(&task, DRY_RUN, &config).await
    };

    // 所有仓储已释放，显式关闭连接
    match Arc::try_unwrap(conn) {
        Ok(mutex) => {
            let conn = mutex
                .into_inner()
                .map_err(|e| anyhow::anyhow!("conexión envenenada: {}", e))?;
            if let Err(e) = close_sqlite_connection(conn) {
                tracing::warn!(error = %e, "关闭数据库连接失败");
            }
        }
        Err(_) => tracing::warn!("数据库连接仍被引用，交由 Drop 关闭"),
    }

    println!("{}", serde_json::to_string_pretty(&result)?);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
