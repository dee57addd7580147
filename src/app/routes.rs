// ==========================================
// 车队运营后台 - HTTP 路由
// ==========================================
// 职责: axum 路由与处理函数（只做请求解析，业务交给 API 层）
// ==========================================

use crate::api::{ApiError, ApiResult};
use crate::app::state::AppState;
use crate::domain::flypass::AccountedStats;
use crate::domain::fuel::{FuelImportReport, FuelPurchaseRecord};
use crate::importer::ImportError;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::{header, Method};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// multipart 上传字段名
pub const UPLOAD_FIELD: &str = "file";

/// multipart 请求体上限（大于导入上限，超限文件由导入层给出 400）
const BODY_LIMIT_BYTES: usize = 64 * 1024 * 1024;

/// 构建应用路由
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/fuel-purchases", get(list_fuel_purchases))
        .route("/api/fuel-purchases/upload", post(upload_fuel_purchases))
        .route("/api/fuel-purchases/template", get(fuel_purchase_template))
        .route("/api/flypass/accounted-stats", get(flypass_accounted_stats))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(cors)
        .with_state(state)
}

/// GET /api/health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// POST /api/fuel-purchases/upload
async fn upload_fuel_purchases(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<FuelImportReport>> {
    let mut file_name = None;
    let mut bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        file_name = field.file_name().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::from(ImportError::FileReadError(e.to_string())))?;
        bytes = Some(data.to_vec());
        break;
    }

    let report = state.fuel_import_api.import_upload(file_name, bytes).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// GET /api/fuel-purchases?limit=N
async fn list_fuel_purchases(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<FuelPurchaseRecord>>> {
    let records = state.fuel_import_api.list_recent(query.limit).await?;
    Ok(Json(records))
}

/// GET /api/fuel-purchases/template
async fn fuel_purchase_template(
    State(state): State<Arc<AppState>>,
) -> ApiResult<impl IntoResponse> {
    let body = state.fuel_import_api.template_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"plantilla_compras_combustible.csv\"",
            ),
        ],
        body,
    ))
}

/// GET /api/flypass/accounted-stats
async fn flypass_accounted_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<AccountedStats>> {
    let stats = state.flypass_api.accounted_stats().await?;
    Ok(Json(stats))
}
