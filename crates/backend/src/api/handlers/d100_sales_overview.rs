use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use contracts::dashboards::d100_sales_overview::{
    FilteredRowsResponse, SalesOverviewRequest, SalesOverviewResponse,
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::dashboards::d100_sales_overview::repository::LoadError;
use crate::dashboards::d100_sales_overview::service;
use crate::shared::data::csv_storage::StorageError;

/// Shared by the d100 handlers
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub enriched_sales_path: PathBuf,
}

pub type HandlerError = (StatusCode, String);

/// GET /api/d100/sales_overview?segmentos=Alto%20valor,Medio
pub async fn get_sales_overview(
    State(state): State<Arc<DashboardState>>,
    Query(request): Query<SalesOverviewRequest>,
) -> Result<Json<SalesOverviewResponse>, HandlerError> {
    tracing::info!(
        "D100 Dashboard: Getting sales overview (segmentos: {:?})",
        request.segmentos
    );

    let response = run_blocking(move || {
        service::get_sales_overview(&state.enriched_sales_path, &request)
    })
    .await?;

    tracing::info!(
        "D100 Dashboard: Returning {} filtered rows, {} products",
        response.filtered_rows,
        response.by_product.len()
    );
    Ok(Json(response))
}

/// GET /api/d100/rows?segmentos=Medio
pub async fn get_rows(
    State(state): State<Arc<DashboardState>>,
    Query(request): Query<SalesOverviewRequest>,
) -> Result<Json<FilteredRowsResponse>, HandlerError> {
    let response = run_blocking(move || {
        service::get_filtered_rows(&state.enriched_sales_path, &request)
    })
    .await?;

    tracing::info!("D100 Dashboard: Returning {} rows", response.rows.len());
    Ok(Json(response))
}

/// GET /api/d100/segments
pub async fn get_segments(
    State(state): State<Arc<DashboardState>>,
) -> Result<Json<Vec<String>>, HandlerError> {
    let segments = run_blocking(move || service::get_segments(&state.enriched_sales_path)).await?;
    Ok(Json(segments))
}

async fn run_blocking<T, F>(f: F) -> Result<T, HandlerError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, LoadError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::error!("D100 Dashboard: Failed to load sales: {}", e);
            Err((status_for(&e), e.to_string()))
        }
        Err(e) => {
            tracing::error!("D100 Dashboard: Load task failed: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

fn status_for(error: &LoadError) -> StatusCode {
    match error {
        LoadError::Storage(StorageError::MissingSource { .. }) => StatusCode::NOT_FOUND,
        LoadError::SchemaMismatch(_) | LoadError::InvalidValue { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LoadError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
