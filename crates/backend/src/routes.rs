use axum::{routing::get, Router};
use std::sync::Arc;

use crate::api::handlers;
use crate::api::handlers::d100_sales_overview::DashboardState;

/// Application routes
pub fn configure_routes(state: DashboardState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // DASHBOARDS
        // ========================================
        // D100 Sales Overview Dashboard
        .route(
            "/api/d100/sales_overview",
            get(handlers::d100_sales_overview::get_sales_overview),
        )
        .route("/api/d100/rows", get(handlers::d100_sales_overview::get_rows))
        .route(
            "/api/d100/segments",
            get(handlers::d100_sales_overview::get_segments),
        )
        .with_state(state)
}
