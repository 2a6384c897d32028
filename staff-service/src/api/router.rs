use std::sync::Arc;

use axum::{Router, routing::get};

use crate::api::{
    handler::{health, staff},
    state::StaffServiceAppState,
};

/// Application routes without the HTTP middleware, shared by the binary and
/// the integration tests.
pub fn build_router(state: Arc<StaffServiceAppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/staff", get(staff::find_all).post(staff::create))
        .route("/api/staff/search", get(staff::search))
        .route("/api/staff/export/csv", get(staff::export_csv))
        .route("/api/staff/export/excel", get(staff::export_excel))
        .route("/api/staff/departments", get(staff::departments))
        .route("/api/staff/positions", get(staff::positions))
        .route(
            "/api/staff/{id}",
            get(staff::find_by_id)
                .put(staff::update)
                .delete(staff::delete),
        )
        .with_state(state)
}
