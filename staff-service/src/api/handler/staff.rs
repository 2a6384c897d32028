use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use shared::responses::{ErrorResponse, PagedResult};
use utoipa::IntoParams;

use crate::{
    api::state::StaffServiceAppState,
    domain::{
        export::{CSV_CONTENT_TYPE, CsvLayout, EXCEL_CONTENT_TYPE, EXPORT_FILE_BASE},
        search::SearchCriteria,
        staff::{CreateStaff, StaffView, UpdateStaff},
    },
    error::StaffServiceError,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text matched against names, email, department and position.
    pub search_term: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/staff",
    tag = "Staff",
    operation_id = "list_staff",
    params(SearchCriteria),
    responses(
        (status = 200, description = "One page of matching staff", body = PagedResult<StaffView>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_all(
    State(state): State<Arc<StaffServiceAppState>>,
    criteria: Result<Query<SearchCriteria>, QueryRejection>,
) -> Result<Json<PagedResult<StaffView>>, StaffServiceError> {
    let Query(criteria) = criteria?;
    let output = state.staff_service.list(criteria).await?;

    Ok(Json(output))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    tag = "Staff",
    operation_id = "get_staff",
    params(
        ("id" = i64, Path, description = "Staff ID")
    ),
    responses(
        (status = 200, description = "Staff found", body = StaffView),
        (status = 404, description = "Staff not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn find_by_id(
    State(state): State<Arc<StaffServiceAppState>>,
    Path(id): Path<i64>,
) -> Result<Json<StaffView>, StaffServiceError> {
    let output = state.staff_service.find_by_id(id).await?;

    Ok(Json(output))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    tag = "Staff",
    operation_id = "create_staff",
    request_body = CreateStaff,
    responses(
        (status = 201, description = "Staff created", body = StaffView),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create(
    State(state): State<Arc<StaffServiceAppState>>,
    staff: Result<Json<CreateStaff>, JsonRejection>,
) -> Result<impl IntoResponse, StaffServiceError> {
    let Json(staff) = staff?;
    let output = state.staff_service.create(staff).await?;
    let location = HeaderValue::from_str(&format!("/api/staff/{}", output.id))
        .map_err(|e| StaffServiceError::Internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(output),
    ))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    tag = "Staff",
    operation_id = "update_staff",
    params(
        ("id" = i64, Path, description = "Staff ID")
    ),
    request_body = UpdateStaff,
    responses(
        (status = 200, description = "Staff updated", body = StaffView),
        (status = 400, description = "Invalid payload", body = ErrorResponse),
        (status = 404, description = "Staff not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update(
    State(state): State<Arc<StaffServiceAppState>>,
    Path(id): Path<i64>,
    staff: Result<Json<UpdateStaff>, JsonRejection>,
) -> Result<Json<StaffView>, StaffServiceError> {
    let Json(staff) = staff?;
    let output = state.staff_service.update(id, staff).await?;

    Ok(Json(output))
}

#[utoipa::path(
    delete,
    path = "/api/staff/{id}",
    tag = "Staff",
    operation_id = "delete_staff",
    params(
        ("id" = i64, Path, description = "Staff ID")
    ),
    responses(
        (status = 204, description = "Staff deleted"),
        (status = 404, description = "Staff not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete(
    State(state): State<Arc<StaffServiceAppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StaffServiceError> {
    state.staff_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/staff/search",
    tag = "Staff",
    operation_id = "search_staff",
    params(SearchQuery),
    responses(
        (status = 200, description = "Up to 100 matching staff", body = Vec<StaffView>),
        (status = 400, description = "Missing search term", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<Arc<StaffServiceAppState>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<StaffView>>, StaffServiceError> {
    let Query(query) = query?;
    let term = query.search_term.unwrap_or_default();
    let output = state.staff_service.search(&term).await?;

    Ok(Json(output))
}

#[utoipa::path(
    get,
    path = "/api/staff/export/csv",
    tag = "Staff",
    operation_id = "export_staff_csv",
    responses(
        (status = 200, description = "All staff as CSV", content_type = "text/csv", body = String)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn export_csv(
    State(state): State<Arc<StaffServiceAppState>>,
) -> Result<impl IntoResponse, StaffServiceError> {
    let bytes = state.staff_service.export(&CsvLayout::COMPACT).await?;

    Ok((attachment_headers(CSV_CONTENT_TYPE, "csv")?, bytes))
}

#[utoipa::path(
    get,
    path = "/api/staff/export/excel",
    tag = "Staff",
    operation_id = "export_staff_excel",
    responses(
        (
            status = 200,
            description = "All staff as a spreadsheet download (CSV content)",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            body = String
        )
    )
)]
#[tracing::instrument(skip(state))]
pub async fn export_excel(
    State(state): State<Arc<StaffServiceAppState>>,
) -> Result<impl IntoResponse, StaffServiceError> {
    let bytes = state.staff_service.export(&CsvLayout::REPORT).await?;

    Ok((attachment_headers(EXCEL_CONTENT_TYPE, "xlsx")?, bytes))
}

fn attachment_headers(
    content_type: &'static str,
    extension: &str,
) -> Result<HeaderMap, StaffServiceError> {
    let file_name = shared::time::stamped_file_name(EXPORT_FILE_BASE, extension, Utc::now());
    let disposition =
        HeaderValue::from_str(&format!("attachment; filename=\"{file_name}\""))
            .map_err(|e| StaffServiceError::Internal(e.to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok(headers)
}

#[utoipa::path(
    get,
    path = "/api/staff/departments",
    tag = "Staff",
    operation_id = "list_departments",
    responses(
        (status = 200, description = "Departments of active staff, sorted", body = Vec<String>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn departments(
    State(state): State<Arc<StaffServiceAppState>>,
) -> Result<Json<Vec<String>>, StaffServiceError> {
    let output = state.staff_service.departments().await?;

    Ok(Json(output))
}

#[utoipa::path(
    get,
    path = "/api/staff/positions",
    tag = "Staff",
    operation_id = "list_positions",
    responses(
        (status = 200, description = "Positions of active staff, sorted", body = Vec<String>)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn positions(
    State(state): State<Arc<StaffServiceAppState>>,
) -> Result<Json<Vec<String>>, StaffServiceError> {
    let output = state.staff_service.positions().await?;

    Ok(Json(output))
}
