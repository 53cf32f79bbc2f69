use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::header,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::{get, post},
};
use chrono::Utc;
use services::services::custom_report::{
    CustomReportRequest, ReportExecutor, ReportOutput, ReportTableInfo, catalog, export,
};
use tracing::info;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, extractors::CompanyScope};

/// POST /api/custom-report
/// JSON preview for `format = json`, otherwise a file download
pub async fn run_custom_report(
    State(state): State<AppState>,
    CompanyScope(company_id): CompanyScope,
    payload: Result<Json<CustomReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let executor = ReportExecutor::new(state.reports());

    match executor.execute(company_id, &request).await? {
        ReportOutput::Preview(rows) => Ok(ResponseJson(ApiResponse::success(rows)).into_response()),
        ReportOutput::Export { format, tables } => {
            let file = export::encode(&tables, format, Utc::now())?;
            info!(
                company_id = %company_id,
                filename = %file.filename,
                bytes = file.bytes.len(),
                "Custom report exported"
            );

            let disposition = format!("attachment; filename=\"{}\"", file.filename);
            Ok((
                [
                    (header::CONTENT_TYPE, file.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                file.bytes,
            )
                .into_response())
        }
    }
}

/// GET /api/custom-report/tables
pub async fn list_tables() -> ResponseJson<ApiResponse<Vec<ReportTableInfo>>> {
    ResponseJson(ApiResponse::success(catalog::table_infos()))
}

pub fn router(_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/custom-report", post(run_custom_report))
        .route("/custom-report/tables", get(list_tables))
}
