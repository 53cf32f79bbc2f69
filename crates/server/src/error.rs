use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use services::services::custom_report::{CustomReportError, ReportErrorKind};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    CustomReport(#[from] CustomReportError),
    #[error("missing or invalid X-Company-Id header")]
    Unauthorized,
    #[error("invalid request body: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::CustomReport(err) => match err.kind() {
                ReportErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
                ReportErrorKind::NotFound => StatusCode::NOT_FOUND,
                ReportErrorKind::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, ResponseJson(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}
