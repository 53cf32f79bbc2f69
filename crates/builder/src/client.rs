//! HTTP client for the custom report endpoints.

use reqwest::{StatusCode, header};
use serde::de::DeserializeOwned;
use services::services::custom_report::{CustomReportRequest, ReportTableInfo};
use thiserror::Error;
use tracing::debug;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::preview::PreviewRecord;

const COMPANY_HEADER: &str = "x-company-id";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

/// A downloaded export
#[derive(Debug, Clone)]
pub struct ReportDownload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReportClient {
    http: reqwest::Client,
    base_url: String,
    company_id: Uuid,
}

impl ReportClient {
    pub fn new(base_url: &str, company_id: Uuid) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            company_id,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn tables(&self) -> Result<Vec<ReportTableInfo>, ClientError> {
        let response = self.http.get(self.url("/custom-report/tables")).send().await?;
        envelope(response).await
    }

    pub async fn preview(
        &self,
        request: &CustomReportRequest,
    ) -> Result<Vec<PreviewRecord>, ClientError> {
        let response = self.post(request).await?;
        envelope(response).await
    }

    pub async fn export(&self, request: &CustomReportRequest) -> Result<ReportDownload, ClientError> {
        let response = self.post(request).await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let headers = response.headers();
        let filename = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(attachment_filename)
            .unwrap_or_else(|| format!("custom-report.{}", request.format));
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        debug!(filename = %filename, bytes = bytes.len(), "Downloaded custom report");
        Ok(ReportDownload {
            filename,
            content_type,
            bytes,
        })
    }

    async fn post(&self, request: &CustomReportRequest) -> Result<reqwest::Response, ClientError> {
        Ok(self
            .http
            .post(self.url("/custom-report"))
            .header(COMPANY_HEADER, self.company_id.to_string())
            .json(request)
            .send()
            .await?)
    }
}

async fn envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    let body: ApiResponse<T> = response.json().await?;
    body.into_result()
        .map_err(|message| ClientError::Api { status, message })
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let message = match response.json::<ApiResponse<serde_json::Value>>().await {
        Ok(body) => body.message.unwrap_or_else(|| status.to_string()),
        Err(_) => status.to_string(),
    };
    ClientError::Api { status, message }
}

/// `attachment; filename="x.xlsx"` -> `x.xlsx`
fn attachment_filename(disposition: &str) -> Option<String> {
    disposition.split(';').map(str::trim).find_map(|part| {
        let name = part.strip_prefix("filename=")?.trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
