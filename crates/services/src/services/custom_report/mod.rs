//! Custom report builder: catalog lookup, per-table flattening, column
//! projection and file export.

pub mod catalog;
pub mod executor;
pub mod export;
pub mod flatten;
pub mod source;
pub mod values;

use thiserror::Error;

pub use catalog::{ReportEntity, ReportTable, ReportTableInfo};
pub use executor::{
    ColumnRef, CustomReportRequest, PREVIEW_ROW_LIMIT, ReportExecutor, ReportFormat,
    ReportOutput, ReportTableData,
};
pub use export::{ExportFile, ExportFormat};
pub use source::{ReportSource, SqliteReportSource};
pub use values::{FlatRow, FlatValue, ReportRecord};

#[derive(Debug, Error)]
pub enum CustomReportError {
    #[error("unknown report table: {0}")]
    NotFound(String),
    #[error("invalid report request: {0}")]
    InvalidRequest(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid decimal in {field}: {value:?}")]
    InvalidDecimal { field: &'static str, value: String },
    #[error("export encoding failed: {0}")]
    Encoding(String),
}

/// Coarse classification used to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportErrorKind {
    InvalidRequest,
    NotFound,
    UpstreamFailure,
}

impl CustomReportError {
    pub fn kind(&self) -> ReportErrorKind {
        match self {
            Self::NotFound(_) => ReportErrorKind::NotFound,
            Self::InvalidRequest(_) => ReportErrorKind::InvalidRequest,
            Self::Database(_) | Self::InvalidDecimal { .. } | Self::Encoding(_) => {
                ReportErrorKind::UpstreamFailure
            }
        }
    }
}

impl From<std::io::Error> for CustomReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<csv::Error> for CustomReportError {
    fn from(err: csv::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for CustomReportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Encoding(err.to_string())
    }
}
