use std::sync::Arc;

use db::DBService;
use services::services::custom_report::{ReportSource, SqliteReportSource};

pub mod config;
pub mod error;
pub mod extractors;
pub mod routes;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    reports: Arc<dyn ReportSource>,
}

impl AppState {
    pub fn new(reports: Arc<dyn ReportSource>) -> Self {
        Self { reports }
    }

    pub fn from_db(db: &DBService) -> Self {
        Self::new(Arc::new(SqliteReportSource::new(db.pool.clone())))
    }

    pub fn reports(&self) -> &dyn ReportSource {
        self.reports.as_ref()
    }
}
