//! Resolves a column request against the catalog, runs the flattening for
//! each table involved and projects the requested columns.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use super::{
    CustomReportError,
    catalog::{self, ReportEntity, ReportTable},
    export::ExportFormat,
    source::ReportSource,
    values::ReportRecord,
};

/// Upper bound on preview rows regardless of the requested limit
pub const PREVIEW_ROW_LIMIT: usize = 10;

/// One `(table, column)` pair picked in the builder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Composite `table.column` key used by the preview grid
    pub fn key(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Xlsx,
}

impl ReportFormat {
    /// File format for downloads; `None` for the JSON preview
    pub fn export_format(self) -> Option<ExportFormat> {
        match self {
            Self::Json => None,
            Self::Csv => Some(ExportFormat::Archive),
            Self::Xlsx => Some(ExportFormat::Spreadsheet),
        }
    }
}

/// Body of `POST /custom-report`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CustomReportRequest {
    pub columns: Vec<ColumnRef>,
    pub format: ReportFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub table_id: Option<String>,
}

/// Projected rows of one table, ready for encoding
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTableData {
    pub entity: ReportEntity,
    pub columns: Vec<&'static str>,
    pub rows: Vec<ReportRecord>,
}

#[derive(Debug)]
pub enum ReportOutput {
    Preview(Vec<ReportRecord>),
    Export {
        format: ExportFormat,
        tables: Vec<ReportTableData>,
    },
}

pub struct ReportExecutor<'a> {
    source: &'a dyn ReportSource,
}

impl<'a> ReportExecutor<'a> {
    pub fn new(source: &'a dyn ReportSource) -> Self {
        Self { source }
    }

    pub async fn execute(
        &self,
        company_id: Uuid,
        request: &CustomReportRequest,
    ) -> Result<ReportOutput, CustomReportError> {
        match request.format.export_format() {
            None => self
                .preview(company_id, request)
                .await
                .map(ReportOutput::Preview),
            Some(format) => self
                .export_tables(company_id, &request.columns, request.limit)
                .await
                .map(|tables| ReportOutput::Export { format, tables }),
        }
    }

    /// Single-table sample of at most [`PREVIEW_ROW_LIMIT`] rows.
    ///
    /// The table is `table_id` when given, otherwise the first column's table.
    /// Columns of other tables are ignored. An empty selection returns no rows
    /// without touching the source.
    pub async fn preview(
        &self,
        company_id: Uuid,
        request: &CustomReportRequest,
    ) -> Result<Vec<ReportRecord>, CustomReportError> {
        let Some(table) = preview_table(request)? else {
            debug!(company_id = %company_id, "Custom report preview with no columns");
            return Ok(Vec::new());
        };

        let columns = resolve_columns(
            table,
            request
                .columns
                .iter()
                .filter(|column| column.table == table.entity.id()),
        )?;
        if columns.is_empty() {
            debug!(
                company_id = %company_id,
                table = %table.entity,
                "Custom report preview with no columns for table"
            );
            return Ok(Vec::new());
        }

        let limit = request
            .limit
            .map_or(PREVIEW_ROW_LIMIT as u32, |limit| {
                limit.min(PREVIEW_ROW_LIMIT as u32)
            });

        let rows = self
            .source
            .flatten(table.entity, company_id, Some(limit))
            .await?;
        let records: Vec<ReportRecord> = rows.iter().map(|row| row.project(&columns)).collect();

        info!(
            company_id = %company_id,
            table = %table.entity,
            columns = columns.len(),
            rows = records.len(),
            "Custom report preview"
        );
        Ok(records)
    }

    /// One table per distinct entity, in order of first appearance.
    /// Tables are flattened one after another; the first failure aborts.
    pub async fn export_tables(
        &self,
        company_id: Uuid,
        columns: &[ColumnRef],
        limit: Option<u32>,
    ) -> Result<Vec<ReportTableData>, CustomReportError> {
        if columns.is_empty() {
            return Err(CustomReportError::InvalidRequest(
                "no columns selected".to_string(),
            ));
        }

        let groups = group_by_table(columns)?;
        let mut tables = Vec::with_capacity(groups.len());

        for (table, columns) in groups {
            let rows = self
                .source
                .flatten(table.entity, company_id, limit)
                .await?
                .iter()
                .map(|row| row.project(&columns))
                .collect();
            tables.push(ReportTableData {
                entity: table.entity,
                columns,
                rows,
            });
        }

        info!(
            company_id = %company_id,
            tables = tables.len(),
            rows = tables.iter().map(|t| t.rows.len()).sum::<usize>(),
            "Custom report export data ready"
        );
        Ok(tables)
    }
}

fn lookup(table: &str) -> Result<&'static ReportTable, CustomReportError> {
    catalog::find(table).ok_or_else(|| CustomReportError::NotFound(table.to_string()))
}

fn preview_table(
    request: &CustomReportRequest,
) -> Result<Option<&'static ReportTable>, CustomReportError> {
    match (&request.table_id, request.columns.first()) {
        (Some(table_id), _) => lookup(table_id).map(Some),
        (None, Some(first)) => lookup(&first.table).map(Some),
        (None, None) => Ok(None),
    }
}

/// Catalog names for `columns`, deduplicated, in request order
fn resolve_columns<'c>(
    table: &'static ReportTable,
    columns: impl IntoIterator<Item = &'c ColumnRef>,
) -> Result<Vec<&'static str>, CustomReportError> {
    let mut resolved = Vec::new();
    for column in columns {
        let name = table.column(&column.column).ok_or_else(|| {
            CustomReportError::InvalidRequest(format!("unknown column: {}", column.key()))
        })?;
        if !resolved.contains(&name) {
            resolved.push(name);
        }
    }
    Ok(resolved)
}

fn group_by_table(
    columns: &[ColumnRef],
) -> Result<Vec<(&'static ReportTable, Vec<&'static str>)>, CustomReportError> {
    let mut groups: Vec<(&'static ReportTable, Vec<&'static str>)> = Vec::new();

    for column in columns {
        let table = lookup(&column.table)?;
        let position = match groups.iter().position(|(t, _)| t.entity == table.entity) {
            Some(position) => position,
            None => {
                groups.push((table, Vec::new()));
                groups.len() - 1
            }
        };
        let names = resolve_columns(table, [column])?;
        let group = &mut groups[position].1;
        for name in names {
            if !group.contains(&name) {
                group.push(name);
            }
        }
    }

    Ok(groups)
}
