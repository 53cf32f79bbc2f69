//! Report builder state machine.
//!
//! `Idle -> EntitySelected -> PreviewLoading -> PreviewReady | PreviewFailed`,
//! with `Exporting` wrapping whichever state was active when a download
//! started. Every preview fetch carries a generation number; results for any
//! generation other than the current one are dropped.

use services::services::custom_report::{
    CustomReportRequest, PREVIEW_ROW_LIMIT, ReportEntity, ReportFormat,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    preview::{PreviewRecord, PreviewTable},
    selection::{ColumnSelection, SelectionAction},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("no report table selected")]
    NoEntitySelected,
    #[error("select at least one column to export")]
    NothingToExport,
    #[error("an export is already running")]
    ExportInProgress,
    #[error("no failed preview to retry")]
    NothingToRetry,
    #[error("{0} is not a download format")]
    NotAnExportFormat(ReportFormat),
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuilderState {
    Idle,
    EntitySelected {
        entity: ReportEntity,
    },
    PreviewLoading {
        entity: ReportEntity,
        generation: u64,
        /// Last ready table, narrowed to the columns still ticked
        stale: Option<PreviewTable>,
    },
    PreviewReady {
        entity: ReportEntity,
        table: PreviewTable,
    },
    PreviewFailed {
        entity: ReportEntity,
        message: String,
    },
    Exporting {
        previous: Box<BuilderState>,
    },
}

impl BuilderState {
    pub fn active_entity(&self) -> Option<ReportEntity> {
        match self {
            Self::Idle => None,
            Self::EntitySelected { entity }
            | Self::PreviewLoading { entity, .. }
            | Self::PreviewReady { entity, .. }
            | Self::PreviewFailed { entity, .. } => Some(*entity),
            Self::Exporting { previous } => previous.active_entity(),
        }
    }

    /// Table to show while in this state, if any
    pub fn table(&self) -> Option<&PreviewTable> {
        match self {
            Self::PreviewReady { table, .. } => Some(table),
            Self::PreviewLoading { stale, .. } => stale.as_ref(),
            Self::Exporting { previous } => previous.table(),
            _ => None,
        }
    }

    fn is_exporting(&self) -> bool {
        matches!(self, Self::Exporting { .. })
    }
}

/// A preview fetch for one generation
#[derive(Debug, Clone)]
pub struct PreviewTicket {
    pub generation: u64,
    pub request: CustomReportRequest,
}

#[derive(Debug)]
pub struct BuilderSession {
    selection: ColumnSelection,
    state: BuilderState,
    generation: u64,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderSession {
    pub fn new() -> Self {
        Self {
            selection: ColumnSelection::new(),
            state: BuilderState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    /// Make `entity` the active table. Commitments of other tables persist.
    /// Returns whether a preview fetch should be scheduled for the columns
    /// already committed on `entity`.
    pub fn select_entity(&mut self, entity: ReportEntity) -> Result<bool, BuilderError> {
        self.ensure_not_exporting()?;
        Ok(self.refresh(entity))
    }

    /// Toggle `column` on the active table. Returns whether a preview fetch
    /// should be scheduled.
    pub fn toggle(&mut self, column: &str) -> Result<bool, BuilderError> {
        self.ensure_not_exporting()?;
        let entity = self
            .state
            .active_entity()
            .ok_or(BuilderError::NoEntitySelected)?;

        let before = self.selection.len();
        self.reduce(SelectionAction::Toggle { entity, column });
        if self.selection.len() == before {
            return Ok(false);
        }
        Ok(self.refresh(entity))
    }

    /// Untick every column of the active table
    pub fn clear_entity(&mut self) -> Result<(), BuilderError> {
        self.ensure_not_exporting()?;
        let entity = self
            .state
            .active_entity()
            .ok_or(BuilderError::NoEntitySelected)?;
        self.reduce(SelectionAction::ClearEntity(entity));
        self.refresh(entity);
        Ok(())
    }

    /// Start a new report
    pub fn reset(&mut self) -> Result<(), BuilderError> {
        self.ensure_not_exporting()?;
        self.reduce(SelectionAction::Reset);
        self.generation += 1;
        self.state = BuilderState::Idle;
        Ok(())
    }

    /// Request for the preview currently awaited, if one is
    pub fn preview_ticket(&self) -> Option<PreviewTicket> {
        let BuilderState::PreviewLoading {
            entity, generation, ..
        } = self.current()
        else {
            return None;
        };

        let columns = self
            .selection
            .columns()
            .into_iter()
            .filter(|column| column.table == entity.id())
            .collect();
        Some(PreviewTicket {
            generation: *generation,
            request: CustomReportRequest {
                columns,
                format: ReportFormat::Json,
                limit: Some(PREVIEW_ROW_LIMIT as u32),
                table_id: Some(entity.id().to_string()),
            },
        })
    }

    /// Apply a finished preview fetch. Returns `false` when the result
    /// belongs to a superseded generation and was dropped.
    pub fn apply_preview(
        &mut self,
        generation: u64,
        result: Result<Vec<PreviewRecord>, String>,
    ) -> bool {
        let entity = match self.current() {
            BuilderState::PreviewLoading {
                entity,
                generation: current,
                ..
            } if *current == generation => *entity,
            _ => {
                debug!(generation, "Dropping superseded preview result");
                return false;
            }
        };

        let next = match result {
            Ok(records) => BuilderState::PreviewReady {
                entity,
                table: PreviewTable::build(
                    entity,
                    &self.selection.checked_for(entity),
                    &records,
                ),
            },
            Err(message) => BuilderState::PreviewFailed { entity, message },
        };
        *self.current_mut() = next;
        true
    }

    /// Refetch after a failed preview
    pub fn retry_preview(&mut self) -> Result<PreviewTicket, BuilderError> {
        let BuilderState::PreviewFailed { entity, .. } = self.current() else {
            return Err(BuilderError::NothingToRetry);
        };
        let entity = *entity;
        self.generation += 1;
        let generation = self.generation;
        *self.current_mut() = BuilderState::PreviewLoading {
            entity,
            generation,
            stale: None,
        };
        self.preview_ticket().ok_or(BuilderError::NothingToRetry)
    }

    /// Enter `Exporting` and build the download request for every committed
    /// column
    pub fn begin_export(
        &mut self,
        format: ReportFormat,
    ) -> Result<CustomReportRequest, BuilderError> {
        if format.export_format().is_none() {
            return Err(BuilderError::NotAnExportFormat(format));
        }
        self.ensure_not_exporting()?;
        if self.selection.is_empty() {
            return Err(BuilderError::NothingToExport);
        }

        let previous = std::mem::replace(&mut self.state, BuilderState::Idle);
        self.state = BuilderState::Exporting {
            previous: Box::new(previous),
        };

        Ok(CustomReportRequest {
            columns: self.selection.columns(),
            format,
            limit: None,
            table_id: None,
        })
    }

    /// Return to the state active before the export, whatever its outcome
    pub fn finish_export(&mut self) {
        let state = std::mem::replace(&mut self.state, BuilderState::Idle);
        self.state = match state {
            BuilderState::Exporting { previous } => *previous,
            other => other,
        };
    }

    fn reduce(&mut self, action: SelectionAction<'_>) {
        self.selection = std::mem::take(&mut self.selection).reduce(action);
    }

    /// Move to `PreviewLoading` when `entity` still has ticked columns
    fn refresh(&mut self, entity: ReportEntity) -> bool {
        self.generation += 1;
        let checked = self.selection.checked_for(entity);
        if checked.is_empty() {
            self.state = BuilderState::EntitySelected { entity };
            return false;
        }

        let stale = self
            .state
            .table()
            .filter(|table| table.entity() == entity)
            .map(|table| table.restrict(&checked));
        self.state = BuilderState::PreviewLoading {
            entity,
            generation: self.generation,
            stale,
        };
        true
    }

    fn ensure_not_exporting(&self) -> Result<(), BuilderError> {
        if self.state.is_exporting() {
            Err(BuilderError::ExportInProgress)
        } else {
            Ok(())
        }
    }

    /// State underneath a running export
    fn current(&self) -> &BuilderState {
        match &self.state {
            BuilderState::Exporting { previous } => previous.as_ref(),
            state => state,
        }
    }

    fn current_mut(&mut self) -> &mut BuilderState {
        match &mut self.state {
            BuilderState::Exporting { previous } => previous.as_mut(),
            state => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use services::services::custom_report::{ColumnRef, FlatValue};

    use super::*;

    fn dealer(name: &str, region: &str) -> PreviewRecord {
        [
            ("name".to_string(), FlatValue::Text(name.to_string())),
            ("region".to_string(), FlatValue::Text(region.to_string())),
        ]
        .into_iter()
        .collect()
    }

    fn loading_generation(session: &BuilderSession) -> u64 {
        session.preview_ticket().expect("preview pending").generation
    }

    #[test]
    fn test_toggle_requires_an_entity() {
        let mut session = BuilderSession::new();
        assert_eq!(session.toggle("name"), Err(BuilderError::NoEntitySelected));
        assert_eq!(session.state(), &BuilderState::Idle);
    }

    #[test]
    fn test_preview_flow() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Dealers).unwrap();
        assert_eq!(
            session.state(),
            &BuilderState::EntitySelected {
                entity: ReportEntity::Dealers
            }
        );

        assert!(session.toggle("name").unwrap());
        let ticket = session.preview_ticket().unwrap();
        assert_eq!(ticket.request.columns, [ColumnRef::new("dealers", "name")]);
        assert_eq!(ticket.request.format, ReportFormat::Json);
        assert_eq!(ticket.request.table_id.as_deref(), Some("dealers"));

        assert!(session.apply_preview(ticket.generation, Ok(vec![dealer("Om Depot", "North")])));
        let table = session.state().table().unwrap();
        assert_eq!(table.columns().len(), 1);
        assert_eq!(
            table.cell(0, "dealers.name"),
            Some(&FlatValue::Text("Om Depot".into()))
        );
    }

    #[test]
    fn test_superseded_results_are_dropped() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Dealers).unwrap();
        session.toggle("name").unwrap();
        let first = loading_generation(&session);
        session.toggle("region").unwrap();
        let second = loading_generation(&session);

        assert!(!session.apply_preview(first, Ok(vec![dealer("Old", "Old")])));
        assert!(matches!(session.state(), BuilderState::PreviewLoading { .. }));

        assert!(session.apply_preview(second, Ok(vec![dealer("New", "East")])));
        assert_eq!(session.state().table().unwrap().columns().len(), 2);

        // a late result for an earlier generation must not overwrite
        assert!(!session.apply_preview(first, Err("timeout".into())));
        assert!(matches!(session.state(), BuilderState::PreviewReady { .. }));
    }

    #[test]
    fn test_switching_entity_keeps_commitments_and_invalidates_preview() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Users).unwrap();
        session.toggle("email").unwrap();
        let pending = loading_generation(&session);

        session.select_entity(ReportEntity::Dealers).unwrap();
        assert!(!session.apply_preview(pending, Ok(vec![])));
        assert_eq!(
            session.selection().checked_for(ReportEntity::Users),
            ["email"]
        );
        assert!(
            session
                .selection()
                .checked_for(ReportEntity::Dealers)
                .is_empty()
        );
    }

    #[test]
    fn test_switching_back_refetches_committed_columns() {
        let mut session = BuilderSession::new();
        assert!(!session.select_entity(ReportEntity::Users).unwrap());
        session.toggle("email").unwrap();
        let generation = loading_generation(&session);
        session.apply_preview(generation, Ok(vec![]));

        assert!(!session.select_entity(ReportEntity::Dealers).unwrap());
        assert!(session.preview_ticket().is_none());
        session.toggle("name").unwrap();
        let dealers = loading_generation(&session);
        session.apply_preview(dealers, Ok(vec![dealer("Om Depot", "North")]));

        assert!(session.select_entity(ReportEntity::Users).unwrap());
        let ticket = session.preview_ticket().expect("preview for users");
        assert!(ticket.generation > dealers);
        assert_eq!(ticket.request.columns, [ColumnRef::new("users", "email")]);
        assert_eq!(ticket.request.table_id.as_deref(), Some("users"));
        // the dealers grid must not leak into the users preview
        assert_eq!(session.state().table(), None);

        assert!(session.apply_preview(ticket.generation, Ok(vec![])));
        let table = session.state().table().unwrap();
        assert_eq!(table.entity(), ReportEntity::Users);
    }

    #[test]
    fn test_reselecting_the_active_entity_keeps_its_grid() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Dealers).unwrap();
        session.toggle("name").unwrap();
        let generation = loading_generation(&session);
        session.apply_preview(generation, Ok(vec![dealer("Om Depot", "North")]));

        assert!(session.select_entity(ReportEntity::Dealers).unwrap());
        let stale = session.state().table().unwrap();
        assert_eq!(
            stale.cell(0, "dealers.name"),
            Some(&FlatValue::Text("Om Depot".into()))
        );
    }

    #[test]
    fn test_unticking_a_column_hides_it_before_refetch() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Dealers).unwrap();
        session.toggle("name").unwrap();
        session.toggle("region").unwrap();
        let generation = loading_generation(&session);
        session.apply_preview(generation, Ok(vec![dealer("Om Depot", "North")]));

        assert!(session.toggle("region").unwrap());
        let stale = session.state().table().unwrap();
        let keys: Vec<_> = stale.columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["dealers.name"]);
    }

    #[test]
    fn test_clearing_the_entity_stops_previewing() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Dealers).unwrap();
        session.toggle("name").unwrap();
        session.clear_entity().unwrap();

        assert!(session.preview_ticket().is_none());
        assert!(session.selection().is_empty());

        assert!(session.toggle("name").unwrap());
        assert!(session.preview_ticket().is_some());
    }

    #[test]
    fn test_failed_preview_can_be_retried() {
        let mut session = BuilderSession::new();
        assert_eq!(session.retry_preview().unwrap_err(), BuilderError::NothingToRetry);

        session.select_entity(ReportEntity::Dealers).unwrap();
        session.toggle("name").unwrap();
        let generation = loading_generation(&session);
        session.apply_preview(generation, Err("database is locked".into()));
        assert_eq!(
            session.state(),
            &BuilderState::PreviewFailed {
                entity: ReportEntity::Dealers,
                message: "database is locked".into()
            }
        );

        let ticket = session.retry_preview().unwrap();
        assert!(ticket.generation > generation);
        assert!(session.apply_preview(ticket.generation, Ok(vec![])));
        assert!(matches!(session.state(), BuilderState::PreviewReady { .. }));
    }

    #[test]
    fn test_export_returns_to_previous_state() {
        let mut session = BuilderSession::new();
        assert_eq!(
            session.begin_export(ReportFormat::Xlsx).unwrap_err(),
            BuilderError::NothingToExport
        );

        session.select_entity(ReportEntity::Users).unwrap();
        session.toggle("email").unwrap();
        session.select_entity(ReportEntity::Dealers).unwrap();
        let before = session.state().clone();

        assert_eq!(
            session.begin_export(ReportFormat::Json).unwrap_err(),
            BuilderError::NotAnExportFormat(ReportFormat::Json)
        );

        let request = session.begin_export(ReportFormat::Csv).unwrap();
        assert_eq!(request.columns, [ColumnRef::new("users", "email")]);
        assert_eq!(request.limit, None);
        assert!(matches!(session.state(), BuilderState::Exporting { .. }));
        assert_eq!(session.toggle("name"), Err(BuilderError::ExportInProgress));
        assert_eq!(
            session.begin_export(ReportFormat::Xlsx).unwrap_err(),
            BuilderError::ExportInProgress
        );

        session.finish_export();
        assert_eq!(session.state(), &before);
        assert_eq!(session.selection().len(), 1);
    }

    #[test]
    fn test_preview_started_before_export_still_lands() {
        let mut session = BuilderSession::new();
        session.select_entity(ReportEntity::Dealers).unwrap();
        session.toggle("name").unwrap();
        let generation = loading_generation(&session);

        session.begin_export(ReportFormat::Xlsx).unwrap();
        assert!(session.apply_preview(generation, Ok(vec![dealer("Om Depot", "North")])));

        session.finish_export();
        assert!(matches!(session.state(), BuilderState::PreviewReady { .. }));
    }
}
