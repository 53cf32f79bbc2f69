//! Committed column selection across report tables.
//!
//! One canonical ordered list of `(entity, column)` pairs; everything the
//! builder shows per entity is derived from it through selectors.

use services::services::custom_report::{ColumnRef, ReportEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction<'a> {
    /// Add the column if absent, remove it if present
    Toggle {
        entity: ReportEntity,
        column: &'a str,
    },
    ClearEntity(ReportEntity),
    Reset,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSelection {
    committed: Vec<(ReportEntity, &'static str)>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next selection after `action`. Columns the catalog does not declare
    /// for the entity leave the selection unchanged.
    pub fn reduce(mut self, action: SelectionAction<'_>) -> Self {
        match action {
            SelectionAction::Toggle { entity, column } => {
                let Some(column) = entity.table().column(column) else {
                    return self;
                };
                match self
                    .committed
                    .iter()
                    .position(|entry| *entry == (entity, column))
                {
                    Some(index) => {
                        self.committed.remove(index);
                    }
                    None => self.committed.push((entity, column)),
                }
            }
            SelectionAction::ClearEntity(entity) => {
                self.committed.retain(|(e, _)| *e != entity);
            }
            SelectionAction::Reset => self.committed.clear(),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    /// Columns ticked for `entity`, in the order they were ticked
    pub fn checked_for(&self, entity: ReportEntity) -> Vec<&'static str> {
        self.committed
            .iter()
            .filter(|(e, _)| *e == entity)
            .map(|(_, column)| *column)
            .collect()
    }

    pub fn is_checked(&self, entity: ReportEntity, column: &str) -> bool {
        self.committed
            .iter()
            .any(|(e, c)| *e == entity && *c == column)
    }

    /// Entities with at least one committed column, in first-appearance order
    pub fn entities(&self) -> Vec<ReportEntity> {
        let mut entities = Vec::new();
        for (entity, _) in &self.committed {
            if !entities.contains(entity) {
                entities.push(*entity);
            }
        }
        entities
    }

    /// Wire form of the whole committed list
    pub fn columns(&self) -> Vec<ColumnRef> {
        self.committed
            .iter()
            .map(|(entity, column)| ColumnRef::new(entity.id(), *column))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toggle(entity: ReportEntity, column: &str) -> SelectionAction<'_> {
        SelectionAction::Toggle { entity, column }
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let selection = ColumnSelection::new()
            .reduce(toggle(ReportEntity::Dealers, "name"))
            .reduce(toggle(ReportEntity::Dealers, "region"));
        assert_eq!(selection.checked_for(ReportEntity::Dealers), ["name", "region"]);

        let selection = selection.reduce(toggle(ReportEntity::Dealers, "name"));
        assert_eq!(selection.checked_for(ReportEntity::Dealers), ["region"]);
        assert!(!selection.is_checked(ReportEntity::Dealers, "name"));
    }

    #[test]
    fn test_undeclared_columns_are_ignored() {
        let selection = ColumnSelection::new().reduce(toggle(ReportEntity::Users, "password"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_clear_entity_leaves_other_entities() {
        let selection = ColumnSelection::new()
            .reduce(toggle(ReportEntity::Users, "email"))
            .reduce(toggle(ReportEntity::Dealers, "name"))
            .reduce(toggle(ReportEntity::Users, "role"))
            .reduce(SelectionAction::ClearEntity(ReportEntity::Users));

        assert!(selection.checked_for(ReportEntity::Users).is_empty());
        assert_eq!(selection.checked_for(ReportEntity::Dealers), ["name"]);
        assert_eq!(selection.entities(), [ReportEntity::Dealers]);
    }

    #[test]
    fn test_columns_keep_commit_order_across_entities() {
        let selection = ColumnSelection::new()
            .reduce(toggle(ReportEntity::Users, "email"))
            .reduce(toggle(ReportEntity::Dealers, "name"))
            .reduce(toggle(ReportEntity::Users, "role"));

        assert_eq!(
            selection.entities(),
            [ReportEntity::Users, ReportEntity::Dealers]
        );
        assert_eq!(
            selection.columns(),
            [
                ColumnRef::new("users", "email"),
                ColumnRef::new("dealers", "name"),
                ColumnRef::new("users", "role"),
            ]
        );
        assert_eq!(selection.reduce(SelectionAction::Reset).len(), 0);
    }
}
