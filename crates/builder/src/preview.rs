//! Bounded preview grid for the active entity.

use std::{collections::BTreeMap, fmt};

use services::services::custom_report::{
    FlatValue, PREVIEW_ROW_LIMIT, ReportEntity, export::column_header,
};

/// A preview row as returned by the server, keyed by bare column name
pub type PreviewRecord = BTreeMap<String, FlatValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewColumn {
    /// `"{table}.{column}"`
    pub key: String,
    pub column: &'static str,
    pub header: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    entity: ReportEntity,
    columns: Vec<PreviewColumn>,
    rows: Vec<BTreeMap<String, FlatValue>>,
}

impl PreviewTable {
    /// Column definitions come from `committed`, not from the record keys, so
    /// a column missing from the payload shows as empty cells.
    pub fn build(
        entity: ReportEntity,
        committed: &[&'static str],
        records: &[PreviewRecord],
    ) -> Self {
        let columns: Vec<PreviewColumn> = committed
            .iter()
            .copied()
            .map(|column| PreviewColumn {
                key: format!("{}.{}", entity.id(), column),
                column,
                header: column_header(column),
            })
            .collect();

        let rows = records
            .iter()
            .take(PREVIEW_ROW_LIMIT)
            .map(|record| {
                columns
                    .iter()
                    .map(|c| {
                        let value = record.get(c.column).cloned().unwrap_or(FlatValue::Null);
                        (c.key.clone(), value)
                    })
                    .collect()
            })
            .collect();

        Self {
            entity,
            columns,
            rows,
        }
    }

    pub fn entity(&self) -> ReportEntity {
        self.entity
    }

    pub fn columns(&self) -> &[PreviewColumn] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, row: usize, key: &str) -> Option<&FlatValue> {
        self.rows.get(row)?.get(key)
    }

    /// Same rows with only the columns still in `committed`
    pub fn restrict(&self, committed: &[&'static str]) -> Self {
        let columns: Vec<PreviewColumn> = self
            .columns
            .iter()
            .filter(|c| committed.contains(&c.column))
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .filter(|(key, _)| columns.iter().any(|c| &c.key == *key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .collect();

        Self {
            entity: self.entity,
            columns,
            rows,
        }
    }

    /// Plain-text grid with columns padded to their widest cell
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|c| row.get(&c.key).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain([c.header.chars().count()])
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        // trailing empty cells are dropped so lines never end in a separator
        let line = |values: Vec<&str>| {
            let filled = values
                .iter()
                .rposition(|value| !value.is_empty())
                .map_or(0, |last| last + 1);
            values[..filled]
                .iter()
                .zip(&widths)
                .map(|(value, &width)| format!("{value:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_string()
        };

        let mut out = vec![
            line(self.columns.iter().map(|c| c.header.as_str()).collect()),
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        ];
        out.extend(
            cells
                .iter()
                .map(|row| line(row.iter().map(String::as_str).collect())),
        );
        if cells.is_empty() {
            out.push("(no rows)".to_string());
        }
        out.join("\n")
    }
}

impl fmt::Display for PreviewTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
