//! File encoders for report downloads.

use chrono::{DateTime, Utc};
use convert_case::{Case, Casing};
use flate2::{Compression, write::GzEncoder};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use super::{CustomReportError, executor::ReportTableData, values::FlatValue};

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const ARCHIVE_CONTENT_TYPE: &str = "application/gzip";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One workbook, one worksheet per table
    Spreadsheet,
    /// Gzipped tar of one CSV per table
    Archive,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Spreadsheet => "xlsx",
            Self::Archive => "tar.gz",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Spreadsheet => XLSX_CONTENT_TYPE,
            Self::Archive => ARCHIVE_CONTENT_TYPE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// `totalPotential` -> `Total Potential`
pub fn column_header(column: &str) -> String {
    column.to_case(Case::Title)
}

pub fn filename(format: ExportFormat, generated_at: DateTime<Utc>) -> String {
    format!(
        "custom-report-{}.{}",
        generated_at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

pub fn encode(
    tables: &[ReportTableData],
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<ExportFile, CustomReportError> {
    let bytes = match format {
        ExportFormat::Spreadsheet => encode_workbook(tables)?,
        ExportFormat::Archive => encode_archive(tables, generated_at)?,
    };

    debug!(
        format = format.extension(),
        tables = tables.len(),
        bytes = bytes.len(),
        "Encoded custom report"
    );

    Ok(ExportFile {
        bytes,
        filename: filename(format, generated_at),
        content_type: format.content_type(),
    })
}

fn encode_workbook(tables: &[ReportTableData]) -> Result<Vec<u8>, CustomReportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(table.entity.table().title)?;

        for (col, column) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, column_header(column), &bold)?;
        }
        for (index, record) in table.rows.iter().enumerate() {
            let row = index as u32 + 1;
            for (col, value) in record.values().enumerate() {
                write_cell(worksheet, row, col as u16, value)?;
            }
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &FlatValue,
) -> Result<(), CustomReportError> {
    match value {
        FlatValue::Null => {}
        FlatValue::Bool(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        FlatValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        FlatValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
    }
    Ok(())
}

fn encode_csv(table: &ReportTableData) -> Result<Vec<u8>, CustomReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns.iter().map(|column| column_header(column)))?;
    for record in &table.rows {
        writer.write_record(record.values().map(ToString::to_string))?;
    }
    writer
        .into_inner()
        .map_err(|err| CustomReportError::from(err.into_error()))
}

fn encode_archive(
    tables: &[ReportTableData],
    generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, CustomReportError> {
    let mut archive = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let mtime = u64::try_from(generated_at.timestamp()).unwrap_or_default();

    for table in tables {
        let csv = encode_csv(table)?;
        let mut header = tar::Header::new_gnu();
        header.set_size(csv.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(mtime);
        archive.append_data(
            &mut header,
            format!("{}.csv", table.entity.id()),
            csv.as_slice(),
        )?;
    }

    Ok(archive.into_inner()?.finish()?)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Read};

    use chrono::TimeZone;
    use flate2::read::GzDecoder;

    use super::*;
    use crate::services::custom_report::{
        catalog::ReportEntity,
        values::{FlatRow, ReportRecord},
    };

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 14, 5, 9).unwrap()
    }

    fn records(columns: &[&'static str], rows: Vec<FlatRow>) -> Vec<ReportRecord> {
        rows.iter().map(|row| row.project(columns)).collect()
    }

    fn sample_tables() -> Vec<ReportTableData> {
        let user_columns = vec!["email", "isTechnicalRole"];
        let dealer_columns = vec!["name", "totalPotential", "remarks"];
        vec![
            ReportTableData {
                entity: ReportEntity::Users,
                rows: records(
                    &user_columns,
                    vec![
                        FlatRow::new()
                            .with("email", "ravi@acme.test")
                            .with("isTechnicalRole", false),
                    ],
                ),
                columns: user_columns,
            },
            ReportTableData {
                entity: ReportEntity::Dealers,
                rows: records(
                    &dealer_columns,
                    vec![
                        FlatRow::new()
                            .with("name", "Shree, Traders")
                            .with("totalPotential", 12.5),
                        FlatRow::new().with("name", "Om Depot").with("totalPotential", 80.0),
                    ],
                ),
                columns: dealer_columns,
            },
        ]
    }

    fn zip_entry(bytes: &[u8], name: &str) -> Option<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).ok()?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).unwrap();
        Some(contents)
    }

    #[test]
    fn test_headers_are_humanised() {
        assert_eq!(column_header("totalPotential"), "Total Potential");
        assert_eq!(column_header("phoneNo"), "Phone No");
        assert_eq!(column_header("email"), "Email");
    }

    #[test]
    fn test_filename_carries_timestamp_and_extension() {
        assert_eq!(
            filename(ExportFormat::Spreadsheet, generated_at()),
            "custom-report-20240315-140509.xlsx"
        );
        assert_eq!(
            filename(ExportFormat::Archive, generated_at()),
            "custom-report-20240315-140509.tar.gz"
        );
    }

    #[test]
    fn test_workbook_has_one_sheet_per_table() {
        let file = encode(&sample_tables(), ExportFormat::Spreadsheet, generated_at()).unwrap();
        assert_eq!(file.content_type, XLSX_CONTENT_TYPE);
        assert!(file.filename.ends_with(".xlsx"));

        let workbook = zip_entry(&file.bytes, "xl/workbook.xml").unwrap();
        assert!(workbook.contains(r#"name="Users""#));
        assert!(workbook.contains(r#"name="Dealers""#));
        assert!(zip_entry(&file.bytes, "xl/worksheets/sheet1.xml").is_some());
        assert!(zip_entry(&file.bytes, "xl/worksheets/sheet2.xml").is_some());
        assert!(zip_entry(&file.bytes, "xl/worksheets/sheet3.xml").is_none());

        let strings = zip_entry(&file.bytes, "xl/sharedStrings.xml").unwrap();
        assert!(strings.contains("Total Potential"));
        assert!(strings.contains("Is Technical Role"));
        assert!(strings.contains("Shree, Traders"));
    }

    #[test]
    fn test_archive_holds_one_csv_per_table() {
        let file = encode(&sample_tables(), ExportFormat::Archive, generated_at()).unwrap();
        assert_eq!(file.content_type, ARCHIVE_CONTENT_TYPE);

        let mut archive = tar::Archive::new(GzDecoder::new(file.bytes.as_slice()));
        let mut entries = Vec::new();
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            let path = entry.path().unwrap().to_string_lossy().into_owned();
            let mut contents = String::new();
            entry.read_to_string(&mut contents).unwrap();
            entries.push((path, contents));
        }

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "users.csv");
        assert_eq!(entries[0].1, "Email,Is Technical Role\nravi@acme.test,false\n");
        assert_eq!(entries[1].0, "dealers.csv");
        assert_eq!(
            entries[1].1,
            "Name,Total Potential,Remarks\n\"Shree, Traders\",12.5,\nOm Depot,80,\n"
        );
    }
}
