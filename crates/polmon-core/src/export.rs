//! # Export Serialization
//!
//! Serializes a filtered view, with every retained column, for delivery by
//! the mail relay.
//!
//! - **CSV**: UTF-8 with a byte-order mark, comma separated, non-numeric
//!   fields quoted, nulls written as empty strings.
//! - **XLSX**: a single worksheet with a bold header row; null cells are
//!   left blank.

use std::fmt;
use std::str::FromStr;

use csv::{QuoteStyle, WriterBuilder};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::ExportError;
use crate::record::RecordId;

const BOM: &str = "\u{feff}";

/// Delivery format chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Wire name used in the relay payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }

    /// Serialize the rows `rows` of `dataset` in this format.
    pub fn serialize(&self, dataset: &Dataset, rows: &[RecordId]) -> Result<Vec<u8>, ExportError> {
        match self {
            Self::Csv => to_csv(dataset, rows),
            Self::Xlsx => to_xlsx(dataset, rows),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            other => Err(format!("unsupported export format: {other:?}")),
        }
    }
}

/// CSV bytes of the filtered view.
pub fn to_csv(dataset: &Dataset, rows: &[RecordId]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b',')
        .quote(b'"')
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(BOM.as_bytes().to_vec());

    writer.write_record(dataset.headers())?;
    for record in rows.iter().filter_map(|id| dataset.get(*id)) {
        writer.write_record(record.cells.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Buffer(e.to_string()))
}

/// XLSX bytes of the filtered view.
pub fn to_xlsx(dataset: &Dataset, rows: &[RecordId]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, name) in dataset.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col_num(col)?, name, &bold)?;
    }
    for (offset, record) in rows.iter().filter_map(|id| dataset.get(*id)).enumerate() {
        let row = row_num(offset + 1)?;
        for (col, value) in record.cells.iter().enumerate() {
            if let Some(value) = value {
                sheet.write_string(row, col_num(col)?, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn row_num(index: usize) -> Result<RowNum, ExportError> {
    RowNum::try_from(index).map_err(|_| ExportError::TooLarge(format!("row {index}")))
}

fn col_num(index: usize) -> Result<ColNum, ExportError> {
    ColNum::try_from(index).map_err(|_| ExportError::TooLarge(format!("column {index}")))
}
