//! # Error Types
//!
//! One `thiserror` enum per concern. Loading errors are fatal at startup,
//! the rest are turned into user notifications by the web layer.

use thiserror::Error;

/// Failure while turning the fetched source text into a [`crate::Dataset`].
#[derive(Error, Debug)]
pub enum DatasetError {
    /// A column the dashboard cannot work without is absent from the header.
    #[error("required column {0:?} is missing from the source header")]
    MissingColumn(String),

    /// The delimited text could not be read.
    #[error("malformed source CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Failure while serializing a filtered view for export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV writer failure.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV writer could not hand back its buffer.
    #[error("CSV buffer could not be finalized: {0}")]
    Buffer(String),

    /// Spreadsheet writer failure.
    #[error("XLSX serialization failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// The view is wider or taller than a worksheet allows.
    #[error("view does not fit in a worksheet: {0}")]
    TooLarge(String),
}

/// Rejected export contact details.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The email address does not look like an address.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// The institution name is shorter than two characters.
    #[error("institution name must be at least {min} characters")]
    InstitutionTooShort {
        /// Minimum accepted length in characters.
        min: usize,
    },

    /// The address pattern failed to compile.
    #[error("email pattern: {0}")]
    Pattern(String),
}

/// Language or translation table problems.
#[derive(Error, Debug)]
pub enum I18nError {
    /// The language flag is neither `CN` nor `EN`.
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),

    /// The translation table is not a flat JSON string map.
    #[error("invalid translation table: {0}")]
    Translation(#[from] serde_json::Error),

    /// The translation file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
