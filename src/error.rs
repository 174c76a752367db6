//! Error types for sheetcheck library.

use std::io;
use thiserror::Error;

/// Result type alias for sheetcheck operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading, validating, or exporting a sheet.
///
/// Schema violations are not errors: they are collected as
/// [`DiagnosticRecord`](crate::validate::DiagnosticRecord)s.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The filename suffix is not one of the accepted formats.
    #[error("Unsupported file format: {0} (expected an .xlsx or .csv file)")]
    UnsupportedFormat(String),

    /// The bytes could not be parsed as a tabular document, or it has no pages.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A page selection named a page that does not exist.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The document has several pages and none was selected.
    #[error("Document has {} sheets, select one of: {}", .0.len(), .0.join(", "))]
    SheetSelectionRequired(Vec<String>),

    /// The schema could not be loaded or compiled.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Error writing the diagnostics export.
    #[error("Export error: {0}")]
    Export(String),

    /// Error during rendering (JSON, text).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<calamine::XlsxError> for Error {
    fn from(err: calamine::XlsxError) -> Self {
        match err {
            calamine::XlsxError::Io(e) => Error::Io(e),
            _ => Error::MalformedDocument(err.to_string()),
        }
    }
}
