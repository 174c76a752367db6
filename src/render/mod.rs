//! Rendering of validation outcomes: CSV export, JSON and plain text.

mod export;
mod json;
mod options;
mod text;

pub use export::{export_filename, include_column, to_csv, write_csv, EXPORT_HEADER};
pub use json::{to_json, JsonFormat};
pub use options::{ColumnMode, ExportOptions};
pub use text::{diagnostics_table, status_line, to_text, INVALID_MESSAGE, VALID_MESSAGE};
