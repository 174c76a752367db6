//! # sheetcheck
//!
//! Spreadsheet validation against a declarative JSON-Schema.
//!
//! This library reads one sheet of an `.xlsx` or `.csv` upload, normalizes
//! its cells into schema-comparable values, validates every row and turns
//! the validator's errors into (line, column, message) diagnostics.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sheetcheck::{render, SheetCheck};
//!
//! fn main() -> sheetcheck::Result<()> {
//!     let outcome = SheetCheck::new()?.check_file("samples.xlsx")?;
//!
//!     println!("{}", render::to_text(&outcome));
//!     if !outcome.valid {
//!         let csv = render::to_csv(&outcome.diagnostics, &render::ExportOptions::default())?;
//!         std::fs::write(render::export_filename("samples.xlsx"), csv)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: [`parser`] turns bytes into a [`Document`] of named pages
//! - **Normalization**: [`normalize`] coerces dates, times and text fields
//! - **Validation**: [`schema`] canonicalizes enum case and numeric strings,
//!   then [`validate`] collects every violation
//! - **Presentation**: [`render`] writes text, JSON and the CSV export

pub mod detect;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod render;
pub mod schema;
pub mod session;
pub mod upload;
pub mod validate;

// Re-export commonly used types
pub use detect::{detect_format_from_name, detect_format_from_path, InputFormat};
pub use error::{Error, Result};
pub use model::{Cell, Document, NormalizedRow, Page, PageChoice, RawRow};
pub use normalize::{Coercion, NormalizationTable, Normalizer};
pub use parser::{DocumentReader, ParseOptions, ReaderRegistry};
pub use render::{ColumnMode, ExportOptions, JsonFormat};
pub use schema::Schema;
pub use session::{Session, SessionEvent, SessionState, UploadTicket};
pub use upload::Upload;
pub use validate::{DiagnosticRecord, ValidationIssue, ValidationOutcome};

use std::path::Path;

/// Parse a file into a document.
///
/// # Example
///
/// ```no_run
/// use sheetcheck::read_document;
///
/// let doc = read_document("samples.xlsx").unwrap();
/// println!("Sheets: {:?}", doc.page_names());
/// ```
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    ReaderRegistry::with_defaults().read_file(path.as_ref(), &ParseOptions::default())
}

/// Parse bytes into a document, dispatching on the filename suffix.
pub fn read_bytes(filename: &str, data: &[u8]) -> Result<Document> {
    ReaderRegistry::with_defaults().read(filename, data, &ParseOptions::default())
}

/// Validate a file against the bundled schema.
///
/// Fails with [`Error::SheetSelectionRequired`] when the file has more
/// than one sheet; use [`SheetCheck::with_sheet`] to pick one.
pub fn check_file<P: AsRef<Path>>(path: P) -> Result<ValidationOutcome> {
    SheetCheck::new()?.check_file(path)
}

/// Validate bytes against the bundled schema.
pub fn check_bytes(filename: &str, data: &[u8]) -> Result<ValidationOutcome> {
    SheetCheck::new()?.check_bytes(filename, data)
}

/// Builder for running the whole pipeline.
///
/// # Example
///
/// ```no_run
/// use sheetcheck::{ParseOptions, Schema, SheetCheck};
///
/// let outcome = SheetCheck::with_schema(Schema::from_path("rows.schema.json")?)
///     .with_parse_options(ParseOptions::new().with_delimiter(b';'))
///     .with_sheet("Samples")
///     .check_file("samples.csv")?;
/// # Ok::<(), sheetcheck::Error>(())
/// ```
pub struct SheetCheck {
    schema: Schema,
    parse_options: ParseOptions,
    normalizer: Normalizer,
    registry: ReaderRegistry,
    sheet: Option<String>,
}

impl SheetCheck {
    /// Create a builder using the bundled schema.
    pub fn new() -> Result<Self> {
        Ok(Self::with_schema(Schema::bundled()?))
    }

    /// Create a builder for a schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema,
            parse_options: ParseOptions::default(),
            normalizer: Normalizer::default(),
            registry: ReaderRegistry::with_defaults(),
            sheet: None,
        }
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the normalization table.
    pub fn with_table(mut self, table: NormalizationTable) -> Self {
        self.normalizer = Normalizer::new(table);
        self
    }

    /// Set the reader registry.
    pub fn with_registry(mut self, registry: ReaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Select the sheet to validate.
    pub fn with_sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = Some(name.into());
        self
    }

    /// Get the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Parse a file without validating it.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        self.registry.read_file(path.as_ref(), &self.parse_options)
    }

    /// Validate a file.
    pub fn check_file<P: AsRef<Path>>(&self, path: P) -> Result<ValidationOutcome> {
        let document = self.read_file(path)?;
        self.check_document(&document)
    }

    /// Validate an uploaded buffer.
    pub fn check_bytes(&self, filename: &str, data: &[u8]) -> Result<ValidationOutcome> {
        let document = self.registry.read(filename, data, &self.parse_options)?;
        self.check_document(&document)
    }

    /// Validate the selected page of a parsed document.
    pub fn check_document(&self, document: &Document) -> Result<ValidationOutcome> {
        match document.choose_page(self.sheet.as_deref())? {
            PageChoice::Selected(page) => validate::validate_page(
                &self.schema,
                &self.normalizer,
                page,
                self.parse_options.skip_blank_rows,
            ),
            PageChoice::Pending(names) => Err(Error::SheetSelectionRequired(names)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn zipcode_check() -> SheetCheck {
        SheetCheck::with_schema(
            Schema::from_value(json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "zipcode": { "type": "string", "pattern": "^[0-9]{5}$" },
                        "num_no_target_control": { "type": "string" }
                    }
                }
            }))
            .unwrap(),
        )
    }

    #[test]
    fn test_check_bytes_reports_zipcode() {
        let outcome = zipcode_check()
            .check_bytes("samples.csv", b"zipcode,num_no_target_control\n2139,3\n")
            .unwrap();

        assert!(!outcome.valid);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].line_number, 2);
        assert_eq!(outcome.diagnostics[0].column, "zipcode");
    }

    #[test]
    fn test_check_bytes_unsupported() {
        let result = zipcode_check().check_bytes("samples.txt", b"zipcode\n02139\n");
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_unknown_sheet() {
        let result = zipcode_check()
            .with_sheet("Missing")
            .check_bytes("samples.csv", b"zipcode\n02139\n");
        assert!(matches!(result, Err(Error::SheetNotFound(_))));
    }

    #[test]
    fn test_multi_page_requires_selection() {
        let document = Document::new(
            "book.xlsx",
            InputFormat::Xlsx,
            vec![Page::new("A"), Page::new("B")],
        )
        .unwrap();

        let result = zipcode_check().check_document(&document);
        assert!(matches!(result, Err(Error::SheetSelectionRequired(ref names)) if names.len() == 2));

        let outcome = zipcode_check().with_sheet("B").check_document(&document).unwrap();
        assert_eq!(outcome.page, "B");
        assert!(outcome.valid);
    }

    #[test]
    fn test_read_bytes_csv() {
        let doc = read_bytes("samples.csv", b"a,b\n1,2\n").unwrap();
        assert_eq!(doc.page_names(), vec!["Sheet1"]);
    }
}
