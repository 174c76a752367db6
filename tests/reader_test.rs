//! Integration tests for the reader registry.

use std::sync::Arc;
use sheetcheck::error::Result;
use sheetcheck::parser::{CsvReader, XlsxReader, CSV_PAGE_NAME};
use sheetcheck::{Cell, Document, DocumentReader, InputFormat, Page, ParseOptions, ReaderRegistry};

/// Mock reader returning one page per name.
struct MockReader {
    extensions: Vec<&'static str>,
    name: &'static str,
    pages: Vec<&'static str>,
}

impl MockReader {
    fn new(extensions: Vec<&'static str>, name: &'static str, pages: Vec<&'static str>) -> Self {
        Self {
            extensions,
            name,
            pages,
        }
    }
}

impl DocumentReader for MockReader {
    fn supported_extensions(&self) -> &[&str] {
        &self.extensions
    }

    fn name(&self) -> &str {
        self.name
    }

    fn read(&self, filename: &str, _data: &[u8], _options: &ParseOptions) -> Result<Document> {
        let pages = self
            .pages
            .iter()
            .map(|name| Page::with_grid(*name, vec![vec![Cell::string("zipcode")]]))
            .collect();
        Document::new(filename, InputFormat::Xlsx, pages)
    }
}

#[test]
fn test_parse_options_builder() {
    let options = ParseOptions::new()
        .with_delimiter(b';')
        .with_skip_blank_rows(false)
        .with_date_formats(["%d.%m.%Y"]);

    assert_eq!(options.delimiter, b';');
    assert!(!options.skip_blank_rows);
    assert_eq!(options.date_formats, vec!["%d.%m.%Y".to_string()]);
    assert!(options.infer_types);
    assert!(!ParseOptions::new().text_only().infer_types);
}

#[test]
fn test_reader_registry_new() {
    let registry = ReaderRegistry::new();

    // Empty registry should support nothing
    assert!(!registry.supports("csv"));
    assert!(!registry.supports("xlsx"));
}

#[test]
fn test_reader_registry_register() {
    let mut registry = ReaderRegistry::new();
    registry.register(Arc::new(MockReader::new(vec!["ods", "fods"], "opendocument", vec!["A"])));

    assert!(registry.supports("ods"));
    assert!(registry.supports("fods"));
    assert!(registry.supports("ODS")); // Case insensitive

    let doc = registry
        .read("book.ods", b"", &ParseOptions::default())
        .unwrap();
    assert_eq!(doc.page_names(), vec!["A"]);
}

#[test]
fn test_reader_registry_multiple_readers() {
    let mut registry = ReaderRegistry::new();

    registry.register(Arc::new(CsvReader::new()));
    registry.register(Arc::new(XlsxReader::new()));
    registry.register(Arc::new(MockReader::new(vec!["tsv"], "tabs", vec!["Sheet1"])));

    assert!(registry.supports("csv"));
    assert!(registry.supports("xlsx"));
    assert!(registry.supports("tsv"));
    assert_eq!(registry.supported_extensions(), vec!["csv", "tsv", "xlsx"]);

    let reader = registry.get_by_name("tabs");
    assert!(reader.is_some());
    assert!(reader.unwrap().supports_extension("TSV"));
}

#[test]
fn test_reader_for_is_by_suffix() {
    let registry = ReaderRegistry::with_defaults();

    assert_eq!(registry.reader_for("Samples.CSV").unwrap().name(), "csv");
    assert_eq!(registry.reader_for("book.xlsx").unwrap().name(), "xlsx");
    assert!(registry.reader_for("book.xls").is_err());
    assert!(registry.reader_for("csv").is_err());
}

#[test]
fn test_csv_reader_reads_one_page() {
    let registry = ReaderRegistry::with_defaults();
    let doc = registry
        .read(
            "samples.csv",
            b"\xEF\xBB\xBFzipcode,flag,date\n02139,TRUE,2024-03-05\n",
            &ParseOptions::default(),
        )
        .unwrap();

    assert_eq!(doc.format, InputFormat::Csv);
    assert_eq!(doc.page_names(), vec![CSV_PAGE_NAME]);

    let page = &doc.pages[0];
    assert_eq!(page.headers(), vec!["zipcode", "flag", "date"]);
    assert_eq!(page.cell_at("A2").map(Cell::display_text), Some("02139".to_string()));
    assert_eq!(page.cell_at("B2"), Some(&Cell::Bool(true)));
    assert!(matches!(page.cell_at("C2"), Some(Cell::Date { .. })));
}

#[test]
fn test_csv_delimiter_option() {
    let registry = ReaderRegistry::with_defaults();
    let options = ParseOptions::new().with_delimiter(b';');
    let doc = registry
        .read("samples.csv", b"a;b\n1;2\n", &options)
        .unwrap();
    assert_eq!(doc.pages[0].headers(), vec!["a", "b"]);
}

#[test]
fn test_read_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("samples.csv");
    std::fs::write(&path, "zipcode\n60601\n").unwrap();

    let doc = sheetcheck::read_document(&path).unwrap();
    assert_eq!(doc.filename, "samples.csv");
    assert_eq!(doc.pages[0].row_count(), 2);
}
