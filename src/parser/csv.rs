//! CSV document reader.

use super::infer::CellInference;
use super::{DocumentReader, ParseOptions};
use crate::detect::InputFormat;
use crate::error::{Error, Result};
use crate::model::{Cell, Document, Page};

/// Name given to the single page of a CSV upload.
pub const CSV_PAGE_NAME: &str = "Sheet1";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV reader.
///
/// A CSV file always yields exactly one page.
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    _private: (),
}

impl CsvReader {
    /// Create a new CSV reader.
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Read CSV bytes into a page grid.
    pub fn read_page(&self, data: &[u8], options: &ParseOptions) -> Result<Page> {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let inference = CellInference::new(&options.date_formats);

        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            // Row 0 is the header; it is kept in the grid like any other row.
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut page = Page::new(CSV_PAGE_NAME);
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                Error::MalformedDocument(format!("CSV parse error at line {}: {}", line + 1, e))
            })?;

            let cells = record
                .iter()
                .map(|field| {
                    if options.infer_types && line > 0 {
                        inference.infer(field)
                    } else if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::string(field)
                    }
                })
                .collect();
            page.push_row(cells);
        }

        log::debug!(
            "Read CSV page with {} rows and {} columns",
            page.row_count(),
            page.column_count()
        );

        Ok(page)
    }
}

impl DocumentReader for CsvReader {
    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn name(&self) -> &str {
        "csv"
    }

    fn read(&self, filename: &str, data: &[u8], options: &ParseOptions) -> Result<Document> {
        let page = self.read_page(data, options)?;
        Document::new(filename, InputFormat::Csv, vec![page])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_reader_extensions() {
        let reader = CsvReader::new();
        assert_eq!(reader.supported_extensions(), &["csv"]);
        assert!(reader.supports_extension("CSV"));
        assert!(!reader.supports_extension("xlsx"));
        assert_eq!(reader.name(), "csv");
    }

    #[test]
    fn test_read_single_page() {
        let data = b"zipcode,num_no_target_control\n2139,3\n";
        let doc = CsvReader::new()
            .read("upload.csv", data, &ParseOptions::default())
            .unwrap();

        assert_eq!(doc.page_names(), vec!["Sheet1"]);
        let page = &doc.pages[0];
        assert_eq!(page.cell_at("A1"), Some(&Cell::string("zipcode")));
        assert_eq!(page.cell_at("A2"), Some(&Cell::number_with_text(2139.0, "2139")));
        assert_eq!(page.cell_at("B2"), Some(&Cell::number_with_text(3.0, "3")));
    }

    #[test]
    fn test_header_is_never_inferred() {
        let data = b"2021,TRUE\nx,y\n";
        let page = CsvReader::new()
            .read_page(data, &ParseOptions::default())
            .unwrap();
        assert_eq!(page.headers(), vec!["2021", "TRUE"]);
    }

    #[test]
    fn test_bom_and_ragged_rows() {
        let data = b"\xEF\xBB\xBFa,b\n1\n1,2,3\n";
        let page = CsvReader::new()
            .read_page(data, &ParseOptions::default())
            .unwrap();
        assert_eq!(page.cell_at("A1"), Some(&Cell::string("a")));
        assert_eq!(page.row_count(), 3);
        assert_eq!(page.column_count(), 3);
    }

    #[test]
    fn test_text_only() {
        let data = b"zipcode\n02139\n";
        let page = CsvReader::new()
            .read_page(data, &ParseOptions::new().text_only())
            .unwrap();
        assert_eq!(page.cell_at("A2"), Some(&Cell::string("02139")));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let data = b"a;b\n1;2\n";
        let page = CsvReader::new()
            .read_page(data, &ParseOptions::new().with_delimiter(b';'))
            .unwrap();
        assert_eq!(page.headers(), vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let data = b"a,b\n\xFF\xFE,1\n";
        let result = CsvReader::new().read_page(data, &ParseOptions::default());
        assert!(matches!(result, Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_empty_csv_has_one_empty_page() {
        let doc = CsvReader::new()
            .read("empty.csv", b"", &ParseOptions::default())
            .unwrap();
        assert_eq!(doc.page_count(), 1);
        assert!(doc.pages[0].rows(true).is_empty());
    }
}
