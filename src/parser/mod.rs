//! Tabular document reading.

mod csv;
mod infer;
mod options;
mod registry;
mod xlsx;

pub use self::csv::{CsvReader, CSV_PAGE_NAME};
pub use infer::{parse_date, CellInference};
pub use options::{ParseOptions, DEFAULT_DATE_FORMATS};
pub use registry::{DocumentReader, ReaderRegistry};
pub use xlsx::{convert_cell, excel_serial_to_datetime, page_from_range, XlsxReader};
