//! Document model types for tabular uploads.
//!
//! A [`Document`] holds named [`Page`]s; a page yields [`RawRow`]s keyed by
//! its header row, and the normalizer turns those into [`NormalizedRow`]s.

mod cell;
mod document;
mod page;
mod row;

pub use cell::{format_number, Cell};
pub use document::{Document, PageChoice};
pub use page::{column_letter, parse_address, Page};
pub use row::{rows_to_instance, NormalizedRow, RawRow};
