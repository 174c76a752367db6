//! Document-level types.

use super::Page;
use crate::detect::InputFormat;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A parsed upload: an ordered list of named pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Declared filename of the upload
    pub filename: String,

    /// Container format the pages were read from
    pub format: InputFormat,

    /// Pages in workbook order
    pub pages: Vec<Page>,
}

/// Outcome of choosing which page to validate.
#[derive(Debug, Clone, PartialEq)]
pub enum PageChoice<'a> {
    /// A page is ready for validation.
    Selected(&'a Page),

    /// Several pages exist and the user has to pick one.
    Pending(Vec<String>),
}

impl Document {
    /// Create a document.
    ///
    /// Fails with [`Error::MalformedDocument`] when there are no pages.
    pub fn new(filename: impl Into<String>, format: InputFormat, pages: Vec<Page>) -> Result<Self> {
        let filename = filename.into();
        if pages.is_empty() {
            return Err(Error::MalformedDocument(format!(
                "{} contains no sheets",
                filename
            )));
        }
        Ok(Self {
            filename,
            format,
            pages,
        })
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page names in order.
    pub fn page_names(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.name.clone()).collect()
    }

    /// Get a page by name.
    pub fn page(&self, name: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.name == name)
    }

    /// Check whether the user must pick a page.
    pub fn needs_selection(&self) -> bool {
        self.pages.len() > 1
    }

    /// Resolve the page to validate.
    ///
    /// A single-page document is selected automatically. With several
    /// pages, `None` or an empty name leaves the choice pending; an
    /// unknown name fails with [`Error::SheetNotFound`].
    pub fn choose_page(&self, selection: Option<&str>) -> Result<PageChoice<'_>> {
        match selection.filter(|s| !s.is_empty()) {
            Some(name) => self
                .page(name)
                .map(PageChoice::Selected)
                .ok_or_else(|| Error::SheetNotFound(name.to_string())),
            None if self.pages.len() == 1 => Ok(PageChoice::Selected(&self.pages[0])),
            None => Ok(PageChoice::Pending(self.page_names())),
        }
    }
}
