//! Reader registry dispatching uploads by filename suffix.

use super::{CsvReader, ParseOptions, XlsxReader};
use crate::error::{Error, Result};
use crate::model::Document;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Trait for tabular document readers.
///
/// Implement this trait to accept a new container format.
pub trait DocumentReader: Send + Sync {
    /// Get the supported file extensions for this reader.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["csv"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this reader.
    fn name(&self) -> &str;

    /// Read a document from bytes.
    fn read(&self, filename: &str, data: &[u8], options: &ParseOptions) -> Result<Document>;

    /// Check if this reader supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for document readers.
///
/// The registry maps file extensions to readers and rejects any
/// upload whose suffix has no reader.
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn DocumentReader>>,
    by_name: HashMap<String, Arc<dyn DocumentReader>>,
}

impl ReaderRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            readers: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Create a registry with the default readers (CSV, XLSX).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(CsvReader::new()));
        registry.register(Arc::new(XlsxReader::new()));
        registry
    }

    /// Register a reader for all its supported extensions.
    pub fn register(&mut self, reader: Arc<dyn DocumentReader>) {
        for ext in reader.supported_extensions() {
            self.readers.insert(ext.to_lowercase(), reader.clone());
        }
        self.by_name.insert(reader.name().to_lowercase(), reader);
    }

    /// Get a reader by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn DocumentReader>> {
        self.readers.get(&ext.to_lowercase()).cloned()
    }

    /// Get a reader by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn DocumentReader>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.readers.keys().map(|s| s.as_str()).collect();
        exts.sort_unstable();
        exts
    }

    /// Find the reader for a declared filename.
    pub fn reader_for(&self, filename: &str) -> Result<Arc<dyn DocumentReader>> {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|ext| self.get_by_extension(ext))
            .ok_or_else(|| Error::UnsupportedFormat(filename.to_string()))
    }

    /// Read bytes using the reader registered for the filename suffix.
    pub fn read(&self, filename: &str, data: &[u8], options: &ParseOptions) -> Result<Document> {
        let reader = self.reader_for(filename)?;
        log::debug!("Reading {} with the {} reader", filename, reader.name());
        reader.read(filename, data, options)
    }

    /// Read a file from disk.
    pub fn read_file(&self, path: &Path, options: &ParseOptions) -> Result<Document> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        // Reject by suffix before touching the file.
        let reader = self.reader_for(&filename)?;
        let data = std::fs::read(path)?;
        reader.read(&filename, &data, options)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
