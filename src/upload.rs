//! Reading uploaded files.
//!
//! The filename is checked before any bytes are read, so an unsupported
//! file never touches the disk. With the `async` feature the read goes
//! through `tokio::fs`.

use crate::detect::{detect_format_from_name, InputFormat};
use crate::error::Result;
use std::path::Path;

/// A file's declared name and contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Declared filename (final path component)
    pub filename: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Create an upload from a name and bytes.
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a file from disk.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = declared_name(path);
        detect_format_from_name(&filename)?;

        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self { filename, bytes })
    }

    /// Read a file from disk asynchronously.
    #[cfg(feature = "async")]
    pub async fn read_async<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let filename = declared_name(path);
        detect_format_from_name(&filename)?;

        let bytes = tokio::fs::read(path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self { filename, bytes })
    }

    /// Format implied by the filename.
    pub fn format(&self) -> Result<InputFormat> {
        detect_format_from_name(&self.filename)
    }

    /// Size of the contents in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the upload has no contents.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn declared_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
