//! Export options.

/// When the export includes the `column` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnMode {
    /// Include the column unless every record's column is blank
    #[default]
    Auto,
    /// Always include the column
    Always,
    /// Never include the column
    Never,
}

/// Options for the diagnostics CSV export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Column field handling
    pub column_mode: ColumnMode,

    /// Write the header row
    pub include_header: bool,
}

impl ExportOptions {
    /// Create export options with defaults.
    pub fn new() -> Self {
        Self {
            column_mode: ColumnMode::Auto,
            include_header: true,
        }
    }

    /// Set the column mode.
    pub fn with_column_mode(mut self, mode: ColumnMode) -> Self {
        self.column_mode = mode;
        self
    }

    /// Enable or disable the header row.
    pub fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_options_builder() {
        let options = ExportOptions::new().with_column_mode(ColumnMode::Never);
        assert_eq!(options.column_mode, ColumnMode::Never);
        assert!(options.include_header);

        let options = ExportOptions::new().with_header(false);
        assert!(!options.include_header);
    }
}
