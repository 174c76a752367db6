//! Parsing options and configuration.

/// Date layouts recognized in text cells by default.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d-%b-%Y",
];

/// Options for reading tabular documents.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// CSV field delimiter
    pub delimiter: u8,

    /// Whether to infer numbers, booleans and dates from CSV text
    pub infer_types: bool,

    /// `chrono` layouts tried when inferring dates from text
    pub date_formats: Vec<String>,

    /// Whether rows with no values are dropped
    pub skip_blank_rows: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSV delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enable or disable type inference for CSV text.
    pub fn with_type_inference(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }

    /// Keep every field as text.
    pub fn text_only(mut self) -> Self {
        self.infer_types = false;
        self
    }

    /// Replace the recognized date layouts.
    pub fn with_date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Keep or drop rows with no values.
    pub fn with_skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: true,
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            skip_blank_rows: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.delimiter, b',');
        assert!(options.infer_types);
        assert!(options.skip_blank_rows);
        assert_eq!(options.date_formats.len(), DEFAULT_DATE_FORMATS.len());
    }

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .with_delimiter(b';')
            .text_only()
            .with_date_formats(["%d.%m.%Y"])
            .with_skip_blank_rows(false);

        assert_eq!(options.delimiter, b';');
        assert!(!options.infer_types);
        assert_eq!(options.date_formats, vec!["%d.%m.%Y".to_string()]);
        assert!(!options.skip_blank_rows);
    }
}
