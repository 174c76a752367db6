//! Upload session state machine.
//!
//! A [`Session`] follows one upload at a time through
//!
//! ```text
//! Idle → FileSelected → Parsed → PageSelectionPending → Validating → Rendered
//!                              ↘───────────────────────↗
//! ```
//!
//! Every [`Session::select_file`] hands out an [`UploadTicket`] with a new
//! generation. Bytes arriving with an older ticket are discarded, so the
//! most recently selected file always wins.

use crate::error::{Error, Result};
use crate::model::{Document, PageChoice};
use crate::normalize::Normalizer;
use crate::parser::{ParseOptions, ReaderRegistry};
use crate::schema::Schema;
use crate::upload::Upload;
use crate::validate::{validate_page, ValidationOutcome};

/// Where a session is in the upload lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No upload in progress
    Idle,
    /// A file was chosen and its bytes are awaited
    FileSelected,
    /// The bytes were parsed into a document
    Parsed,
    /// The document has several pages and one must be chosen
    PageSelectionPending,
    /// A page is being validated
    Validating,
    /// An outcome is available
    Rendered,
}

/// Handle for one file selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    generation: u64,
    filename: String,
}

impl UploadTicket {
    /// Generation of the selection this ticket belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Declared filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }
}

/// What a session step produced.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The bytes belonged to an older selection and were discarded
    Superseded,
    /// The document has several pages; one of these must be selected
    SelectionRequired(Vec<String>),
    /// Validation finished
    Rendered(ValidationOutcome),
    /// Nothing to do
    Ignored,
}

/// Drives one upload at a time from file selection to diagnostics.
pub struct Session {
    schema: Schema,
    registry: ReaderRegistry,
    parse_options: ParseOptions,
    normalizer: Normalizer,
    state: SessionState,
    generation: u64,
    document: Option<Document>,
    outcome: Option<ValidationOutcome>,
}

impl Session {
    /// Create a session validating against a schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            registry: ReaderRegistry::with_defaults(),
            parse_options: ParseOptions::default(),
            normalizer: Normalizer::default(),
            state: SessionState::Idle,
            generation: 0,
            document: None,
            outcome: None,
        }
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set the row normalizer.
    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Set the reader registry.
    pub fn with_registry(mut self, registry: ReaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Latest outcome, if one is displayed.
    pub fn outcome(&self) -> Option<&ValidationOutcome> {
        self.outcome.as_ref()
    }

    /// Parsed document of the current upload.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Page names of the current upload.
    pub fn page_names(&self) -> Vec<String> {
        self.document
            .as_ref()
            .map(Document::page_names)
            .unwrap_or_default()
    }

    /// Discard the current upload and return to idle.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.document = None;
        self.outcome = None;
    }

    /// Start a new upload.
    ///
    /// Any earlier ticket is superseded, even when this call fails.
    pub fn select_file(&mut self, filename: &str) -> Result<UploadTicket> {
        self.reset();
        self.generation += 1;

        self.registry.reader_for(filename)?;
        self.state = SessionState::FileSelected;
        log::debug!("Selected '{}' (upload {})", filename, self.generation);

        Ok(UploadTicket {
            generation: self.generation,
            filename: filename.to_string(),
        })
    }

    /// Deliver the bytes for a ticket.
    pub fn receive_bytes(&mut self, ticket: &UploadTicket, bytes: &[u8]) -> Result<SessionEvent> {
        if ticket.generation != self.generation {
            log::warn!(
                "Discarding stale upload '{}' ({} < {})",
                ticket.filename,
                ticket.generation,
                self.generation
            );
            return Ok(SessionEvent::Superseded);
        }
        if self.state != SessionState::FileSelected {
            return Ok(SessionEvent::Ignored);
        }

        let document = match self
            .registry
            .read(&ticket.filename, bytes, &self.parse_options)
        {
            Ok(document) => document,
            Err(err) => {
                self.reset();
                return Err(err);
            }
        };
        self.state = SessionState::Parsed;

        let selected = match document.choose_page(None)? {
            PageChoice::Selected(page) => Ok(page.name.clone()),
            PageChoice::Pending(names) => Err(names),
        };
        self.document = Some(document);

        let event = match selected {
            Ok(name) => self.run(&name)?,
            Err(names) => {
                self.state = SessionState::PageSelectionPending;
                SessionEvent::SelectionRequired(names)
            }
        };
        Ok(event)
    }

    /// Deliver an [`Upload`] read from disk.
    pub fn receive(&mut self, ticket: &UploadTicket, upload: &Upload) -> Result<SessionEvent> {
        self.receive_bytes(ticket, &upload.bytes)
    }

    /// Choose the page to validate.
    ///
    /// An empty name is ignored. Choosing again clears the previous
    /// diagnostics before the new page is validated.
    pub fn select_page(&mut self, name: &str) -> Result<SessionEvent> {
        match self.state {
            SessionState::PageSelectionPending | SessionState::Rendered => {}
            state => {
                return Err(Error::Other(format!(
                    "cannot select a sheet while the session is {:?}",
                    state
                )))
            }
        }
        if name.is_empty() {
            return Ok(SessionEvent::Ignored);
        }
        if self.document.as_ref().and_then(|d| d.page(name)).is_none() {
            return Err(Error::SheetNotFound(name.to_string()));
        }

        self.outcome = None;
        self.run(name)
    }

    fn run(&mut self, name: &str) -> Result<SessionEvent> {
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| Error::Other("no document loaded".to_string()))?;
        let page = document
            .page(name)
            .ok_or_else(|| Error::SheetNotFound(name.to_string()))?;

        self.state = SessionState::Validating;
        log::debug!("Validating sheet '{}'", name);
        let outcome = match validate_page(
            &self.schema,
            &self.normalizer,
            page,
            self.parse_options.skip_blank_rows,
        ) {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.abort_validation(name, err)),
        };

        self.state = SessionState::Rendered;
        self.outcome = Some(outcome.clone());
        Ok(SessionEvent::Rendered(outcome))
    }

    // A multi-page document stays open for another selection.
    fn abort_validation(&mut self, name: &str, err: Error) -> Error {
        log::warn!("Validation of sheet '{}' failed: {}", name, err);
        let pending = self
            .document
            .as_ref()
            .is_some_and(Document::needs_selection);
        if pending {
            self.state = SessionState::PageSelectionPending;
        } else {
            self.reset();
        }
        err
    }
}
