//! Conversion session
//!
//! One [`Session`] holds everything a front-end shows: the input text, the
//! parsed tree, the working frame, the component name and the error console.
//! Front-ends drive it only through the handler methods below.

use std::error::Error as StdError;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::ast::ParsedDocument;
use crate::errors::{ConvertError, SVG_MIME_TYPE, SourceContext};
use crate::log::{debug, warn};
use crate::parse::parse_named;
use crate::render::{GeneratorOptions, PreviewIcon, generate_component_with, render_preview};
use crate::viewbox::{ViewBoxField, ViewBoxValues};

/// Name used until the user picks one, and after a clear
pub const DEFAULT_COMPONENT_NAME: &str = "CustomIcon";

const INPUT_SOURCE_NAME: &str = "<input>";

static NAME_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing parsed and no error
    Empty,
    /// A tree is loaded
    Parsed,
    /// The last operation failed and no tree is loaded
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Empty => "empty",
            SessionState::Parsed => "parsed",
            SessionState::Error => "error",
        })
    }
}

/// A file picked by the user, already read
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type as declared by the picker
    pub mime_type: String,
    pub contents: Vec<u8>,
}

/// Text sink for the copy action
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn StdError + Send + Sync>>;
}

/// Clipboard that keeps the last copied text in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), Box<dyn StdError + Send + Sync>> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// The error-reporting surface
#[derive(Debug, Default)]
pub struct ErrorConsole {
    error: Option<ConvertError>,
    open: bool,
}

impl ErrorConsole {
    /// Record an error and open the console.
    pub fn report(&mut self, error: ConvertError) -> &ConvertError {
        warn!(error = %error, "session error");
        self.open = true;
        self.error.insert(error)
    }

    pub fn error(&self) -> Option<&ConvertError> {
        self.error.as_ref()
    }

    pub fn message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// True while an error message is waiting to be read.
    pub fn has_unacknowledged(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Drop the current message. The open flag is left as is.
    pub fn dismiss(&mut self) {
        self.error = None;
    }
}

/// State of one conversion session
#[derive(Debug)]
pub struct Session {
    input: String,
    source_name: String,
    component_name: String,
    parsed: Option<ParsedDocument>,
    view_box: Option<ViewBoxValues>,
    console: ErrorConsole,
    copied: bool,
    options: GeneratorOptions,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_options(GeneratorOptions::default())
    }

    pub fn with_options(options: GeneratorOptions) -> Self {
        Self {
            input: String::new(),
            source_name: INPUT_SOURCE_NAME.to_string(),
            component_name: DEFAULT_COMPONENT_NAME.to_string(),
            parsed: None,
            view_box: None,
            console: ErrorConsole::default(),
            copied: false,
            options,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.parsed.is_some() {
            SessionState::Parsed
        } else if self.console.has_unacknowledged() {
            SessionState::Error
        } else {
            SessionState::Empty
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text. Nothing is parsed until [`Session::parse`].
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        self.source_name = INPUT_SOURCE_NAME.to_string();
    }

    /// Parse the current input. The error and the previous tree are cleared
    /// first, so a failure leaves no tree behind.
    pub fn parse(&mut self) -> Result<&ParsedDocument, &ConvertError> {
        self.console.dismiss();
        self.parsed = None;
        self.view_box = None;

        let ctx = SourceContext::new(self.source_name.clone(), self.input.clone());
        match parse_named(&ctx) {
            Ok(doc) => {
                let view_box = ViewBoxValues::from_frame(&doc.original_view_box);
                debug!(view_box = %view_box, "session parsed");
                self.view_box = Some(view_box);
                Ok(self.parsed.insert(doc))
            }
            Err(err) => Err(self.console.report(err)),
        }
    }

    /// Load a picked file: only SVG files are accepted, their text replaces
    /// the input and is parsed.
    pub fn select_file(&mut self, file: SelectedFile) -> Result<&ParsedDocument, &ConvertError> {
        if file.mime_type != SVG_MIME_TYPE {
            return Err(self.console.report(ConvertError::UnsupportedFileType {
                mime_type: file.mime_type,
            }));
        }
        debug!(name = %file.name, bytes = file.contents.len(), "file selected");
        self.input = String::from_utf8_lossy(&file.contents).into_owned();
        self.source_name = file.name;
        self.parse()
    }

    pub fn parsed(&self) -> Option<&ParsedDocument> {
        self.parsed.as_ref()
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Set the component name, keeping only `[A-Za-z0-9_]`.
    pub fn set_component_name(&mut self, name: &str) -> &str {
        let cleaned = NAME_FORBIDDEN.replace_all(name, "");
        self.component_name = if cleaned.is_empty() {
            DEFAULT_COMPONENT_NAME.to_string()
        } else {
            cleaned.into_owned()
        };
        &self.component_name
    }

    /// The working frame, present while a tree is loaded.
    pub fn view_box(&self) -> Option<ViewBoxValues> {
        self.view_box
    }

    /// Apply raw text typed into one frame field. Ignored unless parsed.
    pub fn edit_viewbox(&mut self, field: ViewBoxField, raw: &str) -> Option<ViewBoxValues> {
        let view_box = self.view_box.as_mut()?;
        view_box.edit(field, raw);
        debug!(field = %field, raw, value = view_box.get(field), "viewBox edited");
        Some(*view_box)
    }

    /// Restore the working frame from the resolved frame string.
    pub fn reset_viewbox(&mut self) -> Option<ViewBoxValues> {
        let doc = self.parsed.as_ref()?;
        let view_box = ViewBoxValues::from_frame(&doc.original_view_box);
        self.view_box = Some(view_box);
        Some(view_box)
    }

    /// Back to the initial state. The console's open flag is kept.
    pub fn clear(&mut self) {
        self.input.clear();
        self.source_name = INPUT_SOURCE_NAME.to_string();
        self.parsed = None;
        self.view_box = None;
        self.console.dismiss();
        self.component_name = DEFAULT_COMPONENT_NAME.to_string();
        self.copied = false;
    }

    /// Source of the component for the current tree, name and frame.
    pub fn generated_code(&self) -> Option<String> {
        let doc = self.parsed.as_ref()?;
        let view_box = self.view_box.as_ref()?;
        Some(generate_component_with(
            &doc.elements,
            &self.component_name,
            view_box,
            &self.options,
        ))
    }

    /// Live preview of the current tree and frame.
    pub fn preview(&self) -> Option<PreviewIcon<'_>> {
        let doc = self.parsed.as_ref()?;
        let view_box = self.view_box.as_ref()?;
        Some(render_preview(&doc.elements, view_box))
    }

    /// Copy the generated code. `Ok(false)` when there is nothing to copy.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C) -> Result<bool, &ConvertError> {
        let Some(code) = self.generated_code() else {
            return Ok(false);
        };
        match clipboard.write_text(&code) {
            Ok(()) => {
                self.copied = true;
                Ok(true)
            }
            Err(e) => Err(self.console.report(ConvertError::ClipboardWriteFailure {
                message: e.to_string(),
            })),
        }
    }

    /// True after a successful copy, until the front-end acknowledges it.
    pub fn copied(&self) -> bool {
        self.copied
    }

    pub fn acknowledge_copy(&mut self) {
        self.copied = false;
    }

    pub fn console(&self) -> &ErrorConsole {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut ErrorConsole {
        &mut self.console
    }
}
