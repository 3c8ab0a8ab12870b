//! Conversion pipeline
//!
//! Runs the three stages of a conversion on an in-memory buffer:
//!
//! 1. [`parse`](crate::mfm::parsing::parse) the bytes into a declaration table
//! 2. [`format_names`](crate::mfm::naming::format_names) to capitalize identifiers
//! 3. write the table with a named [`Formatter`](crate::mfm::formats::Formatter)
//!
//! Output is staged in a buffer and only handed to the sink once every stage
//! succeeded, so a failed conversion leaves the sink untouched.
//!
//! ```rust,ignore
//! use mfm_parser::Converter;
//!
//! let mut out = Vec::new();
//! Converter::default().convert(b"map Kind int\n0 foo\n", &mut out)?;
//! ```

use crate::mfm::error::MfmError;
use crate::mfm::formats::{FormatError, FormatRegistry, DEFAULT_REGISTRY};
use crate::mfm::naming::format_names;
use crate::mfm::parsing::parse;
use crate::mfm::table::DeclarationTable;
use std::io;
use thiserror::Error;
use tracing::debug;

/// Format used when none is requested
pub const DEFAULT_FORMAT: &str = "yaml";

/// Error from any stage of a conversion
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Mfm(#[from] MfmError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ConvertError {
    /// Render the error for people; parse errors include the source excerpt
    pub fn render(&self, source: &[u8]) -> String {
        match self {
            ConvertError::Mfm(err) => err.render(source),
            other => format!("Error: {}\n", other),
        }
    }
}

/// Parse, rename and emit with a chosen format
pub struct Converter<'r> {
    registry: &'r FormatRegistry,
    format: String,
}

impl Converter<'static> {
    /// Converter using the built-in formats
    pub fn new(format: impl Into<String>) -> Self {
        Self::with_registry(&DEFAULT_REGISTRY, format)
    }
}

impl<'r> Converter<'r> {
    pub fn with_registry(registry: &'r FormatRegistry, format: impl Into<String>) -> Self {
        Self {
            registry,
            format: format.into(),
        }
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse `input` and capitalize its names
    pub fn load(&self, input: &[u8]) -> Result<DeclarationTable, ConvertError> {
        let table = parse(input)?;
        Ok(format_names(table)?)
    }

    /// Convert `input` and write the result to `sink`
    pub fn convert<W: io::Write + ?Sized>(&self, input: &[u8], sink: &mut W) -> Result<(), ConvertError> {
        // Fail before parsing when the format does not exist
        if !self.registry.has(&self.format) {
            return Err(FormatError::FormatNotFound(self.format.clone()).into());
        }

        let table = self.load(input)?;
        let mut buffer = Vec::new();
        self.registry.write(&table, &self.format, &mut buffer)?;

        debug!(format = %self.format, bytes = buffer.len(), "converted declaration table");
        sink.write_all(&buffer)?;
        Ok(())
    }

    /// Convert `input` into a fresh byte buffer
    pub fn convert_to_vec(&self, input: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let mut out = Vec::new();
        self.convert(input, &mut out)?;
        Ok(out)
    }
}

impl Default for Converter<'static> {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

/// Convert `input` to the two-document YAML output
pub fn convert<W: io::Write + ?Sized>(input: &[u8], sink: &mut W) -> Result<(), ConvertError> {
    Converter::default().convert(input, sink)
}
