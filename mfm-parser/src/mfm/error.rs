//! Error types for parsing and renaming declarations

use crate::mfm::range::SourceLocation;
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

/// The two kinds of keyed declarations in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Enumeration,
    Function,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Enumeration => write!(f, "enumeration"),
            DeclarationKind::Function => write!(f, "function"),
        }
    }
}

/// Errors that abort the conversion of a single MFM input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MfmError {
    #[error("Unexpected character '{character}' at offset {offset}")]
    UnexpectedCharacter { character: char, offset: usize },

    #[error("Unexpected end of input at offset {offset}, expected {expected}")]
    UnexpectedEndOfInput {
        expected: &'static str,
        offset: usize,
    },

    #[error("Invalid integer '{token}' at offset {offset}: {source}")]
    NumberFormat {
        token: String,
        offset: usize,
        #[source]
        source: ParseIntError,
    },

    #[error("Duplicate {kind} '{key}'")]
    DuplicateKey { kind: DeclarationKind, key: String },

    /// The parser reached a value or parameter with no declaration to attach it
    /// to. This is a parser bug, not bad input.
    #[error("Parser invariant violated: {0}")]
    InvariantViolation(&'static str),

    #[error("Input is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

pub type Result<T> = std::result::Result<T, MfmError>;

impl MfmError {
    /// Byte offset into the input the error points at, if it has one
    pub fn offset(&self) -> Option<usize> {
        match self {
            MfmError::UnexpectedCharacter { offset, .. }
            | MfmError::UnexpectedEndOfInput { offset, .. }
            | MfmError::NumberFormat { offset, .. }
            | MfmError::InvalidUtf8 { offset } => Some(*offset),
            MfmError::DuplicateKey { .. } | MfmError::InvariantViolation(_) => None,
        }
    }

    /// Render the error for people, with line:column and the surrounding source
    /// when the error carries an offset.
    pub fn render(&self, source: &[u8]) -> String {
        let Some(offset) = self.offset() else {
            return format!("Error: {}\n", self);
        };

        let position = SourceLocation::new(source).byte_to_position(offset);
        let mut rendered = format!("Error at {}: {}\n\n", position, self);
        rendered.push_str(&format_source_context(source, position.line));
        rendered
    }
}

/// Format source code context around an error line
///
/// Shows 2 lines before the error, the error line with >> marker, and 2 lines after.
/// All lines are numbered for easy reference.
pub fn format_source_context(source: &[u8], error_line: usize) -> String {
    let text = String::from_utf8_lossy(source);
    let lines: Vec<&str> = text.lines().collect();

    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 3).min(lines.len());

    let mut context = String::new();
    for (line_num, line) in lines.iter().enumerate().take(end_line).skip(start_line) {
        let marker = if line_num == error_line { ">>" } else { "  " };
        context.push_str(&format!("{} {:3} | {}\n", marker, line_num + 1, line));
    }

    context
}
