//! Byte-level lexing
//!
//!     MFM is lexed directly over the input bytes. There is no separate token
//!     stream: the parser asks the [`Cursor`] for the next token when its state
//!     needs one, because what a byte means depends on the state the parser is in
//!     (an `m` starts a `map` at the top of a declaration but is an ordinary
//!     letter inside a name).
//!
//! Character classes
//!
//!     Whitespace: space, tab, CR, LF.
//!     Token: a maximal run of bytes that are not whitespace, `#`, `,` or `]`.
//!     Special: `m`, `[` and `#` in the position where a new value could start.
//!     They close the current declaration (or open a comment).
//!
//!     All delimiters are ASCII, so token boundaries always fall on UTF-8
//!     character boundaries of a validated input.

use crate::mfm::error::{MfmError, Result};

pub const SPACE: u8 = b' ';
pub const TAB: u8 = b'\t';
pub const CR: u8 = b'\r';
pub const LF: u8 = b'\n';
pub const HASH: u8 = b'#';
pub const COMMA: u8 = b',';
pub const OPEN_BRACKET: u8 = b'[';
pub const CLOSE_BRACKET: u8 = b']';
pub const OPEN_MAP: u8 = b'm';

/// Keyword that opens an enumeration declaration
pub const MAP_KEYWORD: &[u8] = b"map";

pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, SPACE | TAB | CR | LF)
}

/// Bytes that end a token
pub fn is_delimiter(byte: u8) -> bool {
    is_whitespace(byte) || matches!(byte, HASH | COMMA | CLOSE_BRACKET)
}

/// Bytes that end a value/parameter list when seen where a value could start
pub fn is_special(byte: u8) -> bool {
    matches!(byte, OPEN_MAP | OPEN_BRACKET | HASH)
}

/// A token and the byte offset it starts at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Parse the token as an integer, reporting the token on failure
    pub fn parse_int<T>(&self) -> Result<T>
    where
        T: std::str::FromStr<Err = std::num::ParseIntError>,
    {
        self.text.parse().map_err(|source| MfmError::NumberFormat {
            token: self.text.to_string(),
            offset: self.offset,
            source,
        })
    }
}

/// Read position over a validated UTF-8 source
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Validate `input` as UTF-8 and start at offset 0
    pub fn new(input: &'a [u8]) -> Result<Self> {
        let source = std::str::from_utf8(input).map_err(|err| MfmError::InvalidUtf8 {
            offset: err.valid_up_to(),
        })?;
        Ok(Self {
            source,
            position: 0,
        })
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.position).copied()
    }

    /// The full character at the cursor, for error reporting
    pub fn current_char(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// Skip to the next LF, leaving it for the whitespace skipper
    pub fn skip_comment(&mut self) {
        let rest = &self.bytes()[self.position..];
        self.position += rest.iter().position(|&byte| byte == LF).unwrap_or(rest.len());
    }

    /// Read the maximal token at the cursor.
    ///
    /// An empty token is only allowed at the end of input or right before a
    /// comment. Sitting on a `,` or `]` instead is an error, which guarantees the
    /// parser always makes progress.
    pub fn read_token(&mut self) -> Result<Token<'a>> {
        let start = self.position;
        while self.peek().is_some_and(|byte| !is_delimiter(byte)) {
            self.position += 1;
        }

        if start == self.position {
            if let Some(byte @ (COMMA | CLOSE_BRACKET)) = self.peek() {
                return Err(MfmError::UnexpectedCharacter {
                    character: byte as char,
                    offset: start,
                });
            }
        }

        Ok(Token {
            text: &self.source[start..self.position],
            offset: start,
        })
    }

    /// Consume one expected byte
    pub fn expect(&mut self, expected: u8, description: &'static str) -> Result<()> {
        match self.peek() {
            Some(byte) if byte == expected => {
                self.position += 1;
                Ok(())
            }
            Some(_) => Err(self.unexpected_character()),
            None => Err(MfmError::UnexpectedEndOfInput {
                expected: description,
                offset: self.position,
            }),
        }
    }

    /// Consume a literal keyword
    pub fn expect_keyword(&mut self, keyword: &[u8], description: &'static str) -> Result<()> {
        for &expected in keyword {
            self.expect(expected, description)?;
        }
        Ok(())
    }

    /// Error for the character under the cursor
    pub fn unexpected_character(&self) -> MfmError {
        match self.current_char() {
            Some(character) => MfmError::UnexpectedCharacter {
                character,
                offset: self.position,
            },
            None => MfmError::UnexpectedEndOfInput {
                expected: "a declaration",
                offset: self.position,
            },
        }
    }
}
