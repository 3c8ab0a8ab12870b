//! Declaration parser
//!
//!     A single pass over the input drives a small state machine. Declarations
//!     have no terminator: a `map` or function header opens a list of values or
//!     parameters, and that list runs until the next special byte (`m`, `[`, `#`)
//!     shows up where a new entry could start, or until the input ends.
//!
//! States
//!
//!     None               top level, dispatching on the next significant byte
//!     FunctionEnum       `map <name> <element type>` header
//!     FunctionEnumValue  `<i64 key> <name>` entries of the open enumeration
//!     Function           `[<i32 group>, <i32 type>] <name>` header
//!     FunctionParameter  `<type> <name>` entries of the open function; `{type}`
//!                        has its braces stripped
//!     Comment            `#` to end of line, then back to the state it interrupted
//!
//!     A comment inside a list resumes that list. A `map` or `[` inside a list
//!     closes it and opens the next declaration.

use crate::mfm::error::{MfmError, Result};
use crate::mfm::lexing::{
    is_special, Cursor, CLOSE_BRACKET, COMMA, HASH, MAP_KEYWORD, OPEN_BRACKET, OPEN_MAP,
};
use crate::mfm::table::{DeclarationTable, Enumeration, Function, FunctionKey};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    FunctionEnum,
    FunctionEnumValue,
    Function,
    FunctionParameter,
    /// Holds the state to resume once the comment line is skipped
    Comment { resume: Resume },
}

/// States a comment can interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    None,
    FunctionEnumValue,
    FunctionParameter,
}

impl From<Resume> for State {
    fn from(resume: Resume) -> Self {
        match resume {
            Resume::None => State::None,
            Resume::FunctionEnumValue => State::FunctionEnumValue,
            Resume::FunctionParameter => State::FunctionParameter,
        }
    }
}

/// Parse an MFM buffer into a declaration table.
///
/// Names are stored exactly as written; capitalization is a separate pass (see
/// [`crate::mfm::naming`]).
pub fn parse(input: &[u8]) -> Result<DeclarationTable> {
    Parser::new(input)?.run()
}

struct Parser<'a> {
    cursor: Cursor<'a>,
    table: DeclarationTable,
    /// Index of the enumeration receiving values
    current_enum: Option<usize>,
    /// Index of the function receiving parameters
    current_function: Option<usize>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a [u8]) -> Result<Self> {
        Ok(Self {
            cursor: Cursor::new(input)?,
            table: DeclarationTable::new(),
            current_enum: None,
            current_function: None,
        })
    }

    fn run(mut self) -> Result<DeclarationTable> {
        let mut state = State::None;

        while !self.cursor.is_at_end() {
            state = match state {
                State::None => self.dispatch(Resume::None)?,
                State::Comment { resume } => {
                    self.cursor.skip_comment();
                    resume.into()
                }
                State::FunctionEnum => self.enum_header()?,
                State::FunctionEnumValue => self.enum_value()?,
                State::Function => self.function_header()?,
                State::FunctionParameter => self.parameter()?,
            };
        }

        debug!(
            enums = self.table.enum_count(),
            functions = self.table.function_count(),
            "parsed declaration table"
        );
        Ok(self.table)
    }

    /// Pick the next state from the byte after any whitespace.
    ///
    /// Only called at top level or when a special byte is already known to follow,
    /// so anything but `#`, `m` or `[` is a top-level syntax error.
    fn dispatch(&mut self, resume: Resume) -> Result<State> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Ok(State::None),
            Some(HASH) => Ok(State::Comment { resume }),
            Some(OPEN_MAP) => Ok(State::FunctionEnum),
            Some(OPEN_BRACKET) => Ok(State::Function),
            Some(_) => Err(self.cursor.unexpected_character()),
        }
    }

    /// Entry point of the two list states: end of input, a special byte, or an entry
    fn list_continues(&mut self, resume: Resume) -> Result<Option<State>> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            None => Ok(Some(State::None)),
            Some(byte) if is_special(byte) => self.dispatch(resume).map(Some),
            Some(_) => Ok(None),
        }
    }

    fn enum_header(&mut self) -> Result<State> {
        self.cursor.expect_keyword(MAP_KEYWORD, "'map'")?;
        self.cursor.skip_whitespace();
        let name = self.cursor.read_token()?;
        self.cursor.skip_whitespace();
        let element_type = self.cursor.read_token()?;

        trace!(name = name.text, element_type = element_type.text, "enumeration");
        let index = self
            .table
            .insert_enum(name.text, Enumeration::new(element_type.text))?;
        self.current_enum = Some(index);
        self.current_function = None;
        Ok(State::FunctionEnumValue)
    }

    fn enum_value(&mut self) -> Result<State> {
        if let Some(next) = self.list_continues(Resume::FunctionEnumValue)? {
            return Ok(next);
        }

        let key = self.cursor.read_token()?.parse_int::<i64>()?;
        self.cursor.skip_whitespace();
        let name = self.cursor.read_token()?;

        let enumeration = self
            .current_enum
            .and_then(|index| self.table.enum_at_mut(index))
            .ok_or(MfmError::InvariantViolation("enum value outside of a map declaration"))?;
        enumeration.push(key, name.text);
        Ok(State::FunctionEnumValue)
    }

    fn function_header(&mut self) -> Result<State> {
        self.cursor.expect(OPEN_BRACKET, "'['")?;
        self.cursor.skip_whitespace();
        let group = self.cursor.read_token()?.parse_int::<i32>()?;
        self.cursor.skip_whitespace();
        self.cursor.expect(COMMA, "','")?;
        self.cursor.skip_whitespace();
        let type_id = self.cursor.read_token()?.parse_int::<i32>()?;
        self.cursor.skip_whitespace();
        self.cursor.expect(CLOSE_BRACKET, "']'")?;
        self.cursor.skip_whitespace();
        let name = self.cursor.read_token()?;

        let key = FunctionKey::new(group, type_id);
        trace!(%key, name = name.text, "function");
        let index = self.table.insert_function(key, Function::new(name.text))?;
        self.current_function = Some(index);
        self.current_enum = None;
        Ok(State::FunctionParameter)
    }

    fn parameter(&mut self) -> Result<State> {
        if let Some(next) = self.list_continues(Resume::FunctionParameter)? {
            return Ok(next);
        }

        let type_name = self.cursor.read_token()?;
        self.cursor.skip_whitespace();
        let name = self.cursor.read_token()?;

        let function = self
            .current_function
            .and_then(|index| self.table.function_at_mut(index))
            .ok_or(MfmError::InvariantViolation("parameter outside of a function declaration"))?;
        function.push(type_name.text.trim_matches(|c| c == '{' || c == '}'), name.text);
        Ok(State::FunctionParameter)
    }
}
