//! # mfm
//!
//! Parser and emitter for MSBT function map (MFM) files.
//!
//! An MFM file declares integer enumerations (`map <Name> <type>` followed by
//! `<key> <name>` pairs) and functions (`[group, type] <name>` followed by
//! `<type> <name>` parameter pairs). The library turns such a file into a
//! [`DeclarationTable`](mfm::table::DeclarationTable) and renders that table as
//! a two-document YAML stream.
//!
//! File Layout
//!
//! src/mfm
//!   ├── lexing      Byte classes and the token cursor
//!   ├── parsing     The declaration state machine
//!   ├── table       The declaration table (data model)
//!   ├── naming      Identifier capitalization pass
//!   ├── formats     Output formats (yaml, json) and their registry
//!   ├── pipeline    parse -> rename -> emit
//!   └── range       Byte offset to line:column conversion
//!
//! The core never touches the filesystem: callers hand it a byte slice and a
//! `std::io::Write` sink.

pub mod mfm;

pub use mfm::error::{MfmError, Result};
pub use mfm::pipeline::{convert, ConvertError, Converter};
pub use mfm::table::{DeclarationTable, Enumeration, Function, FunctionKey};
