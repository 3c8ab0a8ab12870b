//! JSON dump of a declaration table
//!
//! Mirrors the table itself rather than the YAML layout: enumerations keep
//! their element type, and functions are keyed by their `"[group, type]"`
//! string.

use super::registry::{FormatError, Formatter};
use crate::mfm::table::DeclarationTable;
use std::io;

pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn write(&self, table: &DeclarationTable, out: &mut dyn io::Write) -> Result<(), FormatError> {
        serde_json::to_writer_pretty(&mut *out, table)?;
        out.write_all(b"\n")?;
        Ok(())
    }

    fn description(&self) -> &str {
        "Pretty-printed JSON dump of the declaration table"
    }
}
