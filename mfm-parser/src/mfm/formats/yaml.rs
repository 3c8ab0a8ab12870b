//! YAML output
//!
//! The output is two YAML documents separated by a `---` line.
//!
//! Enumerations come first, as a mapping of enum name to a mapping of integer
//! key to value name:
//!
//!     Kind:
//!       0: Foo
//!       1: Bar
//!
//! Functions follow, keyed by the `[group, type]` scalar. Each value is a
//! sequence tagged with the function name, holding one scalar per parameter:
//! the parameter name, tagged with the parameter type:
//!
//!     '[1, 2]': !DoThing
//!     - !Kind K
//!     - !int N
//!
//! The key is a string; readers recover the pair with
//! [`FunctionKey::from_str`](crate::mfm::table::FunctionKey). An empty name
//! cannot be a tag, and a name starting with `!` would come back with one `!`
//! less, so such nodes are written without a tag.
//!
//! Enum values are written entry by entry, so repeated keys in the source stay
//! repeated in the output.

use super::registry::{FormatError, Formatter};
use crate::mfm::table::{DeclarationTable, Enumeration, Function};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::Value;
use std::io;

/// Line written between the enumeration and function documents
pub const DOCUMENT_SEPARATOR: &[u8] = b"---\n";

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn name(&self) -> &str {
        "yaml"
    }

    fn write(&self, table: &DeclarationTable, out: &mut dyn io::Write) -> Result<(), FormatError> {
        write_yaml(table, out)
    }

    fn description(&self) -> &str {
        "Enumerations and tagged function sequences as two YAML documents"
    }
}

/// Write both documents for `table`
pub fn write_yaml(table: &DeclarationTable, out: &mut dyn io::Write) -> Result<(), FormatError> {
    serde_yaml::to_writer(&mut *out, &EnumsDocument(table))?;
    out.write_all(DOCUMENT_SEPARATOR)?;
    serde_yaml::to_writer(&mut *out, &FunctionsDocument(table))?;
    Ok(())
}

struct EnumsDocument<'a>(&'a DeclarationTable);

impl Serialize for EnumsDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.enum_count()))?;
        for (name, enumeration) in self.0.enums() {
            map.serialize_entry(name, &EnumValues(enumeration))?;
        }
        map.end()
    }
}

struct EnumValues<'a>(&'a Enumeration);

impl Serialize for EnumValues<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.values.len()))?;
        for value in &self.0.values {
            map.serialize_entry(&value.key, &value.name)?;
        }
        map.end()
    }
}

struct FunctionsDocument<'a>(&'a DeclarationTable);

impl Serialize for FunctionsDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.function_count()))?;
        for (key, function) in self.0.functions() {
            map.serialize_entry(&key, &function_node(function))?;
        }
        map.end()
    }
}

fn function_node(function: &Function) -> Value {
    let parameters = function
        .parameters
        .iter()
        .map(|parameter| tagged(&parameter.type_name, Value::String(parameter.name.clone())))
        .collect();
    tagged(&function.name, Value::Sequence(parameters))
}

/// Names that cannot be written back verbatim as a local tag (empty, or
/// already starting with `!`) leave the node untagged.
fn tagged(tag: &str, value: Value) -> Value {
    if tag.is_empty() || tag.starts_with('!') {
        return value;
    }
    Value::Tagged(Box::new(TaggedValue {
        tag: Tag::new(tag),
        value,
    }))
}
