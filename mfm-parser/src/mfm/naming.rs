//! Identifier capitalization
//!
//! After parsing, every declared name is capitalized so the emitted YAML uses
//! `PascalCase`-style identifiers regardless of how the file spelled them:
//!
//! - function names and parameter names
//! - enumeration names and enum value names
//! - parameter type names that refer to a declared enumeration (so the tag
//!   matches the emitted enum name); other type names (`int`, `u8`, ...) are
//!   left alone
//!
//! Enumeration names are map keys, so this is a rename pass: the table is
//! rebuilt with every entry inserted under its final name instead of editing
//! keys in place.

use crate::mfm::error::Result;
use crate::mfm::table::{DeclarationTable, Enumeration, Function};
use tracing::debug;

/// Uppercase the first character of `name`.
///
/// The name is returned unchanged when it is empty or when the uppercase form of
/// its first character is not a single character (for example `ß`), so the
/// character count never changes.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut upper = first.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => {
            let mut capitalized = String::with_capacity(name.len());
            capitalized.push(single);
            capitalized.push_str(chars.as_str());
            capitalized
        }
        _ => name.to_string(),
    }
}

/// Rebuild `table` with all identifiers capitalized.
///
/// Fails with a duplicate key error if two enumeration names only differ in
/// the case of their first character, since both would land on the same key.
pub fn format_names(table: DeclarationTable) -> Result<DeclarationTable> {
    let mut formatted = DeclarationTable::new();

    for (key, function) in table.functions() {
        let mut renamed = Function::new(capitalize(&function.name));
        for parameter in &function.parameters {
            // Type references are resolved against enum names as written
            let type_name = if table.is_enum(&parameter.type_name) {
                capitalize(&parameter.type_name)
            } else {
                parameter.type_name.clone()
            };
            renamed.push(type_name, capitalize(&parameter.name));
        }
        formatted.insert_function(key, renamed)?;
    }

    let (enums, _) = table.into_parts();
    for (name, enumeration) in enums {
        let mut renamed = Enumeration::new(enumeration.element_type);
        for value in enumeration.values {
            renamed.push(value.key, capitalize(&value.name));
        }
        formatted.insert_enum(capitalize(&name), renamed)?;
    }

    debug!(
        enums = formatted.enum_count(),
        functions = formatted.function_count(),
        "formatted declaration names"
    );
    Ok(formatted)
}
