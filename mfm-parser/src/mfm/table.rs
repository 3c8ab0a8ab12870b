//! Declaration table
//!
//! The in-memory result of parsing an MFM file. It holds two keyed collections:
//!
//! - enumerations, keyed by name
//! - functions, keyed by their `(group, type)` pair
//!
//! Both collections keep declaration order, which is also the order the
//! formats emit them in. Inserting a key that already exists is an error; the
//! table never overwrites a declaration.

use crate::mfm::error::{DeclarationKind, MfmError, Result};
use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifies a function by its `(group, type)` pair
///
/// Renders as `[group, type]` and parses back from the same form, which is how
/// the key appears in the emitted YAML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionKey {
    pub group: i32,
    pub type_id: i32,
}

impl FunctionKey {
    pub fn new(group: i32, type_id: i32) -> Self {
        Self { group, type_id }
    }
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.group, self.type_id)
    }
}

/// Error returned when a string is not a `[group, type]` key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid function key '{0}', expected '[group, type]'")]
pub struct FunctionKeyParseError(String);

impl FromStr for FunctionKey {
    type Err = FunctionKeyParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || FunctionKeyParseError(s.to_string());
        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(invalid)?;
        let (group, type_id) = inner.split_once(',').ok_or_else(invalid)?;

        Ok(FunctionKey {
            group: group.trim().parse().map_err(|_| invalid())?,
            type_id: type_id.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl Serialize for FunctionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One `key name` line of an enumeration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub key: i64,
    pub name: String,
}

/// A `map` declaration: an element type and ordered values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Enumeration {
    pub element_type: String,
    pub values: Vec<EnumValue>,
}

impl Enumeration {
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, key: i64, name: impl Into<String>) {
        self.values.push(EnumValue {
            key,
            name: name.into(),
        });
    }
}

/// One `type name` pair of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// A `[group, type] name` declaration with its ordered parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    pub parameters: Vec<Parameter>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn push(&mut self, type_name: impl Into<String>, name: impl Into<String>) {
        self.parameters.push(Parameter {
            type_name: type_name.into(),
            name: name.into(),
        });
    }
}

/// All declarations of one MFM file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeclarationTable {
    enums: IndexMap<String, Enumeration>,
    functions: IndexMap<FunctionKey, Function>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an enumeration, returning its index in declaration order
    pub fn insert_enum(&mut self, name: impl Into<String>, enumeration: Enumeration) -> Result<usize> {
        match self.enums.entry(name.into()) {
            Entry::Occupied(entry) => Err(MfmError::DuplicateKey {
                kind: DeclarationKind::Enumeration,
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let index = entry.index();
                entry.insert(enumeration);
                Ok(index)
            }
        }
    }

    /// Insert a function, returning its index in declaration order
    pub fn insert_function(&mut self, key: FunctionKey, function: Function) -> Result<usize> {
        match self.functions.entry(key) {
            Entry::Occupied(_) => Err(MfmError::DuplicateKey {
                kind: DeclarationKind::Function,
                key: key.to_string(),
            }),
            Entry::Vacant(entry) => {
                let index = entry.index();
                entry.insert(function);
                Ok(index)
            }
        }
    }

    pub fn enum_at_mut(&mut self, index: usize) -> Option<&mut Enumeration> {
        self.enums.get_index_mut(index).map(|(_, enumeration)| enumeration)
    }

    pub fn function_at_mut(&mut self, index: usize) -> Option<&mut Function> {
        self.functions.get_index_mut(index).map(|(_, function)| function)
    }

    pub fn get_enum(&self, name: &str) -> Option<&Enumeration> {
        self.enums.get(name)
    }

    /// Whether `name` is a declared enumeration
    pub fn is_enum(&self, name: &str) -> bool {
        self.enums.contains_key(name)
    }

    pub fn get_function(&self, key: FunctionKey) -> Option<&Function> {
        self.functions.get(&key)
    }

    pub fn enums(&self) -> impl Iterator<Item = (&str, &Enumeration)> {
        self.enums.iter().map(|(name, enumeration)| (name.as_str(), enumeration))
    }

    pub fn functions(&self) -> impl Iterator<Item = (FunctionKey, &Function)> {
        self.functions.iter().map(|(key, function)| (*key, function))
    }

    /// Consume the table, yielding both collections in declaration order
    pub fn into_parts(self) -> (IndexMap<String, Enumeration>, IndexMap<FunctionKey, Function>) {
        (self.enums, self.functions)
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enums.is_empty() && self.functions.is_empty()
    }
}
