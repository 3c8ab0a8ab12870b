//! Format registry for declaration table serialization
//!
//! This module provides a pluggable registry system for output formats.
//! Each format implements the `Formatter` trait and can be registered with `FormatRegistry`.

use crate::mfm::table::DeclarationTable;
use std::collections::HashMap;
use std::io;
use thiserror::Error;

/// Error that can occur during formatting
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Format '{0}' not found")]
    FormatNotFound(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Trait for table formatters
///
/// Implementors write a declaration table to a byte sink.
pub trait Formatter: Send + Sync {
    /// The name of this format (e.g., "yaml", "json")
    fn name(&self) -> &str;

    /// Write `table` in this format
    fn write(&self, table: &DeclarationTable, out: &mut dyn io::Write) -> Result<(), FormatError>;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }
}

/// Registry of table formatters
pub struct FormatRegistry {
    formatters: HashMap<String, Box<dyn Formatter>>,
}

impl FormatRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        FormatRegistry {
            formatters: HashMap::new(),
        }
    }

    /// Register a formatter
    ///
    /// If a formatter with the same name already exists, it will be replaced.
    pub fn register<F: Formatter + 'static>(&mut self, formatter: F) {
        self.formatters
            .insert(formatter.name().to_string(), Box::new(formatter));
    }

    /// Get a formatter by name
    pub fn get(&self, name: &str) -> Option<&dyn Formatter> {
        self.formatters.get(name).map(|f| f.as_ref())
    }

    /// Check if a format exists
    pub fn has(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Write a table using the specified format
    pub fn write(
        &self,
        table: &DeclarationTable,
        format: &str,
        out: &mut dyn io::Write,
    ) -> Result<(), FormatError> {
        let formatter = self
            .get(format)
            .ok_or_else(|| FormatError::FormatNotFound(format.to_string()))?;
        formatter.write(table, out)
    }

    /// Serialize a table to a string using the specified format
    pub fn serialize(&self, table: &DeclarationTable, format: &str) -> Result<String, FormatError> {
        let mut buffer = Vec::new();
        self.write(table, format, &mut buffer)?;
        // Every built-in format writes UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// List all available format names (sorted)
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<_> = self.formatters.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with default formatters
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(super::YamlFormatter);
        registry.register(super::JsonFormatter);

        registry
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
