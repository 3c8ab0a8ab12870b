//! Output format implementations for declaration tables
//!
//! - yaml: the two-document MFM YAML output (enumerations, then functions)
//! - json: a pretty-printed dump of the table, handy for inspecting a parse

pub mod json;
pub mod registry;
pub mod yaml;

use once_cell::sync::Lazy;

pub use json::JsonFormatter;
pub use registry::{FormatError, FormatRegistry, Formatter};
pub use yaml::{write_yaml, YamlFormatter};

/// Registry with the built-in formatters, shared by every converter
pub static DEFAULT_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::with_defaults);
