//! Configuration for the `mfm` converter.
//!
//! Settings cover the output format, where outputs land, whether a batch keeps
//! going after a failed input, and the default log filter. The shipped values
//! live in `defaults/mfm.default.toml`, which is compiled into the crate; see
//! [`Loader`] for how user files and flags are layered over them.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/mfm.default.toml");

/// Top-level configuration consumed by mfm applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MfmConfig {
    pub convert: ConvertConfig,
    pub logging: LoggingConfig,
}

/// How inputs are converted and where outputs go.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub format: String,
    pub output_extension: String,
    pub continue_on_error: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// File picked up from the working directory when no `--config` is given
pub const LOCAL_CONFIG: &str = "mfm.toml";

/// Builds an [`MfmConfig`] from three layers, lowest first:
///
/// 1. `defaults/mfm.default.toml`, compiled in
/// 2. a user file: an explicit path, or `./mfm.toml` when present
/// 3. command-line overrides such as `--format`
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Loader holding only the compiled-in defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer the TOML file at `path`; `build` fails if it does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), true)
    }

    /// Layer the TOML file at `path` if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml(path.as_ref(), false)
    }

    /// Layer the user's file: `explicit` must exist, otherwise [`LOCAL_CONFIG`]
    /// in the working directory is used when present.
    pub fn with_user_file(self, explicit: Option<&Path>) -> Self {
        match explicit {
            Some(path) => self.with_file(path),
            None => self.with_optional_file(LOCAL_CONFIG),
        }
    }

    fn with_toml(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Override one dotted key (`convert.format`, `logging.level`, ...).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Override `convert.format` when a format was requested.
    pub fn with_format(self, format: Option<&str>) -> Result<Self, ConfigError> {
        match format {
            Some(format) => self.set_override("convert.format", format),
            None => Ok(self),
        }
    }

    pub fn build(self) -> Result<MfmConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The compiled-in configuration with no user layers.
pub fn load_defaults() -> Result<MfmConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.format, "yaml");
        assert_eq!(config.convert.output_extension, "yaml");
        assert!(config.convert.continue_on_error);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.format", "json")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.format, "json");
    }

    #[test]
    fn layers_user_files() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[convert]\noutput_extension = \"yml\"\ncontinue_on_error = false").unwrap();

        let config = Loader::new().with_file(file.path()).build().expect("config to build");
        assert_eq!(config.convert.output_extension, "yml");
        assert!(!config.convert.continue_on_error);
        // Untouched keys keep their defaults
        assert_eq!(config.convert.format, "yaml");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/mfm.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn format_flag_overrides_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[convert]\nformat = \"yaml\"\n[logging]\nlevel = \"debug\"").unwrap();

        let config = Loader::new()
            .with_user_file(Some(file.path()))
            .with_format(Some("json"))
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.format, "json");
        assert_eq!(config.logging.level, "debug");

        let config = Loader::new()
            .with_format(None)
            .expect("no override")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.format, "yaml");
    }

    #[test]
    fn explicit_user_file_must_exist() {
        let result = Loader::new()
            .with_user_file(Some(Path::new("/nonexistent/custom.toml")))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_required_file_fails() {
        assert!(Loader::new().with_file("/nonexistent/mfm.toml").build().is_err());
    }
}
