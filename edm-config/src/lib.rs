//! Shared configuration loader for the edm toolchain.
//!
//! `defaults/edm.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`EdmConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use edm_core::{Options, SoftBreak};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/edm.default.toml");

/// Top-level configuration consumed by edm applications.
#[derive(Debug, Clone, Deserialize)]
pub struct EdmConfig {
    pub import: ImportConfig,
    pub convert: ConvertConfig,
}

/// Mirrors the knobs exposed by [`edm_core::Options`].
#[derive(Debug, Clone, Deserialize)]
pub struct ImportConfig {
    pub soft_break: SoftBreak,
    pub max_depth: usize,
    pub gfm: bool,
}

impl From<ImportConfig> for Options {
    fn from(config: ImportConfig) -> Self {
        Options {
            soft_break: config.soft_break,
            max_depth: config.max_depth,
            gfm: config.gfm,
        }
    }
}

impl From<&ImportConfig> for Options {
    fn from(config: &ImportConfig) -> Self {
        Options {
            soft_break: config.soft_break,
            max_depth: config.max_depth,
            gfm: config.gfm,
        }
    }
}

/// Conversion defaults for the command line.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub default_format: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `import.soft_break`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<EdmConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<EdmConfig, ConfigError> {
    Loader::new().build()
}
