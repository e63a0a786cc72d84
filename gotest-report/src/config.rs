// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for report output.
//!
//! The embedded default config is always loaded first. A user config file, if any, is layered on
//! top of it.

use crate::{
    errors::{ConfigParseError, ConfigParseErrorKind, ReportPathError},
    report::OutputStorePolicy,
};
use camino::{Utf8Path, Utf8PathBuf};
use config::{
    Config, ConfigError, File, FileFormat,
    builder::{ConfigBuilder, DefaultState},
};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::warn;

/// Trait for handling configuration warnings.
pub trait ConfigWarnings {
    /// Handle unknown configuration keys found in a config file.
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        base_dir: &Utf8Path,
        unknown: &BTreeSet<String>,
    );
}

/// Default implementation of [`ConfigWarnings`] that logs warnings using the tracing crate.
pub struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(
        &mut self,
        config_file: &Utf8Path,
        base_dir: &Utf8Path,
        unknown: &BTreeSet<String>,
    ) {
        let mut unknown_str = String::new();
        if let [key] = unknown.iter().collect::<Vec<_>>().as_slice() {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.push_str(key);
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                unknown_str.push('\n');
                unknown_str.push_str("  - ");
                unknown_str.push_str(ignored_key);
            }
        }

        warn!(
            "in config file {}, ignoring unknown configuration {unknown_str}",
            config_file.strip_prefix(base_dir).unwrap_or(config_file),
        )
    }
}

/// Report configuration, read from the embedded defaults and an optional user file.
#[derive(Clone, Debug)]
pub struct ReportConfig {
    base_dir: Utf8PathBuf,
    path: Option<Utf8PathBuf>,
    policy: OutputStorePolicy,
}

impl ReportConfig {
    /// The default location of the config within the base directory: `.config/gotest-xml.toml`.
    pub const CONFIG_PATH: &'static str = ".config/gotest-xml.toml";

    /// Contains the default config as a TOML file.
    ///
    /// User configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the given file, or if not specified from `.config/gotest-xml.toml`
    /// within `base_dir`.
    ///
    /// A file passed in explicitly must exist. If no file is passed in and the default location
    /// has none, the default config is used.
    pub fn from_sources(
        base_dir: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        Self::from_sources_with_warnings(base_dir, config_file, &mut DefaultConfigWarnings)
    }

    /// Loads configuration from the given sources with custom warning handling.
    pub fn from_sources_with_warnings(
        base_dir: impl Into<Utf8PathBuf>,
        config_file: Option<&Utf8Path>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigParseError> {
        let base_dir = base_dir.into();

        let (config_file, source) = match config_file {
            Some(file) => (file.to_owned(), File::new(file.as_str(), FileFormat::Toml)),
            None => {
                let config_file = base_dir.join(Self::CONFIG_PATH);
                let source = File::new(config_file.as_str(), FileFormat::Toml).required(false);
                (config_file, source)
            }
        };

        let builder = Self::make_default_config().add_source(source);
        let (config, unknown) = Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(&config_file, kind))?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(&config_file, &base_dir, &unknown);
        }

        let ReportSectionDeserialize {
            path,
            store_success_output,
            store_failure_output,
        } = config.report;

        Ok(Self {
            path: path.map(|path| base_dir.join(path)),
            base_dir,
            policy: OutputStorePolicy {
                store_success_output,
                store_failure_output,
            },
        })
    }

    /// Returns the default config, without reading any user files.
    #[cfg(test)]
    pub(crate) fn default_config(base_dir: impl Into<Utf8PathBuf>) -> Self {
        let config = Self::make_default_config()
            .build()
            .expect("default config is always valid");
        let config: ReportConfigDeserialize = serde_path_to_error::deserialize(config)
            .expect("default config is always valid");

        Self {
            base_dir: base_dir.into(),
            path: config.report.path,
            policy: OutputStorePolicy {
                store_success_output: config.report.store_success_output,
                store_failure_output: config.report.store_failure_output,
            },
        }
    }

    /// Returns the directory relative paths in the config were resolved against.
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Returns the configured report path, if one was set.
    pub fn configured_path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Returns the path the report should be written to.
    ///
    /// This is the configured path if one was set, and `cov/cov.xml` within the system
    /// temporary directory otherwise.
    pub fn report_path(&self) -> Result<Utf8PathBuf, ReportPathError> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => default_report_path(),
        }
    }

    /// Returns which captured output is stored in the report.
    pub fn output_policy(&self) -> OutputStorePolicy {
        self.policy
    }

    /// Overrides the report path. Relative paths are used as-is.
    pub fn set_report_path(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.path = Some(path.into());
        self
    }

    /// Overrides whether output is stored for tests that passed or were skipped.
    pub fn set_store_success_output(&mut self, store: bool) -> &mut Self {
        self.policy.store_success_output = store;
        self
    }

    /// Overrides whether output is stored for tests that failed.
    pub fn set_store_failure_output(&mut self, store: bool) -> &mut Self {
        self.policy.store_failure_output = store;
        self
    }

    // ---
    // Helper methods
    // ---

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    /// This returns a tuple of (config, ignored paths).
    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<(ReportConfigDeserialize, BTreeSet<String>), ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let mut ignored = BTreeSet::new();
        let mut cb = |path: serde_ignored::Path| {
            ignored.insert(path.to_string());
        };
        let ignored_de = serde_ignored::Deserializer::new(config, &mut cb);
        let config: ReportConfigDeserialize = serde_path_to_error::deserialize(ignored_de)
            .map_err(|error| {
                // serde_path_to_error already tracks the key, so drop it from the config error.
                let path = error.path().clone();
                let error = match error.into_inner() {
                    ConfigError::At { error, .. } => *error,
                    other => other,
                };
                ConfigParseErrorKind::DeserializeError(Box::new(serde_path_to_error::Error::new(
                    path, error,
                )))
            })?;

        Ok((config, ignored))
    }
}

/// Returns `cov/cov.xml` within the system temporary directory.
pub fn default_report_path() -> Result<Utf8PathBuf, ReportPathError> {
    let temp_dir = Utf8PathBuf::try_from(std::env::temp_dir())
        .map_err(|error| ReportPathError::new(error.into_path_buf()))?;
    Ok(temp_dir.join("cov").join("cov.xml"))
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigDeserialize {
    report: ReportSectionDeserialize,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportSectionDeserialize {
    #[serde(default)]
    path: Option<Utf8PathBuf>,
    store_success_output: bool,
    store_failure_output: bool,
}
