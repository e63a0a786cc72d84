// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by gotest-report.
//!
//! Every error here is fatal: a stream that fails to decode, classify or aggregate produces no
//! report at all.

use crate::events::Action;
use camino::Utf8PathBuf;
use chrono::{DateTime, FixedOffset};
use config::ConfigError;
use std::{fmt, path::PathBuf};
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse gotest-xml config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of error that occurred while parsing a config.
///
/// Returned by [`ConfigParseError::kind`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// The default report path could not be determined.
#[derive(Clone, Debug, Error)]
#[error(
    "system temporary directory `{}` is not valid UTF-8 (hint: pass in --output)",
    temp_dir.display()
)]
pub struct ReportPathError {
    temp_dir: PathBuf,
}

impl ReportPathError {
    pub(crate) fn new(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }

    /// Returns the temporary directory that could not be used.
    pub fn temp_dir(&self) -> &PathBuf {
        &self.temp_dir
    }
}

/// Error returned while parsing an [`Action`] value from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized action: `{input}`\n(known actions: {})",
    Action::variants().join(", "),
)]
pub struct ActionParseError {
    input: String,
}

impl ActionParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// Returns the label that failed to parse.
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// An event in the stream carried an action outside the known vocabulary.
#[derive(Clone, Debug, Error)]
#[error("event {index} has an unknown action")]
pub struct UnknownActionError {
    index: usize,
    #[source]
    err: ActionParseError,
}

impl UnknownActionError {
    pub(crate) fn new(index: usize, err: ActionParseError) -> Self {
        Self { index, err }
    }

    /// Returns the sequence index of the offending event.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the unrecognized action label.
    pub fn action(&self) -> &str {
        self.err.input()
    }
}

/// A record in the input could not be decoded into an event.
#[derive(Debug, Error)]
#[error("failed to decode event {index} from the input stream")]
pub struct ReadEventError {
    index: usize,
    #[source]
    err: serde_json::Error,
}

impl ReadEventError {
    pub(crate) fn new(index: usize, err: serde_json::Error) -> Self {
        Self { index, err }
    }

    /// Returns the sequence index the record would have been given.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns true if the input could not be read at all, as opposed to being malformed.
    pub fn is_io(&self) -> bool {
        self.err.is_io()
    }
}

/// Timing could not be resolved from a timestamp and elapsed value.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum TimingError {
    /// The elapsed value was negative, infinite, NaN, or too large to represent.
    #[error("elapsed value {elapsed} is not a valid duration in seconds")]
    InvalidElapsed {
        /// The elapsed value.
        elapsed: f64,
    },

    /// Adding the elapsed value to the timestamp overflowed.
    #[error("timestamp {timestamp} plus {elapsed}s is out of range")]
    OutOfRange {
        /// The timestamp.
        timestamp: DateTime<FixedOffset>,

        /// The elapsed value.
        elapsed: f64,
    },
}

/// Identifies the test unit an [`AggregateError`] refers to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitKey {
    /// The package name.
    pub package: String,

    /// The test name, or `None` for package-level events.
    pub test: Option<String>,
}

impl UnitKey {
    pub(crate) fn test(package: &str, test: &str) -> Self {
        Self {
            package: package.to_owned(),
            test: Some(test.to_owned()),
        }
    }

    pub(crate) fn package(package: &str) -> Self {
        Self {
            package: package.to_owned(),
            test: None,
        }
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.test {
            Some(test) => write!(f, "`{}` in package `{}`", test, self.package),
            None => write!(f, "package `{}`", self.package),
        }
    }
}

/// Events for a test or package could not be folded into a consistent record.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum AggregateError {
    /// A test never reported a pass, fail or skip.
    #[error("test {key} started but never concluded (is the stream truncated?)")]
    IncompleteTest {
        /// The test.
        key: UnitKey,
    },

    /// A test concluded without the timestamp or elapsed value needed to time it.
    #[error("test {key} concluded with `{action}` but no {missing}")]
    MissingTiming {
        /// The test.
        key: UnitKey,

        /// The end-phase action that lacked timing.
        action: Action,

        /// The field that was absent.
        missing: &'static str,
    },

    /// Timing for a test or package could not be resolved.
    #[error("failed to resolve timing for {key}")]
    Timing {
        /// The test or package.
        key: UnitKey,

        /// The underlying error.
        #[source]
        err: TimingError,
    },
}

/// An error that aborted building a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildReportError {
    /// A record could not be decoded.
    #[error(transparent)]
    Read(#[from] ReadEventError),

    /// A record had an unknown action.
    #[error(transparent)]
    UnknownAction(#[from] UnknownActionError),

    /// Records could not be aggregated.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

/// An error that occurs while serializing a [`Report`](crate::report::Report) to XML.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SerializeError {
    /// Writing to the underlying writer failed.
    #[error("error writing XML")]
    Io(#[from] std::io::Error),

    /// The XML writer reported an error.
    #[error("error producing XML")]
    Xml(#[from] quick_xml::Error),
}

/// An error that occurred while writing a report to disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The directory containing the report could not be created.
    #[error("error creating directory {dir}")]
    CreateDir {
        /// The directory.
        dir: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The report file could not be written or moved into place.
    #[error("error writing report to {file}")]
    Fs {
        /// The report file.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("error serializing report to {file}")]
    Serialize {
        /// The report file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: SerializeError,
    },
}
