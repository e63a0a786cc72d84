// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use gotest_report::{
    errors::{BuildReportError, ConfigParseError, ReportPathError, WriteReportError},
    exit_codes::GotestXmlExitCode,
};
use owo_colors::OwoColorize;
use std::{error::Error, path::PathBuf};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected error: bad input, bad configuration, or a failure to write the report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { current_dir: PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("report path error")]
    ReportPathError {
        #[from]
        err: ReportPathError,
    },
    #[error("failed to open input")]
    InputOpenFailed {
        input: Utf8PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("failed to build report")]
    BuildReportFailed {
        input: String,
        #[source]
        err: BuildReportError,
    },
    #[error("failed to write report")]
    WriteReportFailed {
        #[from]
        err: WriteReportError,
    },
}

impl ExpectedError {
    pub(crate) fn build_report_failed(input: impl Into<String>, err: BuildReportError) -> Self {
        Self::BuildReportFailed {
            input: input.into(),
            err,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::ReportPathError { .. } => GotestXmlExitCode::SETUP_ERROR,
            Self::InputOpenFailed { .. } => GotestXmlExitCode::INPUT_READ_ERROR,
            Self::BuildReportFailed { err, .. } => match err {
                BuildReportError::Read(err) if err.is_io() => GotestXmlExitCode::INPUT_READ_ERROR,
                BuildReportError::Read(_) | BuildReportError::UnknownAction(_) => {
                    GotestXmlExitCode::MALFORMED_STREAM
                }
                BuildReportError::Aggregate(_) => GotestXmlExitCode::INCOMPLETE_STREAM,
                // Newer error kinds abort the run like any malformed stream.
                _ => GotestXmlExitCode::MALFORMED_STREAM,
            },
            Self::WriteReportFailed { .. } => GotestXmlExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { error } => {
                error!("could not determine current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { current_dir } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    current_dir.display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                error!("{err}");
                err.source()
            }
            Self::ReportPathError { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputOpenFailed { input, error } => {
                error!("failed to open input `{}`", input.style(styles.bold));
                Some(error as &dyn Error)
            }
            Self::BuildReportFailed { input, err } => {
                error!(
                    "failed to build report from {} (no report was written)",
                    input.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::WriteReportFailed { err } => {
                error!("{err}");
                err.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
