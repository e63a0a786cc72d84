// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::Result,
    output::{OutputContext, OutputOpts},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use gotest_report::{config::ReportConfig, exit_codes::GotestXmlExitCode, report::ReportAssembler};
use std::io;
use tracing::info;

/// Aggregate a `go test -json` event stream into an XML report.
///
/// Reads events from standard input (or `--input`), groups them into packages and tests, and
/// writes the report to `--output`. Nothing is written if the stream is malformed or incomplete.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100
)]
pub struct GotestXmlApp {
    /// Event stream to read, or `-` for standard input [default: -]
    #[arg(long, short = 'i', value_name = "PATH")]
    input: Option<Utf8PathBuf>,

    /// Path to write the report to [default: <temp dir>/cov/cov.xml]
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    report_path: Option<Utf8PathBuf>,

    /// Config file [default: .config/gotest-xml.toml in the current directory]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    /// Do not store output for tests that passed or were skipped
    #[arg(long)]
    no_success_output: bool,

    /// Do not store output for tests that failed
    #[arg(long)]
    no_failure_output: bool,

    #[clap(flatten)]
    output: OutputOpts,
}

impl GotestXmlApp {
    /// Initializes logging and color output for this invocation.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code on success.
    pub fn exec(self) -> Result<i32> {
        let current_dir =
            std::env::current_dir().map_err(|error| ExpectedError::CurrentDirFailed { error })?;
        let base_dir = Utf8PathBuf::try_from(current_dir).map_err(|error| {
            ExpectedError::CurrentDirInvalidUtf8 {
                current_dir: error.into_path_buf(),
            }
        })?;
        self.exec_in(&base_dir)
    }

    fn exec_in(self, base_dir: &Utf8Path) -> Result<i32> {
        let config_file = self.config_file.as_ref().map(|file| base_dir.join(file));
        let mut config = ReportConfig::from_sources(base_dir, config_file.as_deref())?;
        if let Some(path) = &self.report_path {
            let path = config.base_dir().join(path);
            config.set_report_path(path);
        }
        if self.no_success_output {
            config.set_store_success_output(false);
        }
        if self.no_failure_output {
            config.set_store_failure_output(false);
        }
        let report_path = config.report_path()?;

        let assembler = ReportAssembler::new();
        let report = match self.input.as_deref() {
            None => assembler.assemble_from(io::stdin().lock()),
            Some(input) if input.as_str() == "-" => assembler.assemble_from(io::stdin().lock()),
            Some(input) => {
                let path = base_dir.join(input);
                let file = std::fs::File::open(&path).map_err(|error| {
                    ExpectedError::InputOpenFailed {
                        input: path.clone(),
                        error,
                    }
                })?;
                assembler.assemble_from(file)
            }
        }
        .map_err(|err| ExpectedError::build_report_failed(self.input_name(), err))?;

        report.write_to_path(&report_path, config.output_policy())?;

        let counts = &report.counts;
        info!(
            "wrote report to {report_path} ({} tests: {} passed, {} failed, {} skipped)",
            counts.total, counts.pass, counts.fail, counts.skip,
        );
        Ok(GotestXmlExitCode::OK)
    }

    fn input_name(&self) -> String {
        match self.input.as_deref() {
            Some(input) if input.as_str() != "-" => format!("`{input}`"),
            _ => "standard input".to_owned(),
        }
    }
}
