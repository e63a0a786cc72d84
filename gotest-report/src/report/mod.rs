// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The report hierarchy and the builders that fold events into it.
//!
//! Events are grouped with unordered maps, so every record that needs a stable position carries
//! the sequence index it was first seen at. Ordering is restored by sorting on that index when
//! the report is assembled, never from map iteration order.

mod assembler;
mod package;
mod unit;

pub use assembler::*;
pub use package::*;
pub use unit::*;

use crate::{
    errors::{SerializeError, WriteReportError},
    events::Outcome,
    serialize::serialize_report,
};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use chrono::{DateTime, FixedOffset};
use std::{
    io::{self, Write},
    ops::AddAssign,
};

/// The root of a report: every package seen in the stream, in discovery order.
#[derive(Clone, Debug)]
pub struct Report {
    /// The time at which assembly of this report began.
    pub created_at: DateTime<FixedOffset>,

    /// Totals across all packages.
    pub counts: Counts,

    /// The packages, ordered by the first time each was observed.
    pub packages: Vec<TestPackage>,
}

impl Report {
    /// Serializes this report as XML to the given writer.
    pub fn serialize(
        &self,
        writer: impl io::Write,
        policy: OutputStorePolicy,
    ) -> Result<(), SerializeError> {
        serialize_report(self, policy, writer)
    }

    /// Serializes this report as XML to a string.
    pub fn to_xml_string(&self, policy: OutputStorePolicy) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf, policy)?;
        String::from_utf8(buf).map_err(|err| {
            SerializeError::Io(io::Error::new(io::ErrorKind::InvalidData, err.utf8_error()))
        })
    }

    /// Writes the report to `path`, creating parent directories as necessary.
    ///
    /// The file is written to a temporary location and renamed into place, so a failure partway
    /// through never leaves a truncated report behind.
    pub fn write_to_path(
        &self,
        path: &Utf8Path,
        policy: OutputStorePolicy,
    ) -> Result<(), WriteReportError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|error| WriteReportError::CreateDir {
                dir: dir.to_owned(),
                error,
            })?;
        }

        let file = AtomicFile::new(path, OverwriteBehavior::AllowOverwrite);
        file.write(|f| {
            let mut writer = io::BufWriter::new(f);
            self.serialize(&mut writer, policy)?;
            writer.flush().map_err(SerializeError::Io)
        })
        .map_err(|err| match err {
            atomicwrites::Error::Internal(error) => WriteReportError::Fs {
                file: path.to_owned(),
                error,
            },
            atomicwrites::Error::User(error) => WriteReportError::Serialize {
                file: path.to_owned(),
                error,
            },
        })
    }
}

/// Aggregate counts for a package or a whole report.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Counts {
    /// The number of distinct tests.
    pub total: usize,

    /// Tests that passed.
    pub pass: usize,

    /// Tests that were skipped.
    pub skip: usize,

    /// Tests that reported benchmark results.
    pub bench: usize,

    /// Tests that failed.
    pub fail: usize,
}

impl Counts {
    /// Records a concluded test unit. `total` is maintained separately.
    pub(crate) fn record_unit(&mut self, unit: &TestUnit) {
        match unit.outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Skip => self.skip += 1,
        }
        if unit.bench {
            self.bench += 1;
        }
    }
}

impl AddAssign<&Counts> for Counts {
    fn add_assign(&mut self, other: &Counts) {
        // Use the destructuring syntax to ensure that all fields are handled.
        let Counts {
            total,
            pass,
            skip,
            bench,
            fail,
        } = other;
        self.total += total;
        self.pass += pass;
        self.skip += skip;
        self.bench += bench;
        self.fail += fail;
    }
}

/// Which captured output is written out with each test unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct OutputStorePolicy {
    /// Store output for tests that passed or were skipped.
    pub store_success_output: bool,

    /// Store output for tests that failed.
    pub store_failure_output: bool,
}

impl OutputStorePolicy {
    /// Returns true if output should be stored for a unit with this outcome.
    pub fn should_store(&self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Pass | Outcome::Skip => self.store_success_output,
            Outcome::Fail => self.store_failure_output,
        }
    }
}

impl Default for OutputStorePolicy {
    fn default() -> Self {
        Self {
            store_success_output: true,
            store_failure_output: true,
        }
    }
}
