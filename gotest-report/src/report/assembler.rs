// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Counts, PackageBuilder, Report};
use crate::{
    errors::{AggregateError, BuildReportError},
    events::TestEvent,
    reader::EventReader,
};
use chrono::{DateTime, FixedOffset, Local};
use std::{collections::HashMap, io};
use tracing::debug;

/// Reads a `go test -json` stream to completion and assembles it into a [`Report`].
///
/// `created_at` is recorded as the report creation time. The first malformed record, unknown
/// action or incomplete test aborts the build.
pub fn build_report(
    reader: impl io::Read,
    created_at: DateTime<FixedOffset>,
) -> Result<Report, BuildReportError> {
    ReportAssembler::with_created_at(created_at).assemble_from(reader)
}

/// Collects events for every package and assembles the final report.
#[derive(Clone, Debug)]
pub struct ReportAssembler {
    created_at: DateTime<FixedOffset>,
    packages: HashMap<String, PackageBuilder>,
}

impl ReportAssembler {
    /// Creates an assembler, recording the current local time as the creation time.
    pub fn new() -> Self {
        Self::with_created_at(Local::now().fixed_offset())
    }

    /// Creates an assembler with the given creation time.
    pub fn with_created_at(created_at: DateTime<FixedOffset>) -> Self {
        Self {
            created_at,
            packages: HashMap::new(),
        }
    }

    /// Routes the next event to its package. Events must be supplied in arrival order.
    pub fn add_event(&mut self, event: TestEvent) {
        // Avoid allocating a key for the common case where the package is already known.
        if let Some(builder) = self.packages.get_mut(&event.package) {
            builder.add_event(event);
        } else {
            let mut builder = PackageBuilder::new(event.package.clone());
            builder.add_event(event);
            self.packages.insert(builder.name().to_owned(), builder);
        }
    }

    /// Reads every event from `reader` and assembles the report.
    pub fn assemble_from(mut self, reader: impl io::Read) -> Result<Report, BuildReportError> {
        for event in EventReader::new(reader) {
            self.add_event(event?);
        }
        self.finish().map_err(Into::into)
    }

    /// Builds every package and assembles the report.
    ///
    /// Packages are ordered by the first event seen for each.
    pub fn finish(self) -> Result<Report, AggregateError> {
        let mut builders: Vec<_> = self.packages.into_values().collect();
        builders.sort_by_key(PackageBuilder::first_index);

        let mut counts = Counts::default();
        let mut packages = Vec::with_capacity(builders.len());
        for builder in builders {
            let package = builder.finish()?;
            debug!(
                "assembled package `{}`: {} tests ({} passed, {} failed, {} skipped)",
                package.name,
                package.counts.total,
                package.counts.pass,
                package.counts.fail,
                package.counts.skip,
            );
            counts += &package.counts;
            packages.push(package);
        }

        Ok(Report {
            created_at: self.created_at,
            counts,
            packages,
        })
    }
}

impl Default for ReportAssembler {
    fn default() -> Self {
        Self::new()
    }
}
