// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Counts, TestUnit, TestUnitBuilder};
use crate::{
    errors::{AggregateError, UnitKey},
    events::{Outcome, PhaseKind, TestEvent},
    time::ResolvedTiming,
};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;

/// A package: its own output and status, plus every test seen for it.
#[derive(Clone, Debug, PartialEq)]
pub struct TestPackage {
    /// The package import path.
    pub name: String,

    /// Output from package-level events (those without a test name), in arrival order.
    pub output: String,

    /// The package-level outcome, if the package concluded.
    pub outcome: Option<Outcome>,

    /// The timestamp of the package-level concluding event, if any.
    pub timestamp: Option<DateTime<FixedOffset>>,

    /// The most recent elapsed value reported at package level, if any.
    pub elapsed: Option<f64>,

    /// Timing, resolved when both a timestamp and an elapsed value are known.
    pub timing: Option<ResolvedTiming>,

    /// Counts over this package's tests.
    pub counts: Counts,

    /// The tests in this package, ordered by when each started.
    pub units: Vec<TestUnit>,

    index: usize,
}

impl TestPackage {
    /// Returns the sequence index of the first event seen for this package.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Folds all events for one package into a [`TestPackage`].
///
/// Events with a test name are grouped per test and handed to [`TestUnitBuilder`]; the rest are
/// accumulated into the package itself.
#[derive(Clone, Debug)]
pub struct PackageBuilder {
    name: String,
    first_index: Option<usize>,
    output: String,
    outcome: Option<Outcome>,
    timestamp: Option<DateTime<FixedOffset>>,
    elapsed: Option<f64>,
    tests: HashMap<String, Vec<TestEvent>>,
}

impl PackageBuilder {
    /// Creates a builder for the given package.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            first_index: None,
            output: String::new(),
            outcome: None,
            timestamp: None,
            elapsed: None,
            tests: HashMap::new(),
        }
    }

    /// Returns the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the sequence index of the first event added, if any.
    pub fn first_index(&self) -> Option<usize> {
        self.first_index
    }

    /// Adds the next event for this package. Events must be supplied in arrival order.
    pub fn add_event(&mut self, event: TestEvent) {
        debug_assert_eq!(event.package, self.name, "event routed to the wrong package");
        self.first_index.get_or_insert(event.index);

        if !event.is_package_level() {
            self.tests
                .entry(event.test.clone())
                .or_default()
                .push(event);
            return;
        }

        self.output.push_str(&event.output);
        if event.phase() == PhaseKind::End {
            self.outcome = event.action.outcome();
            self.timestamp = event.timestamp;
        }
        if let Some(elapsed) = event.elapsed {
            self.elapsed = Some(elapsed);
        }
    }

    /// Builds every test unit and the package record.
    ///
    /// Tests are built in the order they were first seen, so that the first broken test in the
    /// stream is the one reported.
    pub fn finish(self) -> Result<TestPackage, AggregateError> {
        let Self {
            name,
            first_index,
            output,
            outcome,
            timestamp,
            elapsed,
            tests,
        } = self;

        let timing = match (timestamp, elapsed) {
            (Some(timestamp), Some(elapsed)) => Some(
                ResolvedTiming::resolve(timestamp, elapsed).map_err(|err| {
                    AggregateError::Timing {
                        key: UnitKey::package(&name),
                        err,
                    }
                })?,
            ),
            _ => None,
        };

        let mut groups: Vec<_> = tests.into_iter().collect();
        groups.sort_by_key(|(_, events)| events.first().map(|event| event.index));

        let mut counts = Counts {
            total: groups.len(),
            ..Counts::default()
        };
        let mut units = Vec::with_capacity(groups.len());
        for (test, events) in groups {
            let mut builder = TestUnitBuilder::new(name.as_str(), test);
            for event in &events {
                builder.add_event(event);
            }
            let unit = builder.finish()?;
            counts.record_unit(&unit);
            units.push(unit);
        }
        units.sort_by_key(TestUnit::index);

        Ok(TestPackage {
            name,
            output,
            outcome,
            timestamp,
            elapsed,
            timing,
            counts,
            units,
            index: first_index.unwrap_or_default(),
        })
    }
}
