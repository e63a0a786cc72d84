// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{AggregateError, UnitKey},
    events::{Action, Outcome, PhaseKind, TestEvent},
    time::ResolvedTiming,
};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// Everything reported about a single test within a package.
#[derive(Clone, Debug, PartialEq)]
pub struct TestUnit {
    /// The test name.
    pub name: String,

    /// The package the test belongs to.
    pub package: String,

    /// All output fragments for this test, concatenated in arrival order.
    pub output: String,

    /// How the test concluded.
    pub outcome: Outcome,

    /// The timestamp of the concluding event.
    pub timestamp: DateTime<FixedOffset>,

    /// Elapsed seconds reported by the concluding event.
    pub elapsed: f64,

    /// Timing derived from `timestamp` and `elapsed`.
    pub timing: ResolvedTiming,

    /// True if the test reported at least one benchmark result.
    pub bench: bool,

    index: usize,
}

impl TestUnit {
    /// Returns the sequence index this unit is ordered by: that of its `run` event, or of its
    /// first event if it was never seen starting.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug)]
struct EndRecord {
    action: Action,
    outcome: Outcome,
    elapsed: Option<f64>,
    timestamp: Option<DateTime<FixedOffset>>,
}

/// Folds the events for one (package, test) pair into a [`TestUnit`].
#[derive(Clone, Debug)]
pub struct TestUnitBuilder {
    package: String,
    name: String,
    output: String,
    start_index: Option<usize>,
    first_index: Option<usize>,
    end: Option<EndRecord>,
    bench: bool,
}

impl TestUnitBuilder {
    /// Creates a builder for the given test.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            output: String::new(),
            start_index: None,
            first_index: None,
            end: None,
            bench: false,
        }
    }

    /// Folds in the next event for this test. Events must be supplied in arrival order.
    pub fn add_event(&mut self, event: &TestEvent) {
        debug_assert_eq!(event.test, self.name, "event routed to the wrong test");

        self.first_index.get_or_insert(event.index);
        self.output.push_str(&event.output);

        match event.phase() {
            PhaseKind::Start => {
                self.start_index.get_or_insert(event.index);
            }
            PhaseKind::End => {
                let Some(outcome) = event.action.outcome() else {
                    return;
                };
                if let Some(previous) = &self.end {
                    debug!(
                        "test `{}` in package `{}` concluded again with `{}` (was `{}`)",
                        self.name, self.package, event.action, previous.action,
                    );
                }
                self.end = Some(EndRecord {
                    action: event.action,
                    outcome,
                    elapsed: event.elapsed,
                    timestamp: event.timestamp,
                });
            }
            PhaseKind::InProgress => {
                if event.action == Action::Bench {
                    self.bench = true;
                }
            }
        }
    }

    /// Finishes the unit, resolving its timing.
    ///
    /// Fails if no concluding event was seen, or if the concluding event lacked a timestamp or
    /// elapsed value.
    pub fn finish(self) -> Result<TestUnit, AggregateError> {
        let Self {
            package,
            name,
            output,
            start_index,
            first_index,
            end,
            bench,
        } = self;

        let key = || UnitKey::test(&package, &name);
        let Some(end) = end else {
            return Err(AggregateError::IncompleteTest { key: key() });
        };
        let Some(timestamp) = end.timestamp else {
            return Err(AggregateError::MissingTiming {
                key: key(),
                action: end.action,
                missing: "timestamp",
            });
        };
        let Some(elapsed) = end.elapsed else {
            return Err(AggregateError::MissingTiming {
                key: key(),
                action: end.action,
                missing: "elapsed time",
            });
        };
        let timing = ResolvedTiming::resolve(timestamp, elapsed)
            .map_err(|err| AggregateError::Timing { key: key(), err })?;

        // A concluded unit has seen at least its concluding event.
        let index = start_index.or(first_index).unwrap_or_default();

        Ok(TestUnit {
            name,
            package,
            output,
            outcome: end.outcome,
            timestamp,
            elapsed,
            timing,
            bench,
            index,
        })
    }
}
