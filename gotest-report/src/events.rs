// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Events read from a `go test -json` stream, and their classification into phases.

use crate::errors::{ActionParseError, UnknownActionError};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// A single record exactly as printed by `go test -json` (or `go tool test2json`).
///
/// Fields other than `Action` may be absent. Unknown fields are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTestEvent {
    /// The action label, e.g. `run`, `output` or `pass`.
    pub action: String,

    /// The import path of the package. Empty for some build-level records.
    #[serde(default)]
    pub package: String,

    /// The test name. Empty for package-level records.
    #[serde(default)]
    pub test: String,

    /// A fragment of output, usually a single line including its trailing newline.
    #[serde(default)]
    pub output: String,

    /// Elapsed seconds. Present on `pass`, `fail` and `skip` records.
    #[serde(default)]
    pub elapsed: Option<f64>,

    /// The time the record was produced.
    #[serde(default)]
    pub time: Option<DateTime<FixedOffset>>,
}

/// The phase of a test that an event describes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum PhaseKind {
    /// The test started running.
    Start,

    /// The test concluded with a pass, fail or skip.
    End,

    /// Anything in between: output, pausing, continuing and benchmark results.
    InProgress,
}

/// The fixed vocabulary of action labels.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    /// `run`
    Run,
    /// `pass`
    Pass,
    /// `fail`
    Fail,
    /// `skip`
    Skip,
    /// `output`
    Output,
    /// `pause`
    Pause,
    /// `cont`
    Cont,
    /// `bench`
    Bench,
}

impl Action {
    /// Returns the list of recognized labels.
    pub fn variants() -> &'static [&'static str] {
        &["run", "pass", "fail", "skip", "output", "pause", "cont", "bench"]
    }

    /// Returns the label for this action.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Run => "run",
            Action::Pass => "pass",
            Action::Fail => "fail",
            Action::Skip => "skip",
            Action::Output => "output",
            Action::Pause => "pause",
            Action::Cont => "cont",
            Action::Bench => "bench",
        }
    }

    /// Returns the phase this action belongs to.
    pub fn phase(self) -> PhaseKind {
        match self {
            Action::Run => PhaseKind::Start,
            Action::Pass | Action::Fail | Action::Skip => PhaseKind::End,
            Action::Output | Action::Pause | Action::Cont | Action::Bench => PhaseKind::InProgress,
        }
    }

    /// Returns the terminal outcome for end-phase actions, and `None` otherwise.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Action::Pass => Some(Outcome::Pass),
            Action::Fail => Some(Outcome::Fail),
            Action::Skip => Some(Outcome::Skip),
            Action::Run | Action::Output | Action::Pause | Action::Cont | Action::Bench => None,
        }
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim() {
            "run" => Action::Run,
            "pass" => Action::Pass,
            "fail" => Action::Fail,
            "skip" => Action::Skip,
            "output" => Action::Output,
            "pause" => Action::Pause,
            "cont" => Action::Cont,
            "bench" => Action::Bench,
            _ => return Err(ActionParseError::new(s)),
        };
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies an action label into its phase.
///
/// Surrounding whitespace is ignored. Labels outside the vocabulary, including the empty string,
/// are rejected.
pub fn classify_action(label: &str) -> Result<PhaseKind, ActionParseError> {
    label.parse::<Action>().map(Action::phase)
}

/// How a test concluded.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    /// The test passed.
    Pass,
    /// The test failed.
    Fail,
    /// The test was skipped.
    Skip,
}

impl Outcome {
    /// Returns the action label corresponding to this outcome.
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail => "fail",
            Outcome::Skip => "skip",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified event, tagged with the position it had in the input stream.
#[derive(Clone, Debug, PartialEq)]
pub struct TestEvent {
    /// The sequence index: unique and strictly increasing in ingestion order.
    pub index: usize,

    /// The recognized action.
    pub action: Action,

    /// The package this event belongs to.
    pub package: String,

    /// The test name, or empty for package-level events.
    pub test: String,

    /// The output fragment carried by this event.
    pub output: String,

    /// Elapsed seconds, if present.
    pub elapsed: Option<f64>,

    /// The time the event was produced, if present.
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl TestEvent {
    /// Classifies a raw record, giving it the supplied sequence index.
    pub fn classify(index: usize, raw: RawTestEvent) -> Result<Self, UnknownActionError> {
        let RawTestEvent {
            action,
            package,
            test,
            output,
            elapsed,
            time,
        } = raw;

        let action = action
            .parse::<Action>()
            .map_err(|err| UnknownActionError::new(index, err))?;

        Ok(Self {
            index,
            action,
            package,
            test,
            output,
            elapsed,
            timestamp: time,
        })
    }

    /// Returns the phase this event belongs to.
    #[inline]
    pub fn phase(&self) -> PhaseKind {
        self.action.phase()
    }

    /// Returns true if this event has no test name and so describes the package itself.
    #[inline]
    pub fn is_package_level(&self) -> bool {
        self.test.is_empty()
    }
}
