// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timing resolution for tests and packages.
//!
//! `go test -json` stamps a concluding record with the time it was printed and the number of
//! seconds the test ran for. The reported start time is reconstructed by *adding* the elapsed
//! duration to that timestamp.

use crate::errors::TimingError;
use chrono::{DateTime, FixedOffset, TimeDelta};
use std::{fmt, time::Duration};

/// Start, end and duration derived from a concluding record.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ResolvedTiming {
    /// The reconstructed start time: `end + duration`.
    pub start: DateTime<FixedOffset>,

    /// The timestamp of the concluding record.
    pub end: DateTime<FixedOffset>,

    /// The elapsed duration.
    pub duration: Duration,
}

impl ResolvedTiming {
    /// Resolves timing from a completion timestamp and an elapsed value in seconds.
    ///
    /// A zero elapsed value is valid and yields `start == end`.
    pub fn resolve(timestamp: DateTime<FixedOffset>, elapsed: f64) -> Result<Self, TimingError> {
        let duration = elapsed_to_duration(elapsed)?;
        let delta = TimeDelta::from_std(duration)
            .map_err(|_| TimingError::OutOfRange { timestamp, elapsed })?;
        let start = timestamp
            .checked_add_signed(delta)
            .ok_or(TimingError::OutOfRange { timestamp, elapsed })?;

        Ok(Self {
            start,
            end: timestamp,
            duration,
        })
    }

    /// Returns a display adapter for the start time, with millisecond precision.
    pub fn start_time(&self) -> DisplayClockTime {
        DisplayClockTime(self.start)
    }

    /// Returns a display adapter for the end time, with millisecond precision.
    pub fn end_time(&self) -> DisplayClockTime {
        DisplayClockTime(self.end)
    }

    /// Returns a human-readable rendering of the duration, e.g. `1s 500ms`.
    pub fn display_duration(&self) -> humantime::FormattedDuration {
        humantime::format_duration(self.duration)
    }
}

fn elapsed_to_duration(elapsed: f64) -> Result<Duration, TimingError> {
    // Rounding to the nearest nanosecond keeps values such as 0.29 from printing as 289.999999ms.
    let nanos = (elapsed * 1e9).round();
    if !nanos.is_finite() || nanos < 0.0 || nanos > u64::MAX as f64 {
        return Err(TimingError::InvalidElapsed { elapsed });
    }
    Ok(Duration::from_nanos(nanos as u64))
}

/// Displays the wall-clock part of a timestamp as `HH:MM:SS.mmm`.
#[derive(Copy, Clone, Debug)]
pub struct DisplayClockTime(pub DateTime<FixedOffset>);

impl fmt::Display for DisplayClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S%.3f"))
    }
}
