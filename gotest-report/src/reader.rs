// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoding a `go test -json` byte stream into classified events.

use crate::{
    errors::{BuildReportError, ReadEventError},
    events::{RawTestEvent, TestEvent},
};
use serde_json::{Deserializer, StreamDeserializer, de::IoRead};
use std::io::{self, BufReader};

/// An iterator over the events in a `go test -json` stream.
///
/// Records are concatenated JSON objects, usually one per line. Each is assigned the next
/// sequence index, starting from 0, and classified. Iteration stops after the first error.
pub struct EventReader<R: io::Read> {
    stream: StreamDeserializer<'static, IoRead<BufReader<R>>, RawTestEvent>,
    next_index: usize,
    done: bool,
}

impl<R: io::Read> EventReader<R> {
    /// Creates a new reader over `reader`. The reader is buffered internally.
    pub fn new(reader: R) -> Self {
        Self {
            stream: Deserializer::from_reader(BufReader::new(reader)).into_iter(),
            next_index: 0,
            done: false,
        }
    }

    /// Returns the number of records read so far.
    pub fn records_read(&self) -> usize {
        self.next_index
    }

    fn classify_next(
        &mut self,
        raw: Result<RawTestEvent, serde_json::Error>,
    ) -> Result<TestEvent, BuildReportError> {
        let index = self.next_index;
        let raw = raw.map_err(|err| ReadEventError::new(index, err))?;
        self.next_index += 1;
        Ok(TestEvent::classify(index, raw)?)
    }
}

impl<R: io::Read> Iterator for EventReader<R> {
    type Item = Result<TestEvent, BuildReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let raw = self.stream.next()?;
        let result = self.classify_next(raw);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
