// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `gotest-xml`: turns the flat event stream printed by `go test -json`
//! into a package → test hierarchy with counts and timing.
//!
//! The basic flow is:
//!
//! 1. [`reader::EventReader`] decodes JSON records and assigns each a sequence index.
//! 2. [`events::classify_action`] gives each record a [`PhaseKind`](events::PhaseKind).
//! 3. [`report::ReportAssembler`] groups records by package and test, builds
//!    [`report::TestPackage`] and [`report::TestUnit`] values, and produces a [`report::Report`].
//! 4. [`report::Report::write_to_path`] serializes the report as XML.

pub mod config;
pub mod errors;
pub mod events;
pub mod exit_codes;
pub mod reader;
pub mod report;
mod serialize;
pub mod time;
