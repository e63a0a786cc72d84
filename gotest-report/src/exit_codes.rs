// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Exit codes returned by `gotest-xml`.

/// Documented exit codes for `gotest-xml` failures.
///
/// `gotest-xml` may fail for a variety of reasons. This structure documents the exit codes that
/// may occur in case of expected failures. In every failure case, no report is written.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum GotestXmlExitCode {}

impl GotestXmlExitCode {
    /// No errors occurred and the report was written.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up the invocation, such as an invalid config file.
    pub const SETUP_ERROR: i32 = 96;

    /// The input stream could not be opened or read.
    pub const INPUT_READ_ERROR: i32 = 97;

    /// The input stream contained a record that could not be decoded, or an unknown action.
    pub const MALFORMED_STREAM: i32 = 98;

    /// The input stream was well-formed but incomplete: a test never concluded, or concluded
    /// without timing information.
    pub const INCOMPLETE_STREAM: i32 = 99;

    /// Writing the report produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
