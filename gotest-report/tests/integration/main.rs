// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests: full `go test -json` transcripts through reading, assembly and writing.

mod fixtures;
mod pipeline;
mod write;
