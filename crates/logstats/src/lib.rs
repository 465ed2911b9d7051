// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

//! Memory-bounded reporting over newline-delimited JSON access logs.
//!
//! The pipeline has three stages, each lazy where it can be:
//! - [`reader`] streams decoded records out of log files, buffering raw
//!   lines in chunks sized from the machine's available memory
//!   ([`memory`]), so files of any size fit in a bounded budget.
//! - [`aggregator`] folds the record stream into per-handler statistics
//!   in a single forward pass.
//! - [`report`] renders those statistics as an aligned text table.
//!
//! Logs are diagnostics, not output: the rendered report is returned as a
//! string and never printed from inside this crate.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

/// Single-pass aggregation of records into per-handler statistics.
pub mod aggregator;

/// Chunk sizing tunables.
pub mod constants;

/// Error types for log file access.
pub mod errors;

/// Available-memory probes, one per supported platform.
pub mod memory;

/// Chunked, memory-bounded log file reading.
pub mod reader;

/// The decoded shape of one access-log line.
pub mod record;

/// Report row construction and table rendering.
pub mod report;
