// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

//! Tunables for the chunked log reader.

/// Chunk size in bytes used when available memory cannot be determined.
pub const CHUNK_SIZE_DEFAULT: usize = 1024 * 1024;

/// Fraction of available memory the raw-line buffer is allowed to occupy.
pub const CHUNK_MEMORY_FRACTION: f64 = 0.1;

/// The chunk size never exceeds this multiple of [`CHUNK_SIZE_DEFAULT`],
/// however much memory the machine reports.
pub const CHUNK_SIZE_MAX_FACTOR: usize = 100;
