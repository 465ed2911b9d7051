// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

use std::io;
use std::path::PathBuf;

/// Errors raised while reading log files.
///
/// Only file access can fail. Malformed records are dropped inside the
/// reader and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The log file could not be opened.
    #[error("failed to open log file {}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The log file stopped being readable mid-stream.
    #[error("failed to read log file {}", path.display())]
    Read { path: PathBuf, source: io::Error },
}
