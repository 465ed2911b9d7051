// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

//! Chunked, memory-bounded reading of newline-delimited JSON log files.
//!
//! [`LogReader`] pulls raw lines off disk until roughly one chunk's worth
//! of bytes is buffered, decodes the whole chunk, then hands records out
//! one at a time. The chunk size is a slice of the machine's available
//! memory, so files of any size stream through a bounded buffer.
//! [`MultiFileReader`] chains several files into one stream, keeping at
//! most one file open at a time.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::constants::{CHUNK_MEMORY_FRACTION, CHUNK_SIZE_DEFAULT, CHUNK_SIZE_MAX_FACTOR};
use crate::errors::ReadError;
use crate::memory;
use crate::record::LogRecord;

/// Derives a chunk size in bytes from an available-memory figure.
///
/// Unknown memory falls back to [`CHUNK_SIZE_DEFAULT`]. Otherwise the
/// chunk is a fraction of the reported memory, clamped so small machines
/// still buffer at least the default and large machines never buffer more
/// than [`CHUNK_SIZE_MAX_FACTOR`] times it.
pub fn chunk_size_bytes(available_memory: Option<u64>) -> usize {
    let Some(available) = available_memory else {
        return CHUNK_SIZE_DEFAULT;
    };
    let target = (available as f64 * CHUNK_MEMORY_FRACTION) as u64;
    let floor = CHUNK_SIZE_DEFAULT as u64;
    let ceiling = (CHUNK_SIZE_DEFAULT * CHUNK_SIZE_MAX_FACTOR) as u64;
    target.clamp(floor, ceiling) as usize
}

/// Chunk size for this machine right now, probing available memory.
pub fn adaptive_chunk_size() -> usize {
    let chunk_size = chunk_size_bytes(memory::available_memory_bytes());
    trace!("resolved a chunk size of {chunk_size} bytes");
    chunk_size
}

/// Lazily yields decoded records from one log file.
///
/// Blank lines are skipped and lines that fail to decode are dropped, so
/// the stream only ever carries well-formed records. The file stays open
/// exactly as long as the reader is alive. After yielding a read error
/// the reader is exhausted.
pub struct LogReader {
    path: PathBuf,
    lines: io::Lines<BufReader<File>>,
    chunk_size: usize,
    buffer: Vec<String>,
    buffered_bytes: usize,
    decoded: VecDeque<LogRecord>,
    eof: bool,
    failed: bool,
}

impl LogReader {
    /// Opens `path` for reading. A missing or unreadable file fails here;
    /// nothing is read from disk until the first record is pulled.
    pub fn open(path: impl AsRef<Path>, chunk_size: usize) -> Result<Self, ReadError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| ReadError::Open {
            path: path.clone(),
            source,
        })?;
        debug!(
            "reading {} with a {chunk_size} byte chunk buffer",
            path.display()
        );
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            // a zero chunk would never make progress
            chunk_size: chunk_size.max(1),
            buffer: Vec::new(),
            buffered_bytes: 0,
            decoded: VecDeque::new(),
            eof: false,
            failed: false,
        })
    }

    /// Reads lines until one chunk's worth of bytes is buffered or the
    /// file ends, then decodes the buffer into the record queue.
    fn fill_chunk(&mut self) -> Result<(), ReadError> {
        while self.buffered_bytes < self.chunk_size {
            match self.lines.next() {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    // the byte length is what bounds buffered memory
                    self.buffered_bytes += line.len();
                    self.buffer.push(line);
                }
                Some(Err(source)) => {
                    self.failed = true;
                    return Err(ReadError::Read {
                        path: self.path.clone(),
                        source,
                    });
                }
                None => {
                    self.eof = true;
                    break;
                }
            }
        }
        self.flush_buffer();
        Ok(())
    }

    /// Decodes every buffered line in order, dropping the ones that are
    /// not valid records.
    fn flush_buffer(&mut self) {
        for line in self.buffer.drain(..) {
            match serde_json::from_str::<LogRecord>(&line) {
                Ok(record) => self.decoded.push_back(record),
                Err(error) => trace!("dropping undecodable log line: {error}"),
            }
        }
        self.buffered_bytes = 0;
    }
}

impl Iterator for LogReader {
    type Item = Result<LogRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.decoded.pop_front() {
                return Some(Ok(record));
            }
            if self.eof || self.failed {
                return None;
            }
            if let Err(error) = self.fill_chunk() {
                return Some(Err(error));
            }
        }
    }
}

/// Chains the records of several log files into one lazy stream.
///
/// Files are read strictly in the order given, and a file is opened only
/// once its predecessor is exhausted, so at most one chunk buffer is ever
/// live. Each file's chunk size is derived from available memory at the
/// moment that file is opened. A failed open or read ends the stream
/// right after the error is yielded.
pub struct MultiFileReader {
    paths: std::vec::IntoIter<PathBuf>,
    current: Option<LogReader>,
    chunk_size: Option<usize>,
    failed: bool,
}

impl MultiFileReader {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            paths: paths.into_iter(),
            current: None,
            chunk_size: None,
            failed: false,
        }
    }

    /// Like [`MultiFileReader::new`] but with a fixed chunk size for
    /// every file instead of the adaptive one.
    pub fn with_chunk_size(paths: Vec<PathBuf>, chunk_size: usize) -> Self {
        Self {
            paths: paths.into_iter(),
            current: None,
            chunk_size: Some(chunk_size),
            failed: false,
        }
    }
}

impl Iterator for MultiFileReader {
    type Item = Result<LogRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(reader) = self.current.as_mut() {
                match reader.next() {
                    Some(Ok(record)) => return Some(Ok(record)),
                    Some(Err(error)) => {
                        self.failed = true;
                        return Some(Err(error));
                    }
                    None => self.current = None,
                }
            }
            let Some(path) = self.paths.next() else {
                return None;
            };
            let chunk_size = self.chunk_size.unwrap_or_else(adaptive_chunk_size);
            match LogReader::open(&path, chunk_size) {
                Ok(reader) => self.current = Some(reader),
                Err(error) => {
                    self.failed = true;
                    return Some(Err(error));
                }
            }
        }
    }
}
