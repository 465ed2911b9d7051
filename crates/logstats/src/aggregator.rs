// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

//! Single-pass aggregation of decoded records into per-handler stats.

use hashbrown::HashMap;

use crate::errors::ReadError;
use crate::record::LogRecord;

/// Accumulated figures for one handler.
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerStats {
    /// Number of records folded in. At least 1 for any handler present.
    pub count: u64,
    /// Sum of the observed response times, in seconds.
    pub total_time: f64,
    first_seen: u64,
}

/// Per-handler statistics for one report run.
///
/// The order in which handlers were first observed is remembered so
/// report rows can break ties by first encounter.
#[derive(Debug, Default)]
pub struct AggregateStats {
    entries: HashMap<String, HandlerStats>,
}

impl AggregateStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation into the handler's stats.
    pub fn observe(&mut self, handler: String, response_time: f64) {
        let first_seen = self.entries.len() as u64;
        let entry = self.entries.entry(handler).or_insert(HandlerStats {
            count: 0,
            total_time: 0.0,
            first_seen,
        });
        entry.count += 1;
        entry.total_time += response_time;
    }

    pub fn get(&self, handler: &str) -> Option<&HandlerStats> {
        self.entries.get(handler)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the stats, returning `(handler, stats)` pairs in the
    /// order the handlers were first observed.
    pub fn into_entries(self) -> Vec<(String, HandlerStats)> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_unstable_by_key(|(_, stats)| stats.first_seen);
        entries
    }
}

/// Folds a record stream into per-handler stats in one forward pass.
///
/// With `filter_date` set, a record only counts when its timestamp starts
/// with that exact text. This is a literal prefix test, not calendar-date
/// equality, and a record without a timestamp never matches. Records
/// missing `url` or `response_time` are skipped, filtered or not. The
/// first read error ends the pass and is returned as-is.
pub fn aggregate<I>(records: I, filter_date: Option<&str>) -> Result<AggregateStats, ReadError>
where
    I: IntoIterator<Item = Result<LogRecord, ReadError>>,
{
    let mut stats = AggregateStats::new();
    for record in records {
        let record = record?;
        if let Some(date) = filter_date {
            match record.timestamp.as_deref() {
                Some(timestamp) if timestamp.starts_with(date) => {}
                _ => continue,
            }
        }
        let (Some(url), Some(response_time)) = (record.url, record.response_time) else {
            continue;
        };
        stats.observe(url, response_time);
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn record(
        timestamp: Option<&str>,
        url: Option<&str>,
        response_time: Option<f64>,
    ) -> Result<LogRecord, ReadError> {
        Ok(LogRecord {
            timestamp: timestamp.map(str::to_string),
            url: url.map(str::to_string),
            response_time,
        })
    }

    #[test]
    fn test_aggregates_counts_and_totals_per_handler() {
        let records = vec![
            record(Some("2025-06-22T10:00:00+00:00"), Some("/api/context"), Some(0.024)),
            record(Some("2025-06-22T10:00:01+00:00"), Some("/api/homeworks"), Some(0.06)),
            record(Some("2025-06-22T10:00:02+00:00"), Some("/api/context"), Some(0.02)),
        ];
        let stats = aggregate(records, None).unwrap();
        assert_eq!(stats.len(), 2);
        let context = stats.get("/api/context").unwrap();
        assert_eq!(context.count, 2);
        assert!((context.total_time - 0.044).abs() < 1e-9);
        assert_eq!(stats.get("/api/homeworks").unwrap().count, 1);
    }

    #[test]
    fn test_date_filter_keeps_matching_days_only() {
        let records = vec![
            record(Some("2025-06-22T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
            record(Some("2025-06-23T10:00:00+00:00"), Some("/api/a"), Some(0.2)),
        ];
        let stats = aggregate(records, Some("2025-06-22")).unwrap();
        assert_eq!(stats.get("/api/a").unwrap().count, 1);
    }

    #[test]
    fn test_date_filter_is_a_literal_prefix_test() {
        let records = vec![
            record(Some("2025-06-20T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
            record(Some("2025-06-22T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
            record(Some("2025-06-29T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
            record(Some("2025-07-22T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
        ];
        // "2025-06-2" matches every day of 2025-06-2X
        let stats = aggregate(records, Some("2025-06-2")).unwrap();
        assert_eq!(stats.get("/api/a").unwrap().count, 3);
    }

    #[test]
    fn test_date_filter_excludes_records_without_timestamp() {
        let records = vec![
            record(None, Some("/api/a"), Some(0.1)),
            record(Some("2025-06-22T10:00:00+00:00"), Some("/api/a"), Some(0.2)),
        ];
        let stats = aggregate(records, Some("2025-06-22")).unwrap();
        assert_eq!(stats.get("/api/a").unwrap().count, 1);
    }

    #[test]
    fn test_unfiltered_run_ignores_timestamps_entirely() {
        let records = vec![record(None, Some("/api/a"), Some(0.1))];
        let stats = aggregate(records, None).unwrap();
        assert_eq!(stats.get("/api/a").unwrap().count, 1);
    }

    #[test]
    fn test_records_missing_url_or_response_time_are_skipped() {
        let records = vec![
            record(Some("2025-06-22T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
            record(Some("2025-06-22T10:00:01+00:00"), None, Some(0.2)),
            record(Some("2025-06-22T10:00:02+00:00"), Some("/api/b"), None),
        ];
        let stats = aggregate(records, None).unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.get("/api/a").unwrap().count, 1);
    }

    #[test]
    fn test_read_error_stops_the_pass() {
        let records = vec![
            record(Some("2025-06-22T10:00:00+00:00"), Some("/api/a"), Some(0.1)),
            Err(ReadError::Read {
                path: "access.log".into(),
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "truncated"),
            }),
        ];
        let error = aggregate(records, None).err().unwrap();
        assert!(matches!(error, ReadError::Read { .. }));
    }

    #[test]
    fn test_empty_stream_yields_empty_stats() {
        let stats = aggregate(Vec::new(), None).unwrap();
        assert!(stats.is_empty());
    }

    #[test]
    fn test_entries_come_out_in_first_seen_order() {
        let mut stats = AggregateStats::new();
        stats.observe("/api/c".to_string(), 0.1);
        stats.observe("/api/a".to_string(), 0.2);
        stats.observe("/api/b".to_string(), 0.3);
        stats.observe("/api/a".to_string(), 0.4);
        let handlers: Vec<String> = stats
            .into_entries()
            .into_iter()
            .map(|(handler, _)| handler)
            .collect();
        assert_eq!(handlers, ["/api/c", "/api/a", "/api/b"]);
    }
}
