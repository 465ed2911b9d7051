// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::Deserialize;

/// One decoded access-log record.
///
/// Only the fields the reports need are decoded; anything else in the raw
/// JSON object is ignored. Each field may be absent or `null` in the
/// input, so each is an `Option` and the aggregation step decides what a
/// missing value means.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Request timestamp, e.g. `2025-06-22T13:57:32+00:00`. Carried under
    /// the `@timestamp` key in the raw JSON.
    pub timestamp: Option<String>,

    /// Handler that served the request.
    pub url: Option<String>,

    /// Response time in seconds.
    pub response_time: Option<f64>,
}

/// Decodes from a JSON object only. An array or scalar line is not a
/// record, however well-typed its contents.
impl<'de> Deserialize<'de> for LogRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = LogRecord;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a JSON object with access-log fields")
            }

            fn visit_map<M>(self, mut map: M) -> Result<LogRecord, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut record = LogRecord {
                    timestamp: None,
                    url: None,
                    response_time: None,
                };
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "@timestamp" => record.timestamp = map.next_value()?,
                        "url" => record.url = map.next_value()?,
                        "response_time" => record.response_time = map.next_value()?,
                        _ => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
