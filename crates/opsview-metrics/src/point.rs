// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::errors::ParseError;
use crate::normalize::FieldValue;
use crate::record::{extract, LogEntry};
use chrono::DateTime;
use std::collections::BTreeMap;

/// Measurement every Opsview check result is written to.
pub const MEASUREMENT: &str = "opsview_metrics";

pub type Tags = BTreeMap<String, String>;
pub type Fields = BTreeMap<String, FieldValue>;

/// One timestamped observation, ready to be written.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    measurement: String,
    tags: Tags,
    fields: Fields,
    /// Nanoseconds since the Unix epoch.
    timestamp: i64,
}

impl Point {
    #[must_use]
    pub fn new(measurement: &str, tags: Tags, fields: Fields, timestamp: i64) -> Self {
        Point {
            measurement: measurement.to_string(),
            tags,
            fields,
            timestamp,
        }
    }

    /// Converts a parsed log entry into a point in the [`MEASUREMENT`] measurement.
    pub fn from_entry(entry: &LogEntry) -> Result<Self, ParseError> {
        let (tags, fields) = extract(&entry.message)?;
        assemble(MEASUREMENT, tags, fields, entry.info.as_deref())
    }

    #[must_use]
    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    #[must_use]
    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

/// Combines extracted tags and fields with the timestamp carried by `info`.
pub fn assemble(
    measurement: &str,
    tags: Tags,
    fields: Fields,
    info: Option<&str>,
) -> Result<Point, ParseError> {
    let timestamp = parse_timestamp(info.unwrap_or_default())?;
    Ok(Point::new(measurement, tags, fields, timestamp))
}

/// Reads the check time out of an Opsview `info` line.
///
/// The second and third whitespace separated tokens are the UTC date and time of the check,
/// e.g. `"OK 2024-01-01 12:30:00.125 ..."`. They are joined as `<date>T<time>Z` and parsed as an
/// RFC 3339 instant. Returns nanoseconds since the Unix epoch.
pub fn parse_timestamp(info: &str) -> Result<i64, ParseError> {
    let malformed = || ParseError::MalformedTimestamp(info.to_string());

    let mut tokens = info.split_whitespace().skip(1);
    let (Some(date), Some(time)) = (tokens.next(), tokens.next()) else {
        return Err(malformed());
    };

    DateTime::parse_from_rfc3339(&format!("{date}T{time}Z"))
        .ok()
        .and_then(|instant| instant.timestamp_nanos_opt())
        .ok_or_else(malformed)
}
