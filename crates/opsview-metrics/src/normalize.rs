// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Unit normalization for raw performance data values.
//!
//! Opsview reports every performance value as a string with an optional unit
//! suffix (`"120ms"`, `"0.5s"`, `"1024bps"`, `"45%"`, `"17c"`). This module turns
//! those strings into typed field values. A value whose numeric body does not
//! parse is kept as the original string instead of failing the record.

use derive_more::Display;

/// A field value after unit normalization.
#[derive(Clone, Debug, Display, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    /// The raw input, kept verbatim because its numeric body did not parse.
    Raw(String),
}

impl FieldValue {
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        !matches!(self, FieldValue::Raw(_))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

/// Normalizes a raw performance value.
///
/// Rules are tested in order and the first match decides how the value is read:
///
/// | condition            | stripped | parsed as |
/// |----------------------|----------|-----------|
/// | contains `"ms"`      | `"ms"`   | float     |
/// | ends with `"bps"`    | `"bps"`  | integer   |
/// | contains `"s"`       | `"s"`    | float     |
/// | contains `"%"`       | `"%"`    | float     |
/// | ends with `"c"`      | `"c"`    | float     |
/// | otherwise            | nothing  | float     |
///
/// The `bps` suffix is tested before the bare `s` rule, so `"2048bps"` reads as the integer
/// 2048 rather than as a seconds value that fails to parse.
///
/// Every occurrence of the unit is removed, not only the trailing one. When the
/// remainder does not parse, the original string is returned as [`FieldValue::Raw`].
///
/// # Examples
///
/// ```
/// use opsview_metrics::normalize::{normalize, FieldValue};
///
/// assert_eq!(normalize("120ms"), FieldValue::Float(120.0));
/// assert_eq!(normalize("2048bps"), FieldValue::Integer(2048));
/// assert_eq!(normalize("OK"), FieldValue::Raw("OK".to_string()));
/// ```
#[must_use]
pub fn normalize(raw: &str) -> FieldValue {
    let parsed = if raw.contains("ms") {
        parse_float(&raw.replace("ms", ""))
    } else if raw.ends_with("bps") {
        parse_integer(&raw.replace("bps", ""))
    } else if raw.contains('s') {
        parse_float(&raw.replace('s', ""))
    } else if raw.contains('%') {
        parse_float(&raw.replace('%', ""))
    } else if raw.ends_with('c') {
        parse_float(&raw.replace('c', ""))
    } else {
        parse_float(raw)
    };

    parsed.unwrap_or_else(|| FieldValue::Raw(raw.to_string()))
}

fn parse_float(body: &str) -> Option<FieldValue> {
    body.trim().parse::<f64>().ok().map(FieldValue::Float)
}

fn parse_integer(body: &str) -> Option<FieldValue> {
    body.trim().parse::<i64>().ok().map(FieldValue::Integer)
}
