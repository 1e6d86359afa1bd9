// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! InfluxDB line protocol encoding.
//!
//! ```text
//! opsview_metrics,hostname=web01,servicecheckname=HTTP duration=0.12,size=512i 1704067200000000000
//! ```

use crate::normalize::FieldValue;
use crate::point::Point;
use std::fmt::Write;

/// Encodes one point as a line, without the trailing newline.
///
/// Returns `None` when the point has no field that can be written: a line without fields is
/// rejected by the server, so such points are dropped here. Non-finite floats cannot be
/// represented and are skipped, as are tags with an empty key or value.
#[must_use]
pub fn encode_point(point: &Point) -> Option<String> {
    let mut fields = String::new();
    for (key, value) in point.fields() {
        if key.is_empty() {
            continue;
        }
        let mut encoded = String::new();
        match value {
            FieldValue::Float(v) if !v.is_finite() => continue,
            FieldValue::Float(v) => {
                let _ = write!(encoded, "{v}");
            }
            FieldValue::Integer(v) => {
                let _ = write!(encoded, "{v}i");
            }
            FieldValue::Raw(v) => {
                encoded.push('"');
                escape_string(&mut encoded, v);
                encoded.push('"');
            }
        }
        if !fields.is_empty() {
            fields.push(',');
        }
        escape_key(&mut fields, key);
        fields.push('=');
        fields.push_str(&encoded);
    }
    if fields.is_empty() {
        return None;
    }

    let mut line = String::with_capacity(fields.len() + 64);
    escape_measurement(&mut line, point.measurement());
    for (key, value) in point.tags() {
        if key.is_empty() || value.is_empty() {
            continue;
        }
        line.push(',');
        escape_key(&mut line, key);
        line.push('=');
        escape_key(&mut line, value);
    }
    line.push(' ');
    line.push_str(&fields);
    let _ = write!(line, " {}", point.timestamp());
    Some(line)
}

/// Encodes a batch as a newline separated request body.
///
/// Returns the body and the number of lines it holds.
#[must_use]
pub fn encode_batch(points: &[Point]) -> (String, usize) {
    let mut body = String::new();
    let mut lines = 0;
    for line in points.iter().filter_map(encode_point) {
        if lines > 0 {
            body.push('\n');
        }
        body.push_str(&line);
        lines += 1;
    }
    (body, lines)
}

fn escape_measurement(out: &mut String, value: &str) {
    escape_unquoted(out, value, &[',', ' ']);
}

/// Escaping shared by tag keys, tag values and field keys.
fn escape_key(out: &mut String, value: &str) {
    escape_unquoted(out, value, &['\\', ',', '=', ' ']);
}

fn escape_unquoted(out: &mut String, value: &str, special: &[char]) {
    for c in value.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

/// Inside a quoted string field value only `"` and `\` are escaped.
fn escape_string(out: &mut String, value: &str) {
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
}
