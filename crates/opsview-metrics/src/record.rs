// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Opsview log records and the tag/field extraction applied to them.

use crate::errors::ParseError;
use crate::normalize::normalize;
use crate::point::{Fields, Tags};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field name InfluxDB reserves for the point timestamp.
pub const RESERVED_FIELD: &str = "time";

/// Message attributes that describe what a `time` perf value measures, in order of preference.
pub const TIME_FIELD_PREFERENCES: [&str; 3] = ["execution_time", "response_time", "poll_time"];

/// Name given to a `time` perf value when the message carries none of [`TIME_FIELD_PREFERENCES`].
pub const DEFAULT_TIME_FIELD: &str = "duration";

/// One line of the input file.
#[derive(Clone, Debug, Deserialize)]
pub struct LogEntry {
    pub message: Message,
    /// Free-form status line; the second and third tokens are the check date and time.
    #[serde(default)]
    pub info: Option<String>,
}

impl LogEntry {
    pub fn from_line(line: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(line)?)
    }
}

/// The check result carried by a [`LogEntry`].
#[derive(Clone, Debug, Deserialize)]
pub struct Message {
    pub hostname: String,
    #[serde(default)]
    pub servicecheckname: Option<String>,
    #[serde(default)]
    pub metadata: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub perf_data: Option<Value>,
    /// Every other top level attribute of the message.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Message {
    /// Returns true if the message has a top level attribute with this name.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "hostname" => true,
            "servicecheckname" => self.servicecheckname.is_some(),
            "metadata" => self.metadata.is_some(),
            "perf_data" => self.perf_data.is_some(),
            _ => self.attributes.contains_key(name),
        }
    }
}

/// Derives the tags and fields of a point from a check result.
///
/// Tags are the hostname, the service check name when it is set, and every metadata pair.
/// Fields are the normalized `perf_data` values in document order; a later key overwrites an
/// earlier one with the same name. A `time` key is renamed with [`field_name`] first.
pub fn extract(message: &Message) -> Result<(Tags, Fields), ParseError> {
    let perf_data = match &message.perf_data {
        Some(Value::Object(perf_data)) => perf_data,
        _ => return Err(ParseError::MissingPerfData),
    };

    let mut tags = Tags::new();
    tags.insert("hostname".to_string(), message.hostname.clone());
    if let Some(check) = message.servicecheckname.as_deref() {
        if !check.is_empty() {
            tags.insert("servicecheckname".to_string(), check.to_string());
        }
    }
    if let Some(metadata) = &message.metadata {
        for (key, value) in metadata {
            tags.insert(key.clone(), value.clone());
        }
    }

    let mut fields = Fields::new();
    for (key, value) in perf_data {
        let Value::String(raw) = value else {
            return Err(ParseError::InvalidPerfValue(key.clone()));
        };
        fields.insert(field_name(key, message).to_string(), normalize(raw));
    }

    Ok((tags, fields))
}

/// Resolves the field name for a perf data key, renaming the reserved `time` key.
#[must_use]
pub fn field_name<'a>(key: &'a str, message: &Message) -> &'a str {
    if key != RESERVED_FIELD {
        return key;
    }
    TIME_FIELD_PREFERENCES
        .into_iter()
        .find(|label| message.has_attribute(label))
        .unwrap_or(DEFAULT_TIME_FIELD)
}
