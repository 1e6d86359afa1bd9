// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use reqwest::StatusCode;

/// Structural problems with a single input record. Any of these aborts the import.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON record: {0}")]
    MalformedRecord(#[from] serde_json::Error),

    #[error("malformed timestamp in info field: {0:?}")]
    MalformedTimestamp(String),

    #[error("perf_data is missing or is not an object")]
    MissingPerfData,

    #[error("perf_data value for {0:?} is not a string")]
    InvalidPerfValue(String),
}

/// Failures reported by a write sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("request to write endpoint failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{status}: write rejected by server: {body}")]
    Status { status: StatusCode, body: String },
}

/// Failures of the batch writer.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to write batch of {points} points: {source}")]
    Sink {
        points: usize,
        #[source]
        source: SinkError,
    },

    #[error("writer aborted after an earlier write failure")]
    Aborted,
}

/// Top level failure of an import run.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Write(#[from] WriteError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let error = ParseError::MalformedTimestamp("CHECK 2024-01-01".to_string());
        assert_eq!(
            error.to_string(),
            "malformed timestamp in info field: \"CHECK 2024-01-01\""
        );
        assert_eq!(
            ParseError::MissingPerfData.to_string(),
            "perf_data is missing or is not an object"
        );
    }

    #[test]
    fn test_sink_error_display() {
        let error = SinkError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: "unauthorized access".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "401 Unauthorized: write rejected by server: unauthorized access"
        );
    }

    #[test]
    fn test_import_error_names_line() {
        let error = ImportError::Parse {
            line: 7,
            source: ParseError::MissingPerfData,
        };
        assert_eq!(
            error.to_string(),
            "line 7: perf_data is missing or is not an object"
        );
    }

    #[test]
    fn test_write_error_wraps_sink_failure() {
        let error = ImportError::from(WriteError::Sink {
            points: 1000,
            source: SinkError::Status {
                status: StatusCode::BAD_REQUEST,
                body: "bad".to_string(),
            },
        });
        assert_eq!(
            error.to_string(),
            "failed to write batch of 1000 points: 400 Bad Request: write rejected by server: bad"
        );
    }
}
