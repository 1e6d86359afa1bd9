// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::batch::{BatchWriterConfig, DEFAULT_BATCH_SIZE};
use crate::errors::ConfigError;
use crate::influx::InfluxConfig;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for one import run
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// InfluxDB URL, with or without scheme
    pub url: String,
    /// InfluxDB API token
    pub token: String,
    /// Organization owning the bucket
    pub org: String,
    /// Bucket the points are written to
    pub bucket: String,
    /// Newline delimited JSON file to import
    pub file_path: PathBuf,
    /// Number of points per write request
    pub batch_size: usize,
    /// Timeout of a single write request
    pub timeout: Duration,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            org: String::new(),
            bucket: String::new(),
            file_path: PathBuf::new(),
            batch_size: DEFAULT_BATCH_SIZE,
            timeout: DEFAULT_TIMEOUT,
            log_level: "info".to_string(),
        }
    }
}

impl ImportConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("url", &self.url),
            ("token", &self.token),
            ("org", &self.org),
            ("bucket", &self.bucket),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{name} cannot be empty")));
            }
        }

        if self.file_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "file_path cannot be empty".to_string(),
            ));
        }

        if self.batch_size == 0 {
            return Err(ConfigError::Invalid(
                "batch size must be greater than 0".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    #[must_use]
    pub fn influx_config(&self) -> InfluxConfig {
        InfluxConfig {
            endpoint: self.url.clone(),
            token: self.token.clone(),
            timeout: self.timeout,
        }
    }

    #[must_use]
    pub fn writer_config(&self) -> BatchWriterConfig {
        BatchWriterConfig {
            bucket: self.bucket.clone(),
            org: self.org.clone(),
            batch_size: self.batch_size,
        }
    }
}

/// Prefixes `http://` to an endpoint without scheme and drops trailing slashes.
#[must_use]
pub fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ImportConfig {
        ImportConfig {
            url: "localhost:8086".to_string(),
            token: "token".to_string(),
            org: "org".to_string(),
            bucket: "bucket".to_string(),
            file_path: PathBuf::from("opsview.log"),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, 1000);
    }

    #[test]
    fn test_default_config_is_incomplete() {
        assert!(ImportConfig::default().validate().is_err());
    }

    #[test]
    fn test_validate_empty_values() {
        let config = ImportConfig {
            token: "  ".to_string(),
            ..valid_config()
        };
        let err = config.validate().expect_err("empty token should be rejected");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: token cannot be empty"
        );

        let config = ImportConfig {
            file_path: PathBuf::new(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_batch_size_and_timeout() {
        let config = ImportConfig {
            batch_size: 0,
            ..valid_config()
        };
        assert!(config.validate().is_err());

        let config = ImportConfig {
            timeout: Duration::ZERO,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let config = ImportConfig {
                log_level: level.to_string(),
                ..valid_config()
            };
            assert!(
                config.validate().is_ok(),
                "Log level '{}' should be valid",
                level
            );
        }

        let config = ImportConfig {
            log_level: "verbose".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("localhost:8086"), "http://localhost:8086");
        assert_eq!(
            normalize_endpoint("http://localhost:8086/"),
            "http://localhost:8086"
        );
        assert_eq!(
            normalize_endpoint("https://eu-central-1.aws.cloud2.influxdata.com"),
            "https://eu-central-1.aws.cloud2.influxdata.com"
        );
        assert_eq!(normalize_endpoint(" 10.0.0.5 "), "http://10.0.0.5");
    }

    #[test]
    fn test_sub_configs() {
        let config = valid_config();
        let influx = config.influx_config();
        assert_eq!(influx.endpoint, "localhost:8086");
        assert_eq!(influx.timeout, DEFAULT_TIMEOUT);
        let writer = config.writer_config();
        assert_eq!(writer.bucket, "bucket");
        assert_eq!(writer.org, "org");
        assert_eq!(writer.batch_size, DEFAULT_BATCH_SIZE);
    }
}
