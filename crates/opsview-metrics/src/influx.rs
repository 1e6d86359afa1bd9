// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Client for the InfluxDB 2.x write API.

use crate::config::normalize_endpoint;
use crate::errors::SinkError;
use crate::line_protocol::encode_batch;
use crate::point::Point;
use crate::sink::WriteSink;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, error};

const WRITE_PATH: &str = "/api/v2/write";

#[derive(Clone, Debug)]
pub struct InfluxConfig {
    /// Server URL; `http://` is assumed when no scheme is given.
    pub endpoint: String,
    /// API token sent as `Authorization: Token <token>`.
    pub token: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct InfluxClient {
    client: reqwest::Client,
    write_url: String,
    token: String,
}

impl InfluxClient {
    pub fn new(config: InfluxConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(InfluxClient {
            client,
            write_url: format!("{}{WRITE_PATH}", normalize_endpoint(&config.endpoint)),
            token: config.token,
        })
    }

    #[must_use]
    pub fn write_url(&self) -> &str {
        &self.write_url
    }
}

#[async_trait]
impl WriteSink for InfluxClient {
    async fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), SinkError> {
        let (body, lines) = encode_batch(points);
        if lines == 0 {
            debug!("No writable points in batch of {}, skipping request", points.len());
            return Ok(());
        }
        if lines < points.len() {
            debug!("Dropped {} points without writable fields", points.len() - lines);
        }

        debug!("Writing {lines} points to {} (bucket {bucket})", self.write_url);
        let resp = self
            .client
            .post(&self.write_url)
            .query(&[("org", org), ("bucket", bucket), ("precision", "ns")])
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        error!("{status}: Failed to write to InfluxDB: {body}");
        Err(SinkError::Status { status, body })
    }
}
