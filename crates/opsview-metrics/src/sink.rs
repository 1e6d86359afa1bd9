// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::errors::SinkError;
use crate::point::Point;
use async_trait::async_trait;

/// Destination for batches of points.
///
/// A call either stores the whole batch or fails; implementations must not report success
/// for a partially written batch.
#[async_trait]
pub trait WriteSink {
    async fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: WriteSink + Sync + ?Sized> WriteSink for &S {
    async fn write(&self, bucket: &str, org: &str, points: &[Point]) -> Result<(), SinkError> {
        (**self).write(bucket, org, points).await
    }
}
