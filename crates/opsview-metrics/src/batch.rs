// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Batching of points in front of a [`WriteSink`].
//!
//! Points accumulate in memory and are written as one request whenever the buffer reaches the
//! configured batch size, and once more for the remainder when the input is exhausted. Batches
//! are never retried or split: the first failed write aborts the writer and every later call
//! returns [`WriteError::Aborted`] without touching the sink.

use crate::errors::WriteError;
use crate::point::Point;
use crate::sink::WriteSink;
use derive_more::Display;
use tracing::{debug, error};

pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum WriterState {
    #[display("accumulating")]
    Accumulating,
    #[display("aborted")]
    Aborted,
}

/// Totals of what the writer has delivered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub batches: usize,
    pub points: usize,
}

pub struct BatchWriterConfig {
    pub bucket: String,
    pub org: String,
    pub batch_size: usize,
}

pub struct BatchWriter<S> {
    sink: S,
    bucket: String,
    org: String,
    batch_size: usize,
    buffer: Vec<Point>,
    state: WriterState,
    stats: WriteStats,
}

impl<S: WriteSink> BatchWriter<S> {
    #[must_use]
    pub fn new(sink: S, config: BatchWriterConfig) -> Self {
        let batch_size = config.batch_size.max(1);
        BatchWriter {
            sink,
            bucket: config.bucket,
            org: config.org,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            state: WriterState::Accumulating,
            stats: WriteStats::default(),
        }
    }

    /// Buffers a point, flushing immediately when the buffer reaches the batch size.
    pub async fn append(&mut self, point: Point) -> Result<(), WriteError> {
        self.ensure_accumulating()?;
        self.buffer.push(point);
        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Writes the whole buffer as a single batch.
    ///
    /// On failure the buffered points are dropped and the writer is aborted.
    pub async fn flush(&mut self) -> Result<(), WriteError> {
        self.ensure_accumulating()?;
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.batch_size));
        let n_points = batch.len();
        debug!("Flushing batch of {n_points} points");

        match self.sink.write(&self.bucket, &self.org, &batch).await {
            Ok(()) => {
                self.stats.batches += 1;
                self.stats.points += n_points;
                debug!("Successfully flushed {n_points} points");
                Ok(())
            }
            Err(source) => {
                self.state = WriterState::Aborted;
                error!("Failed to flush batch of {n_points} points: {source}");
                Err(WriteError::Sink {
                    points: n_points,
                    source,
                })
            }
        }
    }

    /// Flushes whatever is left once the input is exhausted.
    pub async fn finalize(mut self) -> Result<WriteStats, WriteError> {
        self.flush().await?;
        debug!(
            "Writer finalized after {} batches and {} points",
            self.stats.batches, self.stats.points
        );
        Ok(self.stats)
    }

    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn state(&self) -> WriterState {
        self.state
    }

    #[must_use]
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn ensure_accumulating(&self) -> Result<(), WriteError> {
        match self.state {
            WriterState::Accumulating => Ok(()),
            WriterState::Aborted => Err(WriteError::Aborted),
        }
    }
}
