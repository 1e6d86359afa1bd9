// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Line by line import pipeline.
//!
//! An [`Importer`] owns everything an import run mutates: the batch writer (and through it the
//! sink) and the progress counter. Lines go through parse → extract → assemble → append strictly
//! in input order, and the first error of any kind stops the run.

use crate::batch::{BatchWriter, WriteStats};
use crate::errors::ImportError;
use crate::point::Point;
use crate::progress::Progress;
use crate::record::LogEntry;
use crate::sink::WriteSink;
use tracing::debug;

pub struct Importer<S> {
    writer: BatchWriter<S>,
    progress: Progress,
}

impl<S: WriteSink> Importer<S> {
    /// `total` is the number of lines that will be fed, used for progress reporting only.
    #[must_use]
    pub fn new(writer: BatchWriter<S>, total: usize) -> Self {
        Importer {
            writer,
            progress: Progress::new(total),
        }
    }

    /// Converts one input line into a point and hands it to the writer.
    pub async fn process_line(&mut self, line: &str) -> Result<Progress, ImportError> {
        let line_number = self.progress.processed() + 1;
        let point = LogEntry::from_line(line)
            .and_then(|entry| Point::from_entry(&entry))
            .map_err(|source| ImportError::Parse {
                line: line_number,
                source,
            })?;

        self.writer.append(point).await?;
        self.progress.record();
        Ok(self.progress)
    }

    /// Flushes the remaining points and returns what was delivered.
    pub async fn finish(self) -> Result<WriteStats, ImportError> {
        let stats = self.writer.finalize().await?;
        debug!(
            "Imported {} records in {} batches",
            self.progress.processed(),
            stats.batches
        );
        Ok(stats)
    }

    /// Feeds every line, calling `on_progress` after each one, then finishes the run.
    pub async fn run<'a, I, F>(mut self, lines: I, mut on_progress: F) -> Result<WriteStats, ImportError>
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&Progress),
    {
        for line in lines {
            let progress = self.process_line(line).await?;
            on_progress(&progress);
        }
        self.finish().await
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn writer(&self) -> &BatchWriter<S> {
        &self.writer
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::batch::tests::RecordingSink;
    use crate::batch::BatchWriterConfig;
    use crate::errors::{ParseError, WriteError};
    use crate::normalize::FieldValue;

    fn line(host: &str) -> String {
        format!(
            r#"{{"message":{{"hostname":"{host}","perf_data":{{"time":"120ms"}}}},"info":"CHECK 2024-01-01 00:00:00"}}"#
        )
    }

    fn importer(sink: &RecordingSink, batch_size: usize, total: usize) -> Importer<&RecordingSink> {
        Importer::new(
            BatchWriter::new(
                sink,
                BatchWriterConfig {
                    bucket: "bucket".to_string(),
                    org: "org".to_string(),
                    batch_size,
                },
            ),
            total,
        )
    }

    #[tokio::test]
    async fn test_process_line() {
        let sink = RecordingSink::default();
        let mut importer = importer(&sink, 10, 2);

        let progress = importer.process_line(&line("h1")).await.unwrap();
        assert_eq!(progress.processed(), 1);
        assert_eq!(progress.percent(), 50.0);
        assert_eq!(importer.writer().buffered(), 1);

        let stats = importer.finish().await.unwrap();
        assert_eq!(stats.points, 1);

        let batches = sink.batches.lock().unwrap();
        let point = &batches[0][0];
        assert_eq!(point.tags()["hostname"], "h1");
        assert_eq!(point.fields()["duration"], FieldValue::Float(120.0));
        assert_eq!(point.timestamp(), 1_704_067_200_000_000_000);
    }

    #[tokio::test]
    async fn test_run_reports_progress_per_line() {
        let sink = RecordingSink::default();
        let lines: Vec<String> = (0..5).map(|n| line(&format!("h{n}"))).collect();
        let mut seen = Vec::new();

        let stats = importer(&sink, 2, lines.len())
            .run(lines.iter().map(String::as_str), |p| seen.push(p.processed()))
            .await
            .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
        assert_eq!(stats.batches, 3);
        assert_eq!(sink.batch_sizes(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_malformed_line_stops_run() {
        let sink = RecordingSink::default();
        let lines = [
            line("h1"),
            r#"{"message":{"hostname":"h2","perf_data":{}},"info":"CHECK 2024-01-01"}"#.to_string(),
            line("h3"),
        ];

        let err = importer(&sink, 1, lines.len())
            .run(lines.iter().map(String::as_str), |_| {})
            .await
            .expect_err("second line should fail");

        match err {
            ImportError::Parse {
                line: 2,
                source: ParseError::MalformedTimestamp(_),
            } => {}
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(sink.batch_sizes(), vec![1]);
    }

    #[tokio::test]
    async fn test_missing_perf_data_stops_run() {
        let sink = RecordingSink::default();
        let mut importer = importer(&sink, 10, 1);
        let err = importer
            .process_line(r#"{"message":{"hostname":"h1"},"info":"CHECK 2024-01-01 00:00:00"}"#)
            .await
            .expect_err("perf_data is required");
        assert!(matches!(
            err,
            ImportError::Parse {
                line: 1,
                source: ParseError::MissingPerfData
            }
        ));
        assert_eq!(importer.progress().processed(), 0);
    }

    #[tokio::test]
    async fn test_sink_failure_stops_before_next_record() {
        let sink = RecordingSink::failing_on(1);
        let lines: Vec<String> = (0..4).map(|n| line(&format!("h{n}"))).collect();
        let mut seen = Vec::new();

        let err = importer(&sink, 2, lines.len())
            .run(lines.iter().map(String::as_str), |p| seen.push(p.processed()))
            .await
            .expect_err("first batch should fail");

        assert!(matches!(
            err,
            ImportError::Write(WriteError::Sink { points: 2, .. })
        ));
        assert_eq!(seen, vec![1]);
        assert_eq!(sink.calls(), 1);
    }
}
