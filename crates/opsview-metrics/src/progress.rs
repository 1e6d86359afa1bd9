// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Count of records processed so far out of a known total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    processed: usize,
    total: usize,
}

impl Progress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Progress {
            processed: 0,
            total,
        }
    }

    pub fn record(&mut self) {
        self.processed += 1;
    }

    #[must_use]
    pub fn processed(&self) -> usize {
        self.processed
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Percentage of the total processed, 100 for an empty input.
    #[must_use]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} / {} successfully. Progress: {:.2}%",
            self.processed,
            self.total,
            self.percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_counts_up() {
        let mut progress = Progress::new(3);
        assert_eq!(progress.processed(), 0);
        assert_eq!(progress.percent(), 0.0);

        progress.record();
        assert_eq!(progress.processed(), 1);
        assert_eq!(
            progress.to_string(),
            "Processed 1 / 3 successfully. Progress: 33.33%"
        );

        progress.record();
        progress.record();
        assert_eq!(progress.percent(), 100.0);
        assert_eq!(
            progress.to_string(),
            "Processed 3 / 3 successfully. Progress: 100.00%"
        );
    }

    #[test]
    fn test_empty_input() {
        let progress = Progress::new(0);
        assert_eq!(progress.total(), 0);
        assert_eq!(progress.percent(), 100.0);
    }
}
