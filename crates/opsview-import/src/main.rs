// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use anyhow::anyhow;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::{env, time::Duration};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use opsview_metrics::{
    batch::{BatchWriter, WriteStats, DEFAULT_BATCH_SIZE},
    config::{ImportConfig, DEFAULT_TIMEOUT},
    importer::Importer,
    influx::InfluxClient,
};

/// Process and import Opsview data into InfluxDB 2.x.
#[derive(Debug, Parser)]
#[command(name = "opsview-import", version)]
struct Args {
    /// The URL of the InfluxDB instance.
    #[arg(long, env = "INFLUX_URL")]
    url: String,

    /// The token for authentication.
    #[arg(long, env = "INFLUX_TOKEN", hide_env_values = true)]
    token: String,

    /// The organization name.
    #[arg(long, env = "INFLUX_ORG")]
    org: String,

    /// The bucket name where data will be stored.
    #[arg(long, env = "INFLUX_BUCKET")]
    bucket: String,

    /// The path to the input file containing data entries.
    #[arg(long = "file_path", env = "OPSVIEW_FILE_PATH")]
    file_path: PathBuf,

    /// Number of points sent per write request.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Timeout of a single write request, in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout_secs: u64,
}

impl Args {
    fn into_config(self, log_level: String) -> ImportConfig {
        ImportConfig {
            url: self.url,
            token: self.token,
            org: self.org,
            bucket: self.bucket,
            file_path: self.file_path,
            batch_size: self.batch_size,
            timeout: Duration::from_secs(self.timeout_secs),
            log_level,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    let log_level = env::var("OPSVIEW_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("info".to_string());

    let config = Args::parse().into_config(log_level);
    if let Err(e) = config.validate() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    init_logging(&config.log_level);
    debug!("Logging subsystem enabled");

    match import(&config).await {
        Ok(stats) => {
            info!(
                "Wrote {} points in {} batches to bucket {}",
                stats.points, stats.batches, config.bucket
            );
            println!("\nAll data imported successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("\nFailed to import data with error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: &str) {
    let env_filter = format!("h2=off,hyper=off,reqwest=off,rustls=off,{log_level}");

    let filter = match EnvFilter::try_new(env_filter) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("could not parse log level in configuration: {e}");
            return;
        }
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .without_time()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("setting default subscriber failed: {e}");
    }
}

async fn import(config: &ImportConfig) -> anyhow::Result<WriteStats> {
    let contents = tokio::fs::read_to_string(&config.file_path)
        .await
        .map_err(|e| anyhow!("failed to read {}: {e}", config.file_path.display()))?;
    let lines: Vec<&str> = contents.lines().collect();
    debug!(
        "Read {} entries from {}",
        lines.len(),
        config.file_path.display()
    );

    let client = InfluxClient::new(config.influx_config())
        .map_err(|e| anyhow!("failed to create InfluxDB client: {e}"))?;
    let writer = BatchWriter::new(client, config.writer_config());

    let mut stdout = std::io::stdout();
    let stats = Importer::new(writer, lines.len())
        .run(lines, |progress| {
            let _ = write!(stdout, "\r{progress}");
            let _ = stdout.flush();
        })
        .await?;
    Ok(stats)
}
