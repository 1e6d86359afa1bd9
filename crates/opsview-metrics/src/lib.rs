// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Conversion of Opsview check results into InfluxDB points.
//!
//! Each input line is a JSON check result. Its hostname, service check and metadata become tags,
//! its `perf_data` values become unit-normalized fields, and the check time in its `info` line
//! becomes the point timestamp. Points are written to a [`sink::WriteSink`] in fixed size
//! batches by a [`batch::BatchWriter`].

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod batch;
pub mod config;
pub mod errors;
pub mod importer;
pub mod influx;
pub mod line_protocol;
pub mod normalize;
pub mod point;
pub mod progress;
pub mod record;
pub mod sink;
