//! Storj Storage Node Prometheus Exporter
//!
//! This crate polls the operator API of a local Storj storage node and
//! exposes what it finds as Prometheus metrics, including:
//!
//! - **Node**: identity info, total disk space, total bandwidth
//! - **Payout**: estimated payout for the current month
//! - **Satellites**: monthly egress/ingress sums, today's stored data, and a
//!   status/score summary per satellite
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  GET /metrics   ┌──────────────────────────────────────┐
//! │  Prometheus  │────────────────►│              exporter                │
//! └──────────────┘                 │                                      │
//!                                  │  server ──► collector ──► client ────┼──► node API
//!                                  │                │                     │   /api/sno/...
//!                                  │                ▼                     │
//!                                  │   snapshot ──► metrics ──► exposition│
//!                                  └──────────────────────────────────────┘
//! ```
//!
//! Every scrape runs a fresh collection pass: nothing is cached between
//! scrapes, and an unreachable node simply produces an empty (or partial)
//! response instead of an error.
//!
//! # Usage
//!
//! ```bash
//! STORJ_HOST_ADDRESS=127.0.0.1 STORJ_API_PORT=14002 STORJ_COLLECTORS="payout sat" storj-exporter
//! curl http://localhost:9651/metrics
//! ```

pub mod client;
pub mod collector;
pub mod config;
pub mod error;
pub mod exposition;
pub mod metrics;
pub mod server;
pub mod snapshot;
pub mod value;

pub use client::{NodeApi, NodeApiClient};
pub use collector::StorjCollector;
pub use config::{Collectors, Config};
pub use error::{ExporterError, FetchError, Result};
pub use metrics::{MetricKind, MetricRecord, MetricSpec, Sample, SampleValue};
pub use server::{StatusResponse, router, serve, shutdown_signal};
pub use snapshot::{NodeSnapshot, SatelliteSnapshot, sum_daily};
pub use value::{ValueExt, safe_index};
