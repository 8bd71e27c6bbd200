//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Withdrawal lifecycle produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, JSON when configured)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Transaction hash flows through every post-broadcast log line
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
