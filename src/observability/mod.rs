//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Adapter and HTTP server produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (outcome counters, latency histogram)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request span
//! - Metrics are recorded even when no exporter is installed (no-op recorder)

pub mod logging;
pub mod metrics;
