//! Telemetry for tidewatch.
//!
//! Structured logging through `tracing`, process-local counters and
//! latency histograms, and a registry of component health used by the
//! readiness probe.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::*;
pub use metrics::*;
pub use tracing_setup::*;
