//! Background ingestion for tidewatch.
//!
//! - [`TideSyncWorker`]: one scrape → replace cycle, also callable on demand
//! - [`PeriodicScheduler`]: drives any [`SyncJob`] on a clock-aligned or
//!   fixed cadence until stopped

pub mod scheduler;
pub mod sync;

pub use scheduler::*;
pub use sync::*;
