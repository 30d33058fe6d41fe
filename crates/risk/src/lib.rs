//! Tidal flood risk for weather alerts.
//!
//! Heavy rain alone does not flood the coast; heavy rain while the sea is
//! high does. The correlator looks for a high tide above the threshold
//! inside the alert window, extended by a buffer after expiry.

pub mod correlator;

pub use correlator::*;
