//! Shared helpers for the tidewatch integration tests.
//!
//! Everything runs against an in-memory SQLite store; the tide page is
//! served from [`fixtures`] through [`mocks::MockTideSource`], so no test
//! touches the network.

pub mod fixtures;
pub mod mocks;
