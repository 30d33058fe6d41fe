//! SQLite-backed tide and alert store.

pub mod alerts;
pub mod client;
pub mod config;
pub mod health;
pub mod query;
pub mod replace;
pub mod schema;

pub use alerts::*;
pub use client::*;
pub use config::*;
pub use health::{check_connection, init_schema};
pub use query::*;
