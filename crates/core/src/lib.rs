//! Core types, error taxonomy, and tide table parsing for tidewatch.

pub mod alert;
pub mod civil;
pub mod error;
pub mod parse;
pub mod risk;
pub mod tide;

pub use alert::*;
pub use civil::*;
pub use error::{Error, Result};
pub use risk::*;
pub use tide::*;
