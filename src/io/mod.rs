//! Output helpers.
//!
//! - result exports (CSV) (`export`)

pub mod export;

pub use export::*;
