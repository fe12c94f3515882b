//! Data acquisition and cleaning.
//!
//! - `source`: where the CSV bytes come from (HTTP fetch or local file)
//! - `loader`: CSV decode + type coercion + column defaulting

pub mod loader;
pub mod source;

pub use loader::*;
pub use source::*;
