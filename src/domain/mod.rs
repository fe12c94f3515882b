//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - the cleaned sales table (`SalesRecord`, `Dataset`)
//! - the UI selector state (`ReportMode`, `SelectorState`)

pub mod types;

pub use types::*;
