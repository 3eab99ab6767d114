//! Shelfmark Application Library
//!
//! Domain modules (accounts, books) and shared utilities for the Shelfmark
//! book tracker.

pub mod modules;
pub mod utils;
