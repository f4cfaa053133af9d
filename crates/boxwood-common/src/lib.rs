//! Common utilities for the boxwood layout engine.
//!
//! This crate provides shared infrastructure used by every pipeline stage:
//! - **Warning System** - deduplicated, colored diagnostics for degraded input

pub mod warning;
