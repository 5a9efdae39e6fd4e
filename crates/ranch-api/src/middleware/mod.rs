//! # Middleware
//!
//! - `metrics`: request counters and latency recorded through the
//!   `metrics` facade.

pub mod metrics;
