//! Shared types for the viewcast capture pipeline.
//!
//! This crate defines the plain value types used across the pipeline
//! and exposed to embedding hosts: geometry, session configuration,
//! and pipeline statistics.

mod config;
mod geometry;
mod stats;

pub use config::CaptureConfig;
pub use geometry::{Rect, Size};
pub use stats::CaptureStats;
