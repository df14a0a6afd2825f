//! Common utilities for the propmeta metadata engine.
//!
//! This crate provides the pieces shared by every propmeta crate:
//! - Centralized limits and thresholds
//! - Tracing subscriber setup driven by `PROPMETA_LOG`

// Centralized limits and thresholds
pub mod limits;

// Tracing subscriber configuration
pub mod tracing_config;
pub use tracing_config::{LogFormat, init_tracing};
