//! Status aggregation for a multi-stage astronomical reduction pipeline.
//!
//! Scans the pipeline's output trees for one observing night and reports, per
//! observation unit, how far processing has progressed along with warning,
//! error and comment counts. Results are cached against filesystem
//! modification times.

pub mod commands;
pub mod config;
pub mod error;
pub mod fs;
pub mod models;
pub mod monitor;
pub mod validation;

pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use monitor::{Monitor, StatusReport};
