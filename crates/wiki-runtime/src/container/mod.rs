//! # Runtime Container
//!
//! Process-level configuration of the reference host.

pub mod config;

pub use config::{ConfigError, RuntimeConfig};
