//! # Wiki Runtime Library
//!
//! The reference host for the wiki contracts, exposed as a library for
//! testing. The entry point is the `main.rs` binary.
//!
//! - `container/` - Environment configuration
//! - `genesis/` - Genesis file parsing and wiki state building
//! - `host/` - Contract store, linked-state resolution and replay

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod container;
pub mod genesis;
pub mod host;

pub use container::{ConfigError, RuntimeConfig};
pub use genesis::{GenesisBuilder, GenesisConfig, GenesisError, GenesisFile};
pub use host::{ContractHost, HostError, InteractionRecord, ReplaySummary};
