//! # AW-02 Atomic NFT - Page Ownership Token
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! A single-holder token bound to one page of a wiki contract. The token can
//! only move to whoever currently sponsors that page, so ownership follows
//! sponsorship. The wiki state is read through the `LinkedStateReader` port.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Single Holder | `domain/rules.rs` - `check_single_holder()` |
//! | Holder is the page sponsor | `domain/rules.rs` - `transfer()` |
//!
//! ## Outbound Dependencies
//!
//! | Contract | Trait | Purpose |
//! |----------|-------|---------|
//! | 1 (Wiki Contract) | `LinkedStateReader` | Page sponsor and role lookup |

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adapters;
pub mod domain;
pub mod input;
pub mod output;
pub mod ports;
pub mod service;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::InMemoryWikiRegistry;
    pub use crate::domain::entities::{LinkedProperties, NftState};
    pub use crate::input::NftInput;
    pub use crate::output::{LinkedInfoResult, NftBalanceResult, NftQueryResult, NftResponse};
    pub use crate::ports::{AtomicNftApi, LinkedStateReader};
    pub use crate::service::{AtomicNftService, NftServiceStats};
}

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 2;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Atomic NFT";
