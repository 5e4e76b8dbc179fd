//! # Shared Types Crate
//!
//! This crate contains the primitives every contract in the workspace agrees
//! on: wallet addresses, the `Interaction` envelope handed to a contract by its
//! host, the block context, and the `ContractError` rejection channel.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Cross-contract types are defined here.
//! - **Envelope Authority**: The `Interaction::caller` is the sole identity of
//!   the account performing an operation. Inputs never carry a caller field.
//! - **Safe Integers**: Every monetary quantity stays at or below
//!   [`SAFE_INTEGER_MAX`]; arithmetic that would exceed it is rejected.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::{BlockContext, Interaction};
pub use errors::*;
