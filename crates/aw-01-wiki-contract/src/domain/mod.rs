//! # Domain Layer (Inner Hexagon)
//!
//! Pure business logic of the wiki contract.
//! NO I/O, NO async, NO ambient clock: the block height is a parameter.
//!
//! - `ledger` holds the shared accounting primitives.
//! - `token`, `governance` and `moderation` are the rule-sets built on it.
//! - `invariants` checks whole-state properties.

pub mod entities;
pub mod governance;
pub mod invariants;
pub mod ledger;
pub mod moderation;
pub mod token;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
