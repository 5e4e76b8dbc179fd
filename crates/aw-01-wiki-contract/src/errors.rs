//! # Error Types
//!
//! Interaction rejections use the shared `ContractError`; hosts only ever
//! see its message. `StateError` covers loading a state snapshot.

use thiserror::Error;

pub use shared_types::ContractError;

// =============================================================================
// STATE ERRORS
// =============================================================================

/// Errors raised while loading a wiki state from JSON.
#[derive(Debug, Error)]
pub enum StateError {
    /// The document does not describe a wiki state.
    #[error("malformed state: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document parses but breaks a whole-state invariant.
    #[error("state violates invariants: {0}")]
    Inconsistent(String),
}

// =============================================================================
// TESTS
// =============================================================================
