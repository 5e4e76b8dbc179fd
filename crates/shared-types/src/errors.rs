//! # Error Types
//!
//! A contract has exactly one failure channel. Every precondition violation
//! aborts the interaction with a `ContractError` whose display text is what
//! the external caller receives.

use thiserror::Error;

/// Rejection of an interaction. The host discards the interaction; no state
/// change from it is ever observable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    /// A precondition of the operation does not hold.
    #[error("{0}")]
    Rejected(String),

    /// The `function` field names no known operation.
    #[error("No function supplied or function not recognised: \"{0}\"")]
    UnknownFunction(String),

    /// The input could not be decoded into the operation's typed shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A supply-increasing operation would exceed the safe-integer ceiling.
    #[error("{0}")]
    QuantityTooLarge(String),

    /// The state of a linked contract could not be resolved.
    #[error("Remote state unavailable: {0}")]
    RemoteState(String),

    /// A post-condition check failed after the operation was applied.
    #[error("Invariant violated: {0}")]
    InvariantViolated(String),
}

impl ContractError {
    /// Builds a plain precondition rejection.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    /// Returns the human-readable rejection text.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Fails with [`ContractError::Rejected`] unless `condition` holds.
///
/// # Errors
///
/// Returns the rejection carrying `message` when `condition` is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), ContractError> {
    if condition {
        Ok(())
    } else {
        Err(ContractError::rejected(message))
    }
}
