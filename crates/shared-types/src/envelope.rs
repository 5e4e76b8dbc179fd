//! # Interaction Envelope
//!
//! The wrapper a host hands to a contract for every call.
//!
//! ## Properties
//!
//! - **Caller Authority**: `caller` is authenticated by the host (signature
//!   checking happens outside the contract) and is the only identity used.
//! - **Untyped Input**: `input` is raw JSON. Its `function` field selects the
//!   operation; each contract decodes the remaining fields into its own typed
//!   input and rejects anything that does not fit.
//! - **Explicit Clock**: the block height is passed alongside the envelope
//!   rather than read from ambient globals.

use crate::entities::Address;
use serde::{Deserialize, Serialize};

/// One call against a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Authenticated account performing the call.
    pub caller: Address,
    /// Operation input: `{"function": "...", ...fields}`.
    pub input: serde_json::Value,
}

impl Interaction {
    /// Creates a new interaction.
    #[must_use]
    pub fn new(caller: Address, input: serde_json::Value) -> Self {
        Self { caller, input }
    }

    /// Returns the requested function name, if the input carries one.
    #[must_use]
    pub fn function(&self) -> Option<&str> {
        self.input.get("function").and_then(serde_json::Value::as_str)
    }
}

/// Host-supplied execution context for one interaction.
///
/// Heights are monotonic non-decreasing across calls; the contract never
/// checks this itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    /// Current block height.
    pub height: u64,
}

impl BlockContext {
    /// Creates a block context at `height`.
    #[must_use]
    pub const fn at(height: u64) -> Self {
        Self { height }
    }
}
