//! # AW-01 Wiki Contract - Token, Governance and Moderation State Machine
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! The deterministic state machine behind the wiki: a profit-sharing token
//! with time-locked vault balances, token-weighted governance votes, and
//! moderated pages paid for by sponsor stakes. Every interaction is
//! `(state, {caller, input}, height) -> state | result | rejection`.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Supply Ceiling | `domain/invariants.rs` - `check_supply_ceiling()` |
//! | Stake/Sponsor Consistency | `domain/invariants.rs` - `check_stake_sponsorship()` |
//! | Lock Shape | `domain/invariants.rs` - `check_lock_records()` |
//! | Single Vote | `domain/invariants.rs` - `check_single_vote()` |
//! | All-or-nothing interactions | `service.rs` - `execute()` working copy |
//!
//! ## Operations
//!
//! | Group | Functions | Location |
//! |-------|-----------|----------|
//! | Ledger | `transfer`, `lock`, `increaseVault`, `unlock`, `evolve` | `domain/token.rs` |
//! | Queries | `balance`, `unlockedBalance`, `vaultBalance`, `balanceDetail`, `role` | `domain/token.rs` |
//! | Governance | `propose`, `vote`, `finalize` | `domain/governance.rs` |
//! | Moderation | `approvePage`, `updatePageSponsor`, `stopPageSponsorshipAndDeactivatePage`, `addPageUpdate`, `activateDeactivatePage`, `updatePageProperties`, `addLanguage`, `updateLanguage`, `addCategory`, `updateCategory` | `domain/moderation.rs` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use aw_01_wiki_contract::prelude::*;
//!
//! let mut service = WikiContractService::new(ContractConfig::default());
//! let call = Interaction::new(caller, json!({"function": "balance"}));
//! let result = service.apply_interaction(&mut state, &call, BlockContext::at(42))?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod domain;
pub mod errors;
pub mod input;
pub mod output;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Category, Language, LockRecord, Page, PageUpdate, Proposal, Settings, Vote, WikiState,
    };

    // Value objects
    pub use crate::domain::value_objects::{VoteStatus, VoteValue, WritingSystem, MODERATOR_ROLE};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, limits, InvariantCheckResult, InvariantViolation,
    };

    // Wire types
    pub use crate::input::ContractInput;
    pub use crate::output::{BalanceDetailResult, BalanceResult, HandleResponse, QueryResult, RoleResult};

    // Ports
    pub use crate::ports::inbound::WikiContractApi;

    // Errors
    pub use crate::errors::{ContractError, StateError};

    // Service
    pub use crate::service::{handle, load_state, ContractConfig, ServiceStats, WikiContractService};

    // Shared types
    pub use shared_types::{Address, BlockContext, Interaction};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 1;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Wiki Contract";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_id() {
        assert_eq!(SUBSYSTEM_ID, 1);
        assert_eq!(SUBSYSTEM_NAME, "Wiki Contract");
    }

    #[test]
    fn test_prelude_exports() {
        use prelude::*;
        let _ = ContractConfig::default();
        let state = WikiState::new("ArWiki", "AWK");
        assert!(check_all_invariants(&state).is_valid());
    }
}
