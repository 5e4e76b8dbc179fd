//! # Contract Host
//!
//! Holds the hosted contracts and replays interactions against them.
//!
//! ## Replay Rules
//!
//! 1. Records are applied strictly one at a time, in log order.
//! 2. A record whose height is below the previous record's is skipped, or
//!    aborts the replay when `strict_heights` is set.
//! 3. A rejected interaction is logged and leaves every state untouched.
//! 4. Atomic NFT calls resolve their linked wiki state from the same store,
//!    as of the record being evaluated.

pub mod contract_host;
pub mod store;

pub use contract_host::{state_digest, ContractHost, HostError, InteractionRecord, ReplaySummary};
pub use store::{ContractStore, HostedContract};
