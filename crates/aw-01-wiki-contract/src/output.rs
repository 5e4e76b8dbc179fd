//! # Operation Outputs
//!
//! What a call hands back: either the new state or a read-only result.

use crate::domain::entities::WikiState;
use serde::{Deserialize, Serialize};

/// `balance`, `unlockedBalance` and `vaultBalance` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    /// Inspected account.
    pub target: String,
    /// Token ticker.
    pub ticker: String,
    /// Amount.
    pub balance: u64,
}

/// `balanceDetail` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDetailResult {
    /// Inspected account.
    pub target: String,
    /// Token ticker.
    pub ticker: String,
    /// Free balance.
    pub unlocked_balance: u64,
    /// Every lock, expired or not.
    pub vault_balance: u64,
    /// Every page stake.
    pub staking_balance: u64,
}

/// `role` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResult {
    /// Inspected account.
    pub target: String,
    /// Assigned role.
    pub role: String,
}

/// Any read-only result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// Single amount.
    Balance(BalanceResult),
    /// Amount split by sub-ledger.
    BalanceDetail(BalanceDetailResult),
    /// Role lookup.
    Role(RoleResult),
}

/// Outcome of a successful call: `{"state": ...}` or `{"result": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleResponse {
    /// The state after a mutating call.
    State(WikiState),
    /// The answer to a query.
    Result(QueryResult),
}

impl HandleResponse {
    /// Returns the state, if this is a state response.
    #[must_use]
    pub fn into_state(self) -> Option<WikiState> {
        match self {
            Self::State(state) => Some(state),
            Self::Result(_) => None,
        }
    }

    /// Returns the query result, if this is a result response.
    #[must_use]
    pub fn into_result(self) -> Option<QueryResult> {
        match self {
            Self::Result(result) => Some(result),
            Self::State(_) => None,
        }
    }
}
