//! # Operation Outputs

use crate::domain::entities::{LinkedProperties, NftState};
use serde::{Deserialize, Serialize};
use shared_types::Address;

/// `balance` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftBalanceResult {
    /// Inspected account.
    pub target: String,
    /// Token ticker.
    pub ticker: String,
    /// 0 or 1.
    pub balance: u64,
}

/// `linkedInfo` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInfoResult {
    /// Linked wiki contract.
    pub linked_contract: Address,
    /// Linked page.
    pub linked_properties: LinkedProperties,
}

/// Any read-only result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NftQueryResult {
    /// Holder balance.
    Balance(NftBalanceResult),
    /// Link target.
    LinkedInfo(LinkedInfoResult),
}

/// Outcome of a successful call: `{"state": ...}` or `{"result": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NftResponse {
    /// The state after a mutating call.
    State(NftState),
    /// A read-only result.
    Result(NftQueryResult),
}
