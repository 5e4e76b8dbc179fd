//! # Domain Entities
//!
//! State of an atomic NFT bound to one page of a wiki contract.

use serde::{Deserialize, Serialize};
use shared_types::Address;
use std::collections::BTreeMap;

/// The page a token is bound to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedProperties {
    /// Page slug.
    pub slug: String,
    /// Language code; compared lowercased.
    pub lang_code: String,
}

/// Atomic NFT state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NftState {
    /// Holder balances; at most one entry is 1, the rest are 0.
    #[serde(default)]
    pub balances: BTreeMap<Address, u64>,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Token name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Token ticker.
    #[serde(default)]
    pub ticker: String,
    /// MIME type of the bound content.
    #[serde(default)]
    pub content_type: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: u64,
    /// Wiki contract whose page this token represents.
    pub linked_contract: Address,
    /// Page inside the linked contract.
    #[serde(default)]
    pub linked_properties: LinkedProperties,
}

impl NftState {
    /// Current holder, if any.
    #[must_use]
    pub fn owner(&self) -> Option<&Address> {
        self.balances
            .iter()
            .find(|(_, balance)| **balance > 0)
            .map(|(address, _)| address)
    }

    /// Balance of `address`; unknown holders have 0.
    #[must_use]
    pub fn balance_of(&self, address: &Address) -> u64 {
        self.balances.get(address).copied().unwrap_or(0)
    }
}
