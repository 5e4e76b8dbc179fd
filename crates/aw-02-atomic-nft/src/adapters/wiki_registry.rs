//! In-memory wiki state registry.
//!
//! Implements `LinkedStateReader` over a map of published wiki states.
//! Hosts publish a snapshot after every accepted wiki interaction.

use crate::ports::outbound::LinkedStateReader;
use async_trait::async_trait;
use aw_01_wiki_contract::domain::entities::WikiState;
use parking_lot::RwLock;
use shared_types::{Address, ContractError};
use std::collections::HashMap;
use tracing::debug;

/// Registry of wiki states keyed by contract address.
#[derive(Debug, Default)]
pub struct InMemoryWikiRegistry {
    states: RwLock<HashMap<Address, WikiState>>,
}

impl InMemoryWikiRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish (or replace) the state of `contract`.
    pub fn publish(&self, contract: Address, state: WikiState) {
        self.states.write().insert(contract, state);
    }

    /// Number of registered contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    /// True when no contract is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

#[async_trait]
impl LinkedStateReader for InMemoryWikiRegistry {
    async fn read_wiki_state(&self, contract: &Address) -> Result<WikiState, ContractError> {
        let found = self.states.read().get(contract).cloned();
        debug!(%contract, found = found.is_some(), "linked state read");
        found.ok_or_else(|| ContractError::RemoteState(format!("unknown contract {contract}")))
    }
}
