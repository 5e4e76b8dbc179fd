//! Hosted contract store.
//!
//! Implements `LinkedStateReader` so atomic NFTs can resolve the wiki state
//! they are linked to.

use async_trait::async_trait;
use aw_01_wiki_contract::domain::entities::WikiState;
use aw_02_atomic_nft::domain::entities::NftState;
use aw_02_atomic_nft::ports::outbound::LinkedStateReader;
use parking_lot::RwLock;
use serde::Serialize;
use shared_types::{Address, ContractError};
use std::collections::BTreeMap;

/// State of one hosted contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HostedContract {
    /// Wiki contract.
    Wiki(WikiState),
    /// Atomic NFT.
    AtomicNft(NftState),
}

impl HostedContract {
    /// Short contract kind for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Wiki(_) => "wiki",
            Self::AtomicNft(_) => "atomicNft",
        }
    }
}

/// Contract states keyed by address.
///
/// Readers receive clones; no lock is held across an await point.
#[derive(Debug, Default)]
pub struct ContractStore {
    contracts: RwLock<BTreeMap<Address, HostedContract>>,
}

impl ContractStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a contract state.
    pub fn put(&self, address: Address, contract: HostedContract) {
        self.contracts.write().insert(address, contract);
    }

    /// Clone of the state at `address`.
    #[must_use]
    pub fn get(&self, address: &Address) -> Option<HostedContract> {
        self.contracts.read().get(address).cloned()
    }

    /// Clone of every hosted state, ordered by address.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<Address, HostedContract> {
        self.contracts.read().clone()
    }

    /// Number of hosted contracts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.read().len()
    }

    /// True when nothing is hosted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.read().is_empty()
    }
}

#[async_trait]
impl LinkedStateReader for ContractStore {
    async fn read_wiki_state(&self, contract: &Address) -> Result<WikiState, ContractError> {
        match self.get(contract) {
            Some(HostedContract::Wiki(state)) => Ok(state),
            Some(other) => Err(ContractError::RemoteState(format!(
                "{contract} is a {} contract, not a wiki",
                other.kind()
            ))),
            None => Err(ContractError::RemoteState(format!("unknown contract {contract}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aw_02_atomic_nft::domain::entities::LinkedProperties;

    fn addr(c: char) -> Address {
        Address::parse(&c.to_string().repeat(43)).unwrap()
    }

    #[tokio::test]
    async fn test_reads_only_wiki_states() {
        let store = ContractStore::new();
        store.put(addr('w'), HostedContract::Wiki(WikiState::new("ArWiki", "AWK")));
        store.put(
            addr('n'),
            HostedContract::AtomicNft(NftState {
                balances: BTreeMap::new(),
                title: String::new(),
                name: String::new(),
                description: String::new(),
                ticker: "AWP".to_string(),
                content_type: String::new(),
                created_at: 0,
                linked_contract: addr('w'),
                linked_properties: LinkedProperties::default(),
            }),
        );
        assert_eq!(store.len(), 2);

        assert_eq!(store.read_wiki_state(&addr('w')).await.unwrap().ticker, "AWK");
        let err = store.read_wiki_state(&addr('n')).await.unwrap_err();
        assert!(err.message().contains("not a wiki"));
        assert!(store.read_wiki_state(&addr('x')).await.is_err());
    }
}
