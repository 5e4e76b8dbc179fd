//! # Driven Ports (SPI - Outbound Dependencies)

use async_trait::async_trait;
use aw_01_wiki_contract::domain::entities::WikiState;
use shared_types::{Address, ContractError};

/// Resolves the current state of another contract.
///
/// One read per `transfer` or `updateLinkedContract`. Implementations must
/// return the state as of the interaction being evaluated.
#[async_trait]
pub trait LinkedStateReader: Send + Sync {
    /// Reads the wiki state stored at `contract`.
    ///
    /// # Errors
    ///
    /// `ContractError::RemoteState` when the contract is unknown or cannot
    /// be evaluated.
    async fn read_wiki_state(&self, contract: &Address) -> Result<WikiState, ContractError>;
}
