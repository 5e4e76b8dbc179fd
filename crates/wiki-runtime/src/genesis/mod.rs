//! # Genesis Module
//!
//! The genesis file lists every hosted contract by address:
//!
//! ```json
//! {
//!   "contracts": {
//!     "<wiki address>": { "kind": "wiki", "name": "ArWiki", "ticker": "AWK", ... },
//!     "<nft address>":  { "kind": "atomicNft", "linkedContract": "<wiki address>", ... }
//!   }
//! }
//! ```
//!
//! Wiki entries are `GenesisConfig`s built through `GenesisBuilder`; atomic
//! NFT entries are complete `NftState`s.

pub mod builder;

pub use builder::{GenesisBuilder, GenesisConfig, GenesisError, GenesisLanguage, GenesisLock};

use aw_02_atomic_nft::domain::entities::NftState;
use serde::Deserialize;
use shared_types::Address;
use std::collections::BTreeMap;
use std::path::Path;

/// Genesis entry of one hosted contract.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContractGenesis {
    /// A wiki contract built from its configuration.
    Wiki(GenesisConfig),
    /// An atomic NFT with its full initial state.
    AtomicNft(NftState),
}

/// The genesis file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenesisFile {
    /// Hosted contracts by address.
    pub contracts: BTreeMap<Address, ContractGenesis>,
}

impl GenesisFile {
    /// Reads and parses a genesis file.
    ///
    /// # Errors
    ///
    /// `GenesisError::Io` or `GenesisError::Parse`.
    pub fn load(path: &Path) -> Result<Self, GenesisError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
