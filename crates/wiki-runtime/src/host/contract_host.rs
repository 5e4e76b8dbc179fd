//! Interaction replay over the hosted contracts.

use crate::container::RuntimeConfig;
use crate::genesis::{ContractGenesis, GenesisBuilder, GenesisError, GenesisFile};
use crate::host::store::{ContractStore, HostedContract};
use aw_01_wiki_contract::ports::inbound::WikiContractApi;
use aw_01_wiki_contract::service::{ContractConfig, WikiContractService};
use aw_02_atomic_nft::ports::inbound::AtomicNftApi;
use aw_02_atomic_nft::service::AtomicNftService;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use shared_types::{Address, BlockContext, ContractError, Interaction};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Host errors. Contract rejections are not errors at this level.
#[derive(Debug, Error)]
pub enum HostError {
    /// A record's height is below its predecessor's in strict mode.
    #[error("height went backwards: {height} after {previous}")]
    HeightRegression {
        /// Height of the previous applied record.
        previous: u64,
        /// Height of the offending record.
        height: u64,
    },

    /// The interaction log could not be read.
    #[error("failed to read interaction log: {0}")]
    Io(#[from] std::io::Error),

    /// A state or log document failed to (de)serialize.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One entry of the interaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Target contract.
    pub contract: Address,
    /// Block height of the interaction.
    pub height: u64,
    /// Authenticated caller.
    pub caller: Address,
    /// Raw operation input.
    pub input: serde_json::Value,
}

impl InteractionRecord {
    /// Reads a JSON array of records.
    ///
    /// # Errors
    ///
    /// `HostError::Io` or `HostError::Serialization`.
    pub fn load_log(path: &Path) -> Result<Vec<Self>, HostError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Totals of one replay.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Interactions applied (mutations and queries).
    pub accepted: u64,
    /// Interactions rejected by their contract.
    pub rejected: u64,
    /// Records skipped for a height regression.
    pub skipped: u64,
    /// SHA-256 of each final state, hex encoded.
    pub digests: BTreeMap<Address, String>,
}

enum RecordOutcome {
    Applied,
    Rejected,
    Skipped,
}

/// SHA-256 over the canonical JSON of a contract state.
///
/// # Errors
///
/// Fails only if the state cannot be serialized.
pub fn state_digest(contract: &HostedContract) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(contract)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// The reference host.
pub struct ContractHost {
    store: Arc<ContractStore>,
    wiki: WikiContractService,
    nft: AtomicNftService<ContractStore>,
    strict_heights: bool,
    last_height: Option<u64>,
}

impl ContractHost {
    /// Create an empty host.
    #[must_use]
    pub fn new(contract: ContractConfig, strict_heights: bool) -> Self {
        let store = Arc::new(ContractStore::new());
        Self {
            nft: AtomicNftService::new(Arc::clone(&store)),
            store,
            wiki: WikiContractService::new(contract),
            strict_heights,
            last_height: None,
        }
    }

    /// Create a host with every contract of a genesis file deployed.
    ///
    /// # Errors
    ///
    /// The first wiki configuration that fails to build.
    pub fn from_genesis(genesis: GenesisFile, config: &RuntimeConfig) -> Result<Self, GenesisError> {
        let host = Self::new(config.contract, config.strict_heights);
        for (address, entry) in genesis.contracts {
            let contract = match entry {
                ContractGenesis::Wiki(wiki) => HostedContract::Wiki(GenesisBuilder::new(wiki).build()?),
                ContractGenesis::AtomicNft(nft) => HostedContract::AtomicNft(nft),
            };
            host.deploy(address, contract);
        }
        Ok(host)
    }

    /// Deploy (or replace) a contract.
    pub fn deploy(&self, address: Address, contract: HostedContract) {
        info!(%address, kind = contract.kind(), "contract deployed");
        self.store.put(address, contract);
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<ContractStore> {
        &self.store
    }

    /// Replays `records` in order.
    ///
    /// # Errors
    ///
    /// `HostError::HeightRegression` in strict mode; serialization failure
    /// while computing digests.
    pub async fn replay(&mut self, records: &[InteractionRecord]) -> Result<ReplaySummary, HostError> {
        let mut summary = ReplaySummary::default();
        for record in records {
            let span = info_span!(
                "interaction",
                correlation_id = %Uuid::new_v4(),
                contract = %record.contract,
                height = record.height,
            );
            match self.apply(record).instrument(span).await? {
                RecordOutcome::Applied => summary.accepted += 1,
                RecordOutcome::Rejected => summary.rejected += 1,
                RecordOutcome::Skipped => summary.skipped += 1,
            }
        }
        summary.digests = self.digests()?;
        info!(
            accepted = summary.accepted,
            rejected = summary.rejected,
            skipped = summary.skipped,
            "replay complete"
        );
        Ok(summary)
    }

    /// Digest of every hosted state.
    ///
    /// # Errors
    ///
    /// Serialization failure.
    pub fn digests(&self) -> Result<BTreeMap<Address, String>, HostError> {
        let mut digests = BTreeMap::new();
        for (address, contract) in self.store.snapshot() {
            let digest = state_digest(&contract)?;
            digests.insert(address, digest);
        }
        Ok(digests)
    }

    async fn apply(&mut self, record: &InteractionRecord) -> Result<RecordOutcome, HostError> {
        if let Some(previous) = self.last_height.filter(|p| record.height < *p) {
            if self.strict_heights {
                return Err(HostError::HeightRegression {
                    previous,
                    height: record.height,
                });
            }
            warn!(previous, "height went backwards, record skipped");
            return Ok(RecordOutcome::Skipped);
        }
        self.last_height = Some(record.height);

        let interaction = Interaction::new(record.caller.clone(), record.input.clone());
        let outcome = match self.store.get(&record.contract) {
            Some(HostedContract::Wiki(mut state)) => self
                .wiki
                .apply_interaction(&mut state, &interaction, BlockContext::at(record.height))
                .map(|result| {
                    if let Some(result) = result {
                        debug!(result = ?result, "query answered");
                    } else {
                        self.store.put(record.contract.clone(), HostedContract::Wiki(state));
                    }
                }),
            Some(HostedContract::AtomicNft(mut state)) => self
                .nft
                .apply_interaction(&mut state, &interaction)
                .await
                .map(|result| {
                    if let Some(result) = result {
                        debug!(result = ?result, "query answered");
                    } else {
                        self.store.put(record.contract.clone(), HostedContract::AtomicNft(state));
                    }
                }),
            None => Err(ContractError::rejected(format!(
                "Unknown contract {}",
                record.contract
            ))),
        };

        Ok(match outcome {
            Ok(()) => RecordOutcome::Applied,
            Err(e) => {
                warn!(reason = %e, "interaction rejected");
                RecordOutcome::Rejected
            }
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
