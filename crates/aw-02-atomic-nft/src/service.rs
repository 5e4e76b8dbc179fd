//! # Atomic NFT Service
//!
//! Resolves the linked wiki state through the `LinkedStateReader` port and
//! applies the token rules. Transfers and link updates each perform exactly
//! one remote read before any check runs; a failed read fails the call.

use crate::domain::entities::NftState;
use crate::domain::rules::{self, check_single_holder};
use crate::input::NftInput;
use crate::output::{LinkedInfoResult, NftBalanceResult, NftQueryResult, NftResponse};
use crate::ports::inbound::AtomicNftApi;
use crate::ports::outbound::LinkedStateReader;
use async_trait::async_trait;
use aw_01_wiki_contract::domain::entities::WikiState;
use parking_lot::Mutex;
use shared_types::{ContractError, Interaction};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Statistics for the atomic NFT service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NftServiceStats {
    /// Interactions received.
    pub interactions: u64,
    /// Linked-state reads performed.
    pub remote_reads: u64,
    /// Interactions rejected.
    pub rejections: u64,
}

/// The atomic NFT service.
pub struct AtomicNftService<R: LinkedStateReader> {
    reader: Arc<R>,
    stats: Mutex<NftServiceStats>,
}

impl<R: LinkedStateReader> AtomicNftService<R> {
    /// Create a service reading linked states through `reader`.
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            stats: Mutex::new(NftServiceStats::default()),
        }
    }

    /// Snapshot of the service statistics.
    #[must_use]
    pub fn stats(&self) -> NftServiceStats {
        self.stats.lock().clone()
    }

    /// Applies one interaction to an owned state and returns `{state}` or
    /// `{result}`.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason.
    pub async fn handle(
        &self,
        mut state: NftState,
        interaction: &Interaction,
    ) -> Result<NftResponse, ContractError> {
        Ok(match self.apply_interaction(&mut state, interaction).await? {
            Some(result) => NftResponse::Result(result),
            None => NftResponse::State(state),
        })
    }

    async fn execute(
        &self,
        state: &mut NftState,
        interaction: &Interaction,
    ) -> Result<Option<NftQueryResult>, ContractError> {
        let input = NftInput::decode(&interaction.input)?;
        let caller = &interaction.caller;

        match input {
            NftInput::Balance(i) => {
                let target = rules::balance_target(caller, i.target.as_deref())?;
                Ok(Some(NftQueryResult::Balance(NftBalanceResult {
                    balance: state.balance_of(&target),
                    target: target.to_string(),
                    ticker: state.ticker.clone(),
                })))
            }
            NftInput::LinkedInfo => Ok(Some(NftQueryResult::LinkedInfo(LinkedInfoResult {
                linked_contract: state.linked_contract.clone(),
                linked_properties: state.linked_properties.clone(),
            }))),
            NftInput::Transfer(i) => {
                let linked = self.read_linked(state).await?;
                let mut working = state.clone();
                rules::transfer(&mut working, &linked, i.target.as_deref(), i.qty)?;
                if !check_single_holder(&working) {
                    return Err(ContractError::InvariantViolated(
                        "more than one holder".to_string(),
                    ));
                }
                *state = working;
                Ok(None)
            }
            NftInput::UpdateLinkedContract(i) => {
                let linked = self.read_linked(state).await?;
                rules::update_linked_contract(state, &linked, caller, i.contract_address.as_deref())?;
                Ok(None)
            }
        }
    }

    async fn read_linked(&self, state: &NftState) -> Result<WikiState, ContractError> {
        self.stats.lock().remote_reads += 1;
        self.reader.read_wiki_state(&state.linked_contract).await
    }
}

#[async_trait]
impl<R: LinkedStateReader> AtomicNftApi for AtomicNftService<R> {
    #[instrument(
        skip(self, state, interaction),
        fields(function = interaction.function().unwrap_or_default(), caller = %interaction.caller)
    )]
    async fn apply_interaction(
        &self,
        state: &mut NftState,
        interaction: &Interaction,
    ) -> Result<Option<NftQueryResult>, ContractError> {
        self.stats.lock().interactions += 1;
        let outcome = self.execute(state, interaction).await;
        match &outcome {
            Ok(_) => debug!("nft interaction accepted"),
            Err(e) => {
                self.stats.lock().rejections += 1;
                warn!(reason = %e, "nft interaction rejected");
            }
        }
        outcome
    }
}

// =============================================================================
// TESTS
// =============================================================================
