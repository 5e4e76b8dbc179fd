//! # Wiki Contract Service
//!
//! Dispatches decoded interactions to the domain handlers.
//!
//! ## Atomicity
//!
//! Mutating operations run against a working copy of the state. The copy
//! replaces the caller's state only after the handler and, when enabled,
//! the invariant checks succeed. A rejected interaction is never
//! observable.

use crate::domain::entities::WikiState;
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult, InvariantViolation};
use crate::domain::moderation::Upsert;
use crate::errors::StateError;
use crate::domain::{governance, moderation, token};
use crate::input::ContractInput;
use crate::output::{HandleResponse, QueryResult};
use crate::ports::inbound::WikiContractApi;
use shared_types::{Address, BlockContext, ContractError, Interaction};
use tracing::{debug, info, instrument, warn};

/// Wiki contract configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractConfig {
    /// `updatePageSponsor` also requires locked balance covering the page
    /// approval horizon worth at least the new value.
    pub require_sponsor_vault_balance: bool,
    /// Re-check whole-state invariants after every mutating call.
    pub verify_invariants: bool,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            require_sponsor_vault_balance: false,
            verify_invariants: true,
        }
    }
}

/// Statistics for the wiki contract service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Interactions received.
    pub interactions: u64,
    /// Mutating interactions applied.
    pub state_updates: u64,
    /// Queries answered.
    pub queries: u64,
    /// Interactions rejected.
    pub rejections: u64,
}

/// The wiki contract service.
#[derive(Debug, Default)]
pub struct WikiContractService {
    config: ContractConfig,
    stats: ServiceStats,
}

impl WikiContractService {
    /// Create a new service.
    #[must_use]
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config,
            stats: ServiceStats::default(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Current service statistics.
    #[must_use]
    pub fn stats(&self) -> &ServiceStats {
        &self.stats
    }
}

impl WikiContractApi for WikiContractService {
    #[instrument(
        skip(self, state, interaction),
        fields(
            function = interaction.function().unwrap_or_default(),
            caller = %interaction.caller,
            height = block.height,
        )
    )]
    fn apply_interaction(
        &mut self,
        state: &mut WikiState,
        interaction: &Interaction,
        block: BlockContext,
    ) -> Result<Option<QueryResult>, ContractError> {
        self.stats.interactions += 1;
        let outcome = execute(state, interaction, block, &self.config);
        match &outcome {
            Ok(Some(_)) => {
                self.stats.queries += 1;
                debug!("query answered");
            }
            Ok(None) => {
                self.stats.state_updates += 1;
                debug!("state updated");
            }
            Err(e) => {
                self.stats.rejections += 1;
                warn!(reason = %e, "interaction rejected");
            }
        }
        outcome
    }
}

/// The contract entry point: applies one interaction to an owned state and
/// returns `{state}` or `{result}`.
///
/// # Errors
///
/// Returns the rejection reason when any precondition fails; the state is
/// dropped in that case and the caller keeps using its previous snapshot.
pub fn handle(
    mut state: WikiState,
    interaction: &Interaction,
    block: BlockContext,
    config: &ContractConfig,
) -> Result<HandleResponse, ContractError> {
    Ok(match execute(&mut state, interaction, block, config)? {
        Some(result) => HandleResponse::Result(result),
        None => HandleResponse::State(state),
    })
}

/// Parses an initial or persisted state and verifies its invariants.
///
/// # Errors
///
/// Returns `StateError::Malformed` when the JSON does not describe a wiki
/// state and `StateError::Inconsistent` when it breaks an invariant.
pub fn load_state(value: serde_json::Value) -> Result<WikiState, StateError> {
    let state: WikiState = serde_json::from_value(value)?;
    if let InvariantCheckResult::Invalid(violations) = check_all_invariants(&state) {
        return Err(StateError::Inconsistent(join_violations(&violations)));
    }
    Ok(state)
}

fn join_violations(violations: &[InvariantViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn execute(
    state: &mut WikiState,
    interaction: &Interaction,
    block: BlockContext,
    config: &ContractConfig,
) -> Result<Option<QueryResult>, ContractError> {
    let input = ContractInput::decode(&interaction.input)?;
    debug!(function = input.function_name(), "input decoded");
    if input.is_query() {
        return dispatch(state, input, &interaction.caller, block.height, config);
    }

    let mut working = state.clone();
    dispatch(&mut working, input, &interaction.caller, block.height, config)?;
    if config.verify_invariants {
        if let InvariantCheckResult::Invalid(violations) = check_all_invariants(&working) {
            return Err(ContractError::InvariantViolated(join_violations(&violations)));
        }
    }
    *state = working;
    Ok(None)
}

fn dispatch(
    state: &mut WikiState,
    input: ContractInput,
    caller: &Address,
    height: u64,
    config: &ContractConfig,
) -> Result<Option<QueryResult>, ContractError> {
    match input {
        // Queries
        ContractInput::Balance(q) => {
            return Ok(Some(QueryResult::Balance(token::balance(state, caller, &q))));
        }
        ContractInput::UnlockedBalance(q) => {
            return token::unlocked_balance(state, caller, &q)
                .map(|r| Some(QueryResult::Balance(r)));
        }
        ContractInput::VaultBalance(q) => {
            return Ok(Some(QueryResult::Balance(token::vault_balance(
                state, caller, &q, height,
            ))));
        }
        ContractInput::BalanceDetail(q) => {
            return Ok(Some(QueryResult::BalanceDetail(token::balance_detail(
                state, caller, &q,
            ))));
        }
        ContractInput::Role(q) => {
            return token::role(state, caller, &q).map(|r| Some(QueryResult::Role(r)));
        }

        // Ledger
        ContractInput::Transfer(i) => token::transfer(state, caller, &i)?,
        ContractInput::Lock(i) => token::lock(state, caller, &i, height)?,
        ContractInput::IncreaseVault(i) => token::increase_vault(state, caller, &i, height)?,
        ContractInput::Unlock => {
            let released = token::unlock(state, caller, height);
            debug!(released, "expired locks released");
        }
        ContractInput::Evolve(i) => token::evolve(state, caller, &i)?,

        // Governance
        ContractInput::Propose(i) => {
            let vote_id = governance::propose(state, caller, &i, height)?;
            let vote_type = state.votes[vote_id].proposal.vote_type();
            info!(vote_id, ?vote_type, "vote opened");
        }
        ContractInput::Vote(i) => governance::vote(state, caller, &i, height)?,
        ContractInput::Finalize(i) => {
            let status = governance::finalize(state, &i, height)?;
            info!(?status, "vote finalized");
        }

        // Moderation
        ContractInput::ApprovePage(i) => moderation::approve_page(state, caller, &i, height)?,
        ContractInput::UpdatePageSponsor(i) => moderation::update_page_sponsor(
            state,
            caller,
            &i,
            height,
            config.require_sponsor_vault_balance,
        )?,
        ContractInput::StopPageSponsorshipAndDeactivatePage(i) => {
            moderation::stop_page_sponsorship(state, caller, &i)?;
        }
        ContractInput::AddPageUpdate(i) => moderation::add_page_update(state, caller, &i, height)?,
        ContractInput::ActivateDeactivatePage(i) => {
            moderation::activate_deactivate_page(state, caller, &i)?;
        }
        ContractInput::UpdatePageProperties(i) => {
            moderation::update_page_properties(state, caller, &i, height)?;
        }
        ContractInput::AddLanguage(i) => {
            moderation::upsert_language(state, caller, &i, height, Upsert::Add)?;
        }
        ContractInput::UpdateLanguage(i) => {
            moderation::upsert_language(state, caller, &i, height, Upsert::Update)?;
        }
        ContractInput::AddCategory(i) => {
            moderation::upsert_category(state, caller, &i, height, Upsert::Add)?;
        }
        ContractInput::UpdateCategory(i) => {
            moderation::upsert_category(state, caller, &i, height, Upsert::Update)?;
        }
    }
    Ok(None)
}

// =============================================================================
// TESTS
// =============================================================================
