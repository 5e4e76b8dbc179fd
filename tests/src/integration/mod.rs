//! Integration fixtures and test modules.

use aw_01_wiki_contract::domain::entities::WikiState;
use aw_01_wiki_contract::output::HandleResponse;
use aw_01_wiki_contract::service::{handle, ContractConfig};
use serde_json::Value;
use shared_types::{Address, BlockContext, ContractError, Interaction};
use wiki_runtime::{GenesisBuilder, GenesisConfig};

mod nft_link;
mod properties;
mod scenarios;

/// A valid address made of one repeated character.
///
/// # Panics
///
/// Panics if `c` is not a base64url character.
#[must_use]
pub fn addr(c: char) -> Address {
    Address::parse(&c.to_string().repeat(43)).expect("fixture address")
}

/// Applies one interaction through the public entry point with the default
/// configuration.
///
/// # Errors
///
/// The contract's rejection.
pub fn call(
    state: &WikiState,
    caller: &Address,
    height: u64,
    input: Value,
) -> Result<HandleResponse, ContractError> {
    handle(
        state.clone(),
        &Interaction::new(caller.clone(), input),
        BlockContext::at(height),
        &ContractConfig::default(),
    )
}

/// Applies a mutation and returns the new state.
///
/// # Panics
///
/// Panics when the interaction is rejected or answers with a result.
#[must_use]
pub fn apply(state: &WikiState, caller: &Address, height: u64, input: Value) -> WikiState {
    call(state, caller, height, input)
        .expect("interaction accepted")
        .into_state()
        .expect("mutation returns state")
}

/// Builds a wiki from a genesis JSON document.
///
/// # Panics
///
/// Panics when the document does not describe a valid genesis.
#[must_use]
pub fn wiki_from_genesis(genesis: Value) -> WikiState {
    let config: GenesisConfig = serde_json::from_value(genesis).expect("genesis config");
    GenesisBuilder::new(config).build().expect("genesis state")
}
