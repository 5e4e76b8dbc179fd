//! # Token Rules
//!
//! Each rule validates in a fixed order and rejects with the first failing
//! check's message.

use crate::domain::entities::NftState;
use aw_01_wiki_contract::domain::entities::WikiState;
use aw_01_wiki_contract::domain::value_objects::is_moderator_role;
use shared_types::{ensure, is_integer, is_safe_integer, Address, ContractError};

fn parse_target(raw: Option<&str>) -> Result<Address, ContractError> {
    let raw = raw.unwrap_or_default();
    ensure(!raw.is_empty(), "Target must be defined.")?;
    Address::parse(raw).ok_or_else(|| ContractError::rejected("Invalid target address."))
}

/// Resolves the `balance` target: absent or empty means the caller.
///
/// # Errors
///
/// `Invalid target address.` for a malformed target.
pub fn balance_target(caller: &Address, target: Option<&str>) -> Result<Address, ContractError> {
    match target.filter(|t| !t.is_empty()) {
        None => Ok(caller.clone()),
        Some(raw) => {
            Address::parse(raw).ok_or_else(|| ContractError::rejected("Invalid target address."))
        }
    }
}

/// Moves the token to the sponsor of the linked page.
///
/// Anyone may call this; the linked wiki state decides who may receive.
/// Every existing holder is zeroed and `target` ends with balance 1.
///
/// # Errors
///
/// Rejects when the target is malformed or already holds the token, when
/// the linked page is missing or sponsored by someone else, or when `qty`
/// is not exactly 1.
pub fn transfer(
    state: &mut NftState,
    linked: &WikiState,
    target: Option<&str>,
    qty: Option<f64>,
) -> Result<(), ContractError> {
    let target = parse_target(target)?;
    ensure(state.balance_of(&target) == 0, "Target is the current owner.")?;

    let lang = state.linked_properties.lang_code.to_lowercase();
    let pages = linked
        .pages
        .get(&lang)
        .ok_or_else(|| ContractError::rejected("LangCode does not exist on pages."))?;
    let page = pages
        .get(&state.linked_properties.slug)
        .ok_or_else(|| ContractError::rejected("Slug does not exist on pages."))?;
    ensure(
        page.sponsor.as_ref() == Some(&target),
        "Target is not the page sponsor.",
    )?;

    let qty = qty.unwrap_or(f64::NAN);
    ensure(is_integer(qty), "Invalid type for qty.")?;
    ensure(is_safe_integer(qty), "qty is too big.")?;
    ensure((qty - 1.0).abs() < f64::EPSILON, "qty must be 1.")?;

    for balance in state.balances.values_mut() {
        *balance = 0;
    }
    state.balances.insert(target, 1);
    Ok(())
}

/// Points the token at another wiki contract.
///
/// `linked` is the state of the contract currently linked, where the caller
/// must hold the moderator role.
///
/// # Errors
///
/// `Caller must be a Moderator.` or an address validation message.
pub fn update_linked_contract(
    state: &mut NftState,
    linked: &WikiState,
    caller: &Address,
    contract_address: Option<&str>,
) -> Result<(), ContractError> {
    ensure(
        linked.role_of(caller).is_some_and(is_moderator_role),
        "Caller must be a Moderator.",
    )?;
    let raw = contract_address
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ContractError::rejected("Invalid new linkedContract address type"))?;
    state.linked_contract = Address::parse(raw)
        .ok_or_else(|| ContractError::rejected("Invalid new linkedContract address"))?;
    Ok(())
}

/// Single Holder: no more than one address holds a non-zero balance and no
/// balance exceeds 1.
#[must_use]
pub fn check_single_holder(state: &NftState) -> bool {
    state.balances.values().all(|b| *b <= 1)
        && state.balances.values().filter(|b| **b > 0).count() <= 1
}

// =============================================================================
// TESTS
// =============================================================================
