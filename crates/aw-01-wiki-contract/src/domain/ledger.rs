//! # Ledger Primitives
//!
//! Pure accounting helpers over the three sub-ledgers (free balances, vault,
//! stakes). Governance and moderation both build on these.
//!
//! ## Supply
//!
//! `total_supply` always includes stakes. Every write that increases any
//! sub-ledger is preceded by `ensure_supply_headroom`.

use crate::domain::entities::{Balances, LockRecord, Stakes, Vault, WikiState};
use shared_types::{Address, ContractError, SAFE_INTEGER_MAX};

// =============================================================================
// VAULT
// =============================================================================

/// Sums the balance of every lock of `address` that is open at `target`
/// (`start <= target < end`).
#[must_use]
pub fn vault_balance_covering_height(vault: &Vault, address: &Address, target: u64) -> u64 {
    vault.get(address).map_or(0, |locks| {
        locks
            .iter()
            .filter(|lock| lock.end > target && lock.start <= target)
            .fold(0u64, |acc, lock| acc.saturating_add(lock.balance))
    })
}

/// Sums every lock of `address`, expired or not.
#[must_use]
pub fn vault_total(vault: &Vault, address: &Address) -> u64 {
    vault.get(address).map_or(0, |locks| {
        locks
            .iter()
            .fold(0u64, |acc, lock| acc.saturating_add(lock.balance))
    })
}

/// Sums the locks of `address` that have not expired at `height`.
#[must_use]
pub fn unexpired_vault_balance(vault: &Vault, address: &Address, height: u64) -> u64 {
    vault.get(address).map_or(0, |locks| {
        locks
            .iter()
            .filter(|lock| !lock.is_expired_at(height))
            .fold(0u64, |acc, lock| acc.saturating_add(lock.balance))
    })
}

/// Appends a lock record to `address`'s vault, creating the entry if needed.
pub fn append_lock(vault: &mut Vault, address: &Address, record: LockRecord) {
    vault.entry(address.clone()).or_default().push(record);
}

// =============================================================================
// BALANCES
// =============================================================================

/// Free balance of `address` (zero when absent).
#[must_use]
pub fn free_balance(balances: &Balances, address: &Address) -> u64 {
    balances.get(address).copied().unwrap_or(0)
}

/// Adds `amount` to `address`'s free balance, creating the entry if needed.
pub fn credit(balances: &mut Balances, address: &Address, amount: u64) {
    let entry = balances.entry(address.clone()).or_insert(0);
    *entry = entry.saturating_add(amount);
}

/// Removes `amount` from `address`'s free balance.
///
/// Callers check the balance first; the entry saturates at zero otherwise.
pub fn debit(balances: &mut Balances, address: &Address, amount: u64) {
    if let Some(entry) = balances.get_mut(address) {
        *entry = entry.saturating_sub(amount);
    }
}

// =============================================================================
// STAKES
// =============================================================================

/// Stake held by `address` on a page.
#[must_use]
pub fn stake_of(stakes: &Stakes, address: &Address, lang: &str, slug: &str) -> Option<u64> {
    stakes
        .get(address)
        .and_then(|langs| langs.get(lang))
        .and_then(|slugs| slugs.get(slug))
        .copied()
}

/// Sums every stake of `address`.
#[must_use]
pub fn staking_balance(stakes: &Stakes, address: &Address) -> u64 {
    stakes.get(address).map_or(0, |langs| {
        langs
            .values()
            .flat_map(|slugs| slugs.values())
            .fold(0u64, |acc, v| acc.saturating_add(*v))
    })
}

/// Records a stake, overwriting any previous amount on the same page.
pub fn insert_stake(stakes: &mut Stakes, address: &Address, lang: &str, slug: &str, amount: u64) {
    stakes
        .entry(address.clone())
        .or_default()
        .entry(lang.to_string())
        .or_default()
        .insert(slug.to_string(), amount);
}

/// Removes a stake and returns its amount. Empty intermediate maps are pruned.
pub fn remove_stake(stakes: &mut Stakes, address: &Address, lang: &str, slug: &str) -> Option<u64> {
    let langs = stakes.get_mut(address)?;
    let slugs = langs.get_mut(lang)?;
    let amount = slugs.remove(slug)?;
    if slugs.is_empty() {
        langs.remove(lang);
    }
    if langs.is_empty() {
        stakes.remove(address);
    }
    Some(amount)
}

// =============================================================================
// SUPPLY
// =============================================================================

/// Total tokens in existence: free balances + every lock + every stake.
#[must_use]
pub fn total_supply(state: &WikiState) -> u128 {
    let balances: u128 = state.balances.values().map(|v| u128::from(*v)).sum();
    let vault: u128 = state
        .vault
        .values()
        .flatten()
        .map(|lock| u128::from(lock.balance))
        .sum();
    let stakes: u128 = state
        .stakes
        .values()
        .flat_map(|langs| langs.values())
        .flat_map(|slugs| slugs.values())
        .map(|v| u128::from(*v))
        .sum();
    balances + vault + stakes
}

/// Rejects with `QuantityTooLarge(message)` if adding `delta` to the total
/// supply would exceed [`SAFE_INTEGER_MAX`].
///
/// # Errors
///
/// Returns [`ContractError::QuantityTooLarge`] when there is no headroom.
pub fn ensure_supply_headroom(
    state: &WikiState,
    delta: u64,
    message: &str,
) -> Result<(), ContractError> {
    if total_supply(state) + u128::from(delta) > u128::from(SAFE_INTEGER_MAX) {
        return Err(ContractError::QuantityTooLarge(message.to_string()));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
