//! # Token Operations
//!
//! Transfers, balance queries, vault locking and the owner-only `evolve`.
//!
//! Every mutating function validates all of its preconditions before its
//! first write, so a rejection leaves the state untouched.

use crate::domain::entities::{LockRecord, Settings, WikiState};
use crate::domain::ledger::{
    append_lock, credit, debit, free_balance, staking_balance, unexpired_vault_balance,
    vault_total,
};
use crate::input::{EvolveInput, IncreaseVaultInput, LockInput, TargetInput, TransferInput};
use crate::output::{BalanceDetailResult, BalanceResult, RoleResult};
use shared_types::{
    ensure, is_integer, non_negative_integer, positive_integer, Address, ContractError,
    SAFE_INTEGER_MAX,
};

// =============================================================================
// HELPERS
// =============================================================================

/// Resolves an optional query target; missing or empty means the caller.
fn resolve_target(target: Option<&str>, caller: &Address) -> String {
    match target {
        Some(t) if !t.is_empty() => t.to_string(),
        _ => caller.to_string(),
    }
}

/// Validates a lock length against the current bounds.
///
/// # Errors
///
/// Rejects anything that is not an integer within
/// `[lockMinLength, lockMaxLength]`.
#[allow(clippy::cast_precision_loss)]
pub fn validate_lock_length(settings: &Settings, lock_length: Option<f64>) -> Result<u64, ContractError> {
    let out_of_range = || {
        ContractError::rejected(format!(
            "lockLength is out of range. lockLength must be between {} - {}.",
            settings.lock_min_length, settings.lock_max_length
        ))
    };
    let value = lock_length.ok_or_else(out_of_range)?;
    if !is_integer(value)
        || value < settings.lock_min_length as f64
        || value > settings.lock_max_length as f64
    {
        return Err(out_of_range());
    }
    non_negative_integer(value).ok_or_else(out_of_range)
}

// =============================================================================
// TRANSFER
// =============================================================================

/// Moves `qty` from the caller's free balance to `target`.
///
/// # Errors
///
/// Rejects invalid quantities or targets, self-transfers and insufficient
/// balances.
pub fn transfer(
    state: &mut WikiState,
    caller: &Address,
    input: &TransferInput,
) -> Result<(), ContractError> {
    let qty = input.qty.unwrap_or(f64::NAN);
    ensure(is_integer(qty), "Invalid value for \"qty\". Must be an integer.")?;

    let raw_target = input
        .target
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ContractError::rejected("No target specified."))?;
    let target = Address::parse(raw_target).ok_or_else(|| ContractError::rejected("Invalid target."))?;

    ensure(qty > 0.0 && &target != caller, "Invalid token transfer.")?;
    let qty = positive_integer(qty).ok_or_else(|| ContractError::rejected("Invalid token transfer."))?;

    let balance = state
        .balances
        .get(caller)
        .copied()
        .ok_or_else(|| ContractError::rejected("Caller doesn't own any DAO balance."))?;
    ensure(
        balance >= qty,
        format!("Caller balance not high enough to send {qty} token(s)!"),
    )?;
    ensure(
        free_balance(&state.balances, &target) <= SAFE_INTEGER_MAX - qty,
        "Final balance for target is too big.",
    )?;

    debit(&mut state.balances, caller, qty);
    credit(&mut state.balances, &target, qty);
    Ok(())
}

// =============================================================================
// QUERIES
// =============================================================================

/// Free balance plus every lock and every stake of the target.
#[must_use]
pub fn balance(state: &WikiState, caller: &Address, input: &TargetInput) -> BalanceResult {
    let target = resolve_target(input.target.as_deref(), caller);
    let balance = Address::parse(&target).map_or(0, |address| {
        free_balance(&state.balances, &address)
            .saturating_add(vault_total(&state.vault, &address))
            .saturating_add(staking_balance(&state.stakes, &address))
    });
    BalanceResult {
        target,
        ticker: state.ticker.clone(),
        balance,
    }
}

/// Free balance of the target.
///
/// # Errors
///
/// Rejects targets without a balance entry.
pub fn unlocked_balance(
    state: &WikiState,
    caller: &Address,
    input: &TargetInput,
) -> Result<BalanceResult, ContractError> {
    let target = resolve_target(input.target.as_deref(), caller);
    let balance = Address::parse(&target)
        .and_then(|address| state.balances.get(&address).copied())
        .ok_or_else(|| ContractError::rejected("Cannot get balance, target does not exist."))?;
    Ok(BalanceResult {
        target,
        ticker: state.ticker.clone(),
        balance,
    })
}

/// Sum of the target's locks that have not expired at `height`.
#[must_use]
pub fn vault_balance(
    state: &WikiState,
    caller: &Address,
    input: &TargetInput,
    height: u64,
) -> BalanceResult {
    let target = resolve_target(input.target.as_deref(), caller);
    let balance = Address::parse(&target)
        .map_or(0, |address| unexpired_vault_balance(&state.vault, &address, height));
    BalanceResult {
        target,
        ticker: state.ticker.clone(),
        balance,
    }
}

/// The target's balance split into free, vault and stake components.
#[must_use]
pub fn balance_detail(
    state: &WikiState,
    caller: &Address,
    input: &TargetInput,
) -> BalanceDetailResult {
    let target = resolve_target(input.target.as_deref(), caller);
    let (unlocked, vault, staking) = Address::parse(&target).map_or((0, 0, 0), |address| {
        (
            free_balance(&state.balances, &address),
            vault_total(&state.vault, &address),
            staking_balance(&state.stakes, &address),
        )
    });
    BalanceDetailResult {
        target,
        ticker: state.ticker.clone(),
        unlocked_balance: unlocked,
        vault_balance: vault,
        staking_balance: staking,
    }
}

/// The target's role.
///
/// # Errors
///
/// Rejects targets whose role is missing or blank.
pub fn role(
    state: &WikiState,
    caller: &Address,
    input: &TargetInput,
) -> Result<RoleResult, ContractError> {
    let target = resolve_target(input.target.as_deref(), caller);
    let role = Address::parse(&target)
        .and_then(|address| state.role_of(&address).map(str::to_string))
        .unwrap_or_default();
    ensure(!role.trim().is_empty(), "Target doesn't have a role specified.")?;
    Ok(RoleResult { target, role })
}

// =============================================================================
// VAULT
// =============================================================================

/// Moves `qty` from the caller's free balance into a new lock
/// `[height, height + lockLength)`.
///
/// # Errors
///
/// Rejects non-positive quantities, out-of-range lengths and insufficient
/// balances.
pub fn lock(
    state: &mut WikiState,
    caller: &Address,
    input: &LockInput,
    height: u64,
) -> Result<(), ContractError> {
    let qty = input
        .qty
        .and_then(positive_integer)
        .ok_or_else(|| ContractError::rejected("Quantity must be a positive integer."))?;
    let lock_length = validate_lock_length(&state.settings, input.lock_length)?;

    let balance = state.balances.get(caller).copied();
    ensure(balance.is_some_and(|b| b >= qty), "Not enough balance.")?;

    debit(&mut state.balances, caller, qty);
    append_lock(
        &mut state.vault,
        caller,
        LockRecord::new(qty, height, height.saturating_add(lock_length)),
    );
    Ok(())
}

/// Moves the end of one of the caller's unexpired locks to
/// `height + lockLength`. The start is left unchanged.
///
/// # Errors
///
/// Rejects out-of-range lengths, callers without a vault, unknown ids and
/// locks that have already ended.
pub fn increase_vault(
    state: &mut WikiState,
    caller: &Address,
    input: &IncreaseVaultInput,
    height: u64,
) -> Result<(), ContractError> {
    let lock_length = validate_lock_length(&state.settings, input.lock_length)?;
    let locks = state
        .vault
        .get_mut(caller)
        .ok_or_else(|| ContractError::rejected("Caller does not have a vault."))?;
    let index = input
        .id
        .and_then(non_negative_integer)
        .and_then(|id| usize::try_from(id).ok())
        .filter(|id| *id < locks.len())
        .ok_or_else(|| ContractError::rejected("Invalid vault ID."))?;

    let record = &mut locks[index];
    ensure(!record.is_expired_at(height), "This vault has ended.")?;
    record.end = height.saturating_add(lock_length);
    Ok(())
}

/// Releases every expired lock of the caller back to their free balance.
///
/// Returns the released amount. Calling it again at the same height
/// releases nothing.
pub fn unlock(state: &mut WikiState, caller: &Address, height: u64) -> u64 {
    let Some(locks) = state.vault.get_mut(caller) else {
        return 0;
    };
    let (expired, kept): (Vec<LockRecord>, Vec<LockRecord>) =
        locks.drain(..).partition(|lock| lock.is_expired_at(height));
    *locks = kept;
    if expired.is_empty() {
        return 0;
    }
    let released = expired
        .iter()
        .fold(0u64, |acc, lock| acc.saturating_add(lock.balance));
    credit(&mut state.balances, caller, released);
    released
}

// =============================================================================
// EVOLVE
// =============================================================================

/// Records a new contract source when evolution is enabled. A no-op when it
/// is not.
///
/// # Errors
///
/// Rejects callers other than the owner, and a missing value.
pub fn evolve(
    state: &mut WikiState,
    caller: &Address,
    input: &EvolveInput,
) -> Result<(), ContractError> {
    if !state.can_evolve {
        return Ok(());
    }
    ensure(
        state.owner.as_ref() == Some(caller),
        "Only the owner can evolve a contract.",
    )?;
    let value = input
        .value
        .clone()
        .ok_or_else(|| ContractError::rejected("Evolve value must be specified."))?;
    state.evolve = Some(value);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::total_supply;
    use crate::domain::test_fixtures::{addr, funded_state};

    fn transfer_input(target: &Address, qty: f64) -> TransferInput {
        TransferInput {
            target: Some(target.to_string()),
            qty: Some(qty),
        }
    }

    #[test]
    fn test_transfer_moves_balance() {
        let (a, b) = (addr('a'), addr('b'));
        let mut state = funded_state(&[(&a, 100)]);
        transfer(&mut state, &a, &transfer_input(&b, 40.0)).unwrap();
        assert_eq!(state.balances[&a], 60);
        assert_eq!(state.balances[&b], 40);
        assert_eq!(total_supply(&state), 100);
    }

    #[test]
    fn test_transfer_rejections() {
        let (a, b) = (addr('a'), addr('b'));
        let state = funded_state(&[(&a, 100)]);

        let cases = [
            (transfer_input(&b, 1.5), "Invalid value for \"qty\". Must be an integer."),
            (
                TransferInput {
                    target: None,
                    qty: Some(1.0),
                },
                "No target specified.",
            ),
            (
                TransferInput {
                    target: Some("bad".to_string()),
                    qty: Some(1.0),
                },
                "Invalid target.",
            ),
            (transfer_input(&a, 1.0), "Invalid token transfer."),
            (transfer_input(&b, 0.0), "Invalid token transfer."),
            (transfer_input(&b, 101.0), "Caller balance not high enough to send 101 token(s)!"),
        ];
        for (input, message) in cases {
            let mut working = state.clone();
            let err = transfer(&mut working, &a, &input).unwrap_err();
            assert_eq!(err.message(), message);
            assert_eq!(working, state);
        }

        let mut working = state.clone();
        let err = transfer(&mut working, &b, &transfer_input(&a, 1.0)).unwrap_err();
        assert_eq!(err.message(), "Caller doesn't own any DAO balance.");
    }

    #[test]
    fn test_balance_queries() {
        let (a, b) = (addr('a'), addr('b'));
        let mut state = funded_state(&[(&a, 50)]);
        state.vault.insert(
            a.clone(),
            vec![LockRecord::new(10, 0, 5), LockRecord::new(20, 0, 50)],
        );
        crate::domain::ledger::insert_stake(&mut state.stakes, &a, "en", "home", 7);

        let total = balance(&state, &a, &TargetInput::default());
        assert_eq!(total.balance, 87);
        assert_eq!(total.target, a.to_string());
        assert_eq!(total.ticker, "AWK");

        let vault = vault_balance(&state, &b, &TargetInput { target: Some(a.to_string()) }, 5);
        assert_eq!(vault.balance, 20);

        let detail = balance_detail(&state, &a, &TargetInput::default());
        assert_eq!(
            (detail.unlocked_balance, detail.vault_balance, detail.staking_balance),
            (50, 30, 7)
        );

        let unknown = balance_detail(&state, &a, &TargetInput { target: Some(b.to_string()) });
        assert_eq!(unknown.unlocked_balance + unknown.vault_balance, 0);

        assert_eq!(
            unlocked_balance(&state, &b, &TargetInput::default())
                .unwrap_err()
                .message(),
            "Cannot get balance, target does not exist."
        );
    }

    #[test]
    fn test_role_query() {
        let a = addr('a');
        let mut state = funded_state(&[]);
        assert_eq!(
            role(&state, &a, &TargetInput::default()).unwrap_err().message(),
            "Target doesn't have a role specified."
        );
        state.roles.insert(a.clone(), "MODERATOR".to_string());
        assert_eq!(role(&state, &a, &TargetInput::default()).unwrap().role, "MODERATOR");
    }

    #[test]
    fn test_lock_creates_record() {
        let a = addr('a');
        let mut state = funded_state(&[(&a, 100)]);
        state.settings.lock_min_length = 10;
        let input = LockInput {
            qty: Some(30.0),
            lock_length: Some(10.0),
        };
        lock(&mut state, &a, &input, 5).unwrap();
        assert_eq!(state.balances[&a], 70);
        assert_eq!(state.vault[&a], vec![LockRecord::new(30, 5, 15)]);
    }

    #[test]
    fn test_lock_rejections() {
        let a = addr('a');
        let mut state = funded_state(&[(&a, 100)]);
        state.settings.lock_min_length = 10;
        state.settings.lock_max_length = 100;

        let err = lock(&mut state, &a, &LockInput { qty: Some(0.0), lock_length: Some(10.0) }, 0)
            .unwrap_err();
        assert_eq!(err.message(), "Quantity must be a positive integer.");

        let err = lock(&mut state, &a, &LockInput { qty: Some(5.0), lock_length: Some(9.0) }, 0)
            .unwrap_err();
        assert_eq!(
            err.message(),
            "lockLength is out of range. lockLength must be between 10 - 100."
        );

        let err = lock(&mut state, &a, &LockInput { qty: Some(101.0), lock_length: Some(10.0) }, 0)
            .unwrap_err();
        assert_eq!(err.message(), "Not enough balance.");
    }

    #[test]
    fn test_lock_then_unlock_roundtrip() {
        let a = addr('a');
        let mut state = funded_state(&[(&a, 100)]);
        state.settings.lock_min_length = 10;
        lock(&mut state, &a, &LockInput { qty: Some(30.0), lock_length: Some(10.0) }, 5).unwrap();

        assert_eq!(unlock(&mut state, &a, 14), 0);
        assert_eq!(state.balances[&a], 70);

        assert_eq!(unlock(&mut state, &a, 15), 30);
        assert_eq!(state.balances[&a], 100);
        assert!(state.vault[&a].is_empty());

        let snapshot = state.clone();
        assert_eq!(unlock(&mut state, &a, 15), 0);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_unlock_keeps_unexpired_and_releases_all_expired() {
        let a = addr('a');
        let mut state = funded_state(&[]);
        state.vault.insert(
            a.clone(),
            vec![
                LockRecord::new(1, 0, 10),
                LockRecord::new(2, 0, 30),
                LockRecord::new(4, 0, 10),
                LockRecord::new(8, 0, 20),
            ],
        );
        assert_eq!(unlock(&mut state, &a, 20), 13);
        assert_eq!(state.balances[&a], 13);
        assert_eq!(state.vault[&a], vec![LockRecord::new(2, 0, 30)]);
    }

    #[test]
    fn test_increase_vault() {
        let a = addr('a');
        let mut state = funded_state(&[]);
        state.settings.lock_min_length = 10;
        state.vault.insert(a.clone(), vec![LockRecord::new(5, 0, 20)]);

        let input = IncreaseVaultInput { id: Some(0.0), lock_length: Some(50.0) };
        increase_vault(&mut state, &a, &input, 10).unwrap();
        assert_eq!(state.vault[&a][0], LockRecord::new(5, 0, 60));

        let bad_id = IncreaseVaultInput { id: Some(3.0), lock_length: Some(50.0) };
        assert_eq!(
            increase_vault(&mut state, &a, &bad_id, 10).unwrap_err().message(),
            "Invalid vault ID."
        );
        assert_eq!(
            increase_vault(&mut state, &a, &input, 60).unwrap_err().message(),
            "This vault has ended."
        );
        assert_eq!(
            increase_vault(&mut state, &addr('b'), &input, 10)
                .unwrap_err()
                .message(),
            "Caller does not have a vault."
        );
    }

    #[test]
    fn test_evolve() {
        let (owner, other) = (addr('o'), addr('x'));
        let mut state = funded_state(&[]);
        state.owner = Some(owner.clone());
        let input = EvolveInput { value: Some("newSrc".to_string()) };

        evolve(&mut state, &other, &input).unwrap();
        assert_eq!(state.evolve, None);

        state.can_evolve = true;
        assert_eq!(
            evolve(&mut state, &other, &input).unwrap_err().message(),
            "Only the owner can evolve a contract."
        );
        evolve(&mut state, &owner, &input).unwrap();
        assert_eq!(state.evolve.as_deref(), Some("newSrc"));
    }
}
