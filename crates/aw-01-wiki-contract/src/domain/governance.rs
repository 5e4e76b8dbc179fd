//! # Governance
//!
//! The proposal → vote → finalize protocol.
//!
//! ```text
//! propose ──► Active ──finalize──► QuorumFailed
//!                    └──────────► Passed (enacted)
//!                    └──────────► Failed
//! ```
//!
//! Weights are `balance × (end − start)` summed over lock records. The
//! denominator (`totalWeight`) is snapshotted over every address's locks
//! when the vote opens.

use crate::domain::entities::{LockRecord, Proposal, Vault, Vote, WikiState};
use crate::domain::invariants::limits;
use crate::domain::ledger::{append_lock, credit, ensure_supply_headroom, vault_balance_covering_height};
use crate::domain::token::validate_lock_length;
use crate::domain::value_objects::{Cast, VoteStatus, VoteType, VoteValue};
use crate::input::{FinalizeInput, ProposeInput, VoteInput};
use shared_types::{
    ensure, is_integer, is_safe_integer, non_negative_integer, positive_integer, Address,
    ContractError,
};

// =============================================================================
// WEIGHTS
// =============================================================================

/// Σ `balance × duration` over every lock record of every address.
#[must_use]
pub fn total_vote_weight(vault: &Vault) -> u128 {
    vault.values().flatten().map(LockRecord::weight).sum()
}

/// Σ `balance × duration` over the voter's locks that were opened before
/// `vote_start` and had not closed by it (`start < vote_start <= end`).
#[must_use]
pub fn voter_weight(vault: &Vault, voter: &Address, vote_start: u64) -> u128 {
    vault.get(voter).map_or(0, |locks| {
        locks
            .iter()
            .filter(|lock| lock.start < vote_start && lock.end >= vote_start)
            .map(LockRecord::weight)
            .sum()
    })
}

// =============================================================================
// PROPOSE
// =============================================================================

/// Opens a new vote and returns its id.
///
/// # Errors
///
/// Rejects malformed notes, proposers without tokens locked through the
/// voting window, and invalid type-specific payloads.
pub fn propose(
    state: &mut WikiState,
    caller: &Address,
    input: &ProposeInput,
    height: u64,
) -> Result<usize, ContractError> {
    let note = input
        .note
        .as_deref()
        .ok_or_else(|| ContractError::rejected("Note format not recognized."))?
        .trim();
    ensure(
        note.chars().count() <= limits::NOTE_MAX_LENGTH,
        format!(
            "Note length is longer than the max allowed length {}.",
            limits::NOTE_MAX_LENGTH
        ),
    )?;

    let locks = state
        .vault
        .get(caller)
        .ok_or_else(|| ContractError::rejected("Caller needs to have locked balances."))?;
    ensure(
        locks.iter().any(|lock| lock.balance > 0),
        "Caller doesn't have any locked balance.",
    )?;

    let start = height;
    let end = start.saturating_add(state.settings.vote_length);
    let covering = vault_balance_covering_height(&state.vault, caller, end);
    ensure(
        covering > 0,
        format!(
            "Caller doesn't have tokens locked for enough time (start:{start}, end:{end}, vault:{covering})."
        ),
    )?;

    let total_weight = total_vote_weight(&state.vault);
    let vote_type = input
        .vote_type
        .as_deref()
        .and_then(VoteType::parse)
        .ok_or_else(|| ContractError::rejected("Invalid vote type."))?;

    let proposal = match vote_type {
        VoteType::Mint | VoteType::MintLocked => mint_proposal(state, input, vote_type)?,
        VoteType::BurnVault => burn_vault_proposal(input)?,
        VoteType::Set => set_proposal(state, input)?,
        VoteType::Indicative => Proposal::Indicative,
    };

    state
        .votes
        .push(Vote::open(proposal, note.to_string(), start, total_weight));
    Ok(state.votes.len() - 1)
}

fn parse_recipient(raw: Option<&str>) -> Result<Address, ContractError> {
    let raw = raw
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ContractError::rejected("No recipient specified"))?;
    Address::parse(raw).ok_or_else(|| ContractError::rejected("Invalid recipient."))
}

fn mint_proposal(
    state: &WikiState,
    input: &ProposeInput,
    vote_type: VoteType,
) -> Result<Proposal, ContractError> {
    let recipient = parse_recipient(input.recipient.as_deref())?;
    let qty = input.qty.and_then(positive_integer).ok_or_else(|| {
        ContractError::rejected("Invalid value for \"qty\". Must be a positive integer.")
    })?;
    ensure_supply_headroom(state, qty, "Quantity too large.")?;

    // Zero or absent means no lock length was supplied.
    let lock_length = match input.lock_length {
        Some(length) if length != 0.0 && !length.is_nan() => {
            Some(validate_lock_length(&state.settings, Some(length))?)
        }
        _ => None,
    };

    Ok(if vote_type == VoteType::MintLocked {
        Proposal::MintLocked {
            recipient,
            qty,
            lock_length,
        }
    } else {
        Proposal::Mint {
            recipient,
            qty,
            lock_length,
        }
    })
}

fn burn_vault_proposal(input: &ProposeInput) -> Result<Proposal, ContractError> {
    let raw = input
        .target
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ContractError::rejected("Target is required."))?;
    let target = Address::parse(raw).ok_or_else(|| ContractError::rejected("Invalid target."))?;
    Ok(Proposal::BurnVault { target })
}

#[allow(clippy::cast_precision_loss)]
fn set_proposal(state: &WikiState, input: &ProposeInput) -> Result<Proposal, ContractError> {
    let key = input
        .key
        .as_deref()
        .ok_or_else(|| ContractError::rejected("Data type of key not supported."))?
        .trim();
    let value = input
        .value
        .clone()
        .ok_or_else(|| ContractError::rejected("Value is undefined."))?;
    let settings = &state.settings;
    let number = value.as_number();

    let value = match key {
        "quorum" => {
            ensure(
                (0.01..=0.99).contains(&number),
                "Quorum must be between 0.01 and 0.99.",
            )?;
            VoteValue::Number(number)
        }
        "support" => {
            ensure(
                (0.01..=0.99).contains(&number),
                "Support must be between 0.01 and 0.99.",
            )?;
            VoteValue::Number(number)
        }
        "lockMinLength" => {
            ensure(
                is_safe_integer(number)
                    && number >= 1.0
                    && number < settings.lock_max_length as f64,
                "lockMinLength cannot be less than 1 and cannot be equal or greater than lockMaxLength.",
            )?;
            VoteValue::Number(number)
        }
        "lockMaxLength" => {
            ensure(
                is_safe_integer(number) && number > settings.lock_min_length as f64,
                "lockMaxLength cannot be less than or equal to lockMinLength.",
            )?;
            VoteValue::Number(number)
        }
        "pageApprovalLength" => {
            ensure(
                is_safe_integer(number) && number > 0.0,
                "pageApprovalLength must be a positive integer.",
            )?;
            ensure(
                number > settings.vote_length as f64,
                format!(
                    "pageApprovalLength must be greater than voteLength {}.",
                    settings.vote_length
                ),
            )?;
            VoteValue::Number(number)
        }
        "voteLength" => {
            ensure(is_safe_integer(number) && number > 0.0, "voteLength must be > 0")?;
            VoteValue::Number(number)
        }
        "moderatorsMinVaultBalance" => {
            ensure(
                non_negative_integer(number).is_some(),
                "moderatorsMinVaultBalance must be a non-negative integer.",
            )?;
            VoteValue::Number(number)
        }
        "role" => return role_proposal(input, &value),
        other => {
            ensure(!other.is_empty(), "You must provide a value for key.")?;
            ensure(
                other.chars().count() <= limits::KEY_MAX_LENGTH,
                format!(
                    "Key length is longer than max allowed length {}",
                    limits::KEY_MAX_LENGTH
                ),
            )?;
            match value {
                VoteValue::Text(text) => {
                    let text = text.trim().to_string();
                    ensure(
                        text.chars().count() <= limits::KEY_STRING_VALUE_MAX_LENGTH,
                        format!(
                            "value exceeds max length {}",
                            limits::KEY_STRING_VALUE_MAX_LENGTH
                        ),
                    )?;
                    VoteValue::Text(text)
                }
                number @ VoteValue::Number(_) => number,
            }
        }
    };

    Ok(Proposal::Set {
        key: key.to_string(),
        value,
        recipient: None,
    })
}

fn role_proposal(input: &ProposeInput, value: &VoteValue) -> Result<Proposal, ContractError> {
    let recipient = parse_recipient(input.recipient.as_deref())?;
    let role = value
        .as_text()
        .ok_or_else(|| ContractError::rejected("value must be a string."))?
        .trim();
    ensure(
        role.chars().count() <= limits::ROLE_VALUE_MAX_LENGTH,
        format!(
            "value for role is longer than max allowed length {}.",
            limits::ROLE_VALUE_MAX_LENGTH
        ),
    )?;
    Ok(Proposal::Set {
        key: "role".to_string(),
        value: VoteValue::Text(role.to_string()),
        recipient: Some(recipient),
    })
}

// =============================================================================
// VOTE
// =============================================================================

fn vote_index(state: &WikiState, id: Option<f64>) -> Result<usize, ContractError> {
    let id = id.unwrap_or(f64::NAN);
    ensure(is_integer(id), "Invalid value for \"id\". Must be an integer.")?;
    non_negative_integer(id)
        .and_then(|id| usize::try_from(id).ok())
        .filter(|id| *id < state.votes.len())
        .ok_or_else(|| ContractError::rejected("This vote doesn't exists."))
}

/// Casts the caller's weighted vote.
///
/// # Errors
///
/// Rejects unknown ids, callers without weight at the vote's start, repeat
/// voters, casts after the window closed and unknown cast values.
pub fn vote(
    state: &mut WikiState,
    caller: &Address,
    input: &VoteInput,
    height: u64,
) -> Result<(), ContractError> {
    let index = vote_index(state, input.id)?;
    let record = &state.votes[index];

    let weight = voter_weight(&state.vault, caller, record.start);
    ensure(weight > 0, "Caller does not have locked balances for this vote.")?;
    ensure(!record.has_voted(caller), "Caller has already voted.")?;
    ensure(
        height < record.start.saturating_add(state.settings.vote_length),
        "Vote has already concluded.",
    )?;
    let cast = input
        .cast
        .as_deref()
        .and_then(Cast::parse)
        .ok_or_else(|| ContractError::rejected("Vote cast type unrecognised."))?;

    let record = &mut state.votes[index];
    match cast {
        Cast::Yay => record.yays = record.yays.saturating_add(weight),
        Cast::Nay => record.nays = record.nays.saturating_add(weight),
    }
    record.voted.push(caller.clone());
    Ok(())
}

// =============================================================================
// FINALIZE
// =============================================================================

/// Closes a vote, enacting it if it passed. Returns the final status.
///
/// # Errors
///
/// Rejects unknown ids, votes whose window is still open, votes that are
/// no longer active, and passed mints that no longer fit under the supply
/// ceiling.
#[allow(clippy::cast_precision_loss)]
pub fn finalize(
    state: &mut WikiState,
    input: &FinalizeInput,
    height: u64,
) -> Result<VoteStatus, ContractError> {
    let index = vote_index(state, input.id)?;
    let record = &state.votes[index];

    ensure(
        height >= record.start.saturating_add(state.settings.vote_length),
        "Vote has not yet concluded.",
    )?;
    ensure(!record.status.is_terminal(), "Vote is not active.")?;

    let participation = record.yays.saturating_add(record.nays);
    if record.total_weight as f64 * state.settings.quorum > participation as f64 {
        state.votes[index].status = VoteStatus::QuorumFailed;
        return Ok(VoteStatus::QuorumFailed);
    }

    let passed = record.yays != 0
        && (record.nays == 0 || record.yays as f64 / record.nays as f64 > state.settings.support);
    if !passed {
        state.votes[index].status = VoteStatus::Failed;
        return Ok(VoteStatus::Failed);
    }

    let proposal = record.proposal.clone();
    let status = enact(state, &proposal, height)?;
    state.votes[index].status = status;
    Ok(status)
}

/// Applies a passed proposal. Returns `Failed` when the proposal turns out
/// to have nothing to act on: a burn of a vault that no longer exists, or a
/// locked mint without a lock length.
fn enact(state: &mut WikiState, proposal: &Proposal, height: u64) -> Result<VoteStatus, ContractError> {
    match proposal {
        Proposal::Mint { recipient, qty, .. } => {
            ensure_supply_headroom(state, *qty, "Quantity too large.")?;
            credit(&mut state.balances, recipient, *qty);
        }
        Proposal::MintLocked {
            recipient,
            qty,
            lock_length,
        } => {
            let Some(lock_length) = *lock_length else {
                return Ok(VoteStatus::Failed);
            };
            ensure_supply_headroom(state, *qty, "Quantity too large.")?;
            append_lock(
                &mut state.vault,
                recipient,
                LockRecord::new(*qty, height, height.saturating_add(lock_length)),
            );
        }
        Proposal::BurnVault { target } => {
            if state.vault.remove(target).is_none() {
                return Ok(VoteStatus::Failed);
            }
        }
        Proposal::Set {
            key,
            value,
            recipient,
        } => {
            if key == "role" {
                let recipient = recipient
                    .clone()
                    .ok_or_else(|| ContractError::rejected("vote.recipient is undefined"))?;
                state.roles.insert(recipient, value.to_string());
            } else {
                state.settings.apply(key, value);
            }
        }
        Proposal::Indicative => {}
    }
    Ok(VoteStatus::Passed)
}

// =============================================================================
// TESTS
// =============================================================================
