//! # Domain Invariants
//!
//! Properties that must hold for every reachable state. The service checks
//! them on the working copy after each mutating call when
//! `ContractConfig::verify_invariants` is set.
//!
//! - Supply Ceiling: balances + vault + stakes ≤ `SAFE_INTEGER_MAX`
//! - Stake/Sponsor Consistency: a stake exists exactly for the current
//!   sponsor of a page and equals the page value
//! - Lock Shape: every lock record has a positive balance and
//!   `start <= end`
//! - Single Vote: no address appears twice in a vote's `voted` list

use crate::domain::entities::WikiState;
use crate::domain::ledger::total_supply;
use shared_types::{Address, SAFE_INTEGER_MAX};
use std::collections::BTreeSet;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Supply Ceiling.
#[must_use]
pub fn check_supply_ceiling(state: &WikiState) -> bool {
    total_supply(state) <= u128::from(SAFE_INTEGER_MAX)
}

/// Stake/Sponsor Consistency.
#[must_use]
pub fn check_stake_sponsorship(state: &WikiState) -> bool {
    stake_sponsorship_violations(state).is_empty()
}

/// Lock Shape.
#[must_use]
pub fn check_lock_records(state: &WikiState) -> bool {
    state
        .vault
        .values()
        .flatten()
        .all(|lock| lock.balance > 0 && lock.start <= lock.end)
}

/// Single Vote.
#[must_use]
pub fn check_single_vote(state: &WikiState) -> bool {
    state.votes.iter().all(|vote| {
        let unique: BTreeSet<&Address> = vote.voted.iter().collect();
        unique.len() == vote.voted.len()
    })
}

fn stake_sponsorship_violations(state: &WikiState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (address, langs) in &state.stakes {
        for (lang, slugs) in langs {
            for (slug, amount) in slugs {
                let backed = state.page(lang, slug).is_some_and(|page| {
                    page.sponsor.as_ref() == Some(address) && page.value == *amount && *amount > 0
                });
                if !backed {
                    violations.push(InvariantViolation::OrphanStake {
                        address: address.to_string(),
                        lang: lang.clone(),
                        slug: slug.clone(),
                    });
                }
            }
        }
    }

    for (lang, pages) in &state.pages {
        for (slug, page) in pages {
            if let Some(sponsor) = &page.sponsor {
                let staked = state
                    .stakes
                    .get(sponsor)
                    .and_then(|langs| langs.get(lang))
                    .is_some_and(|slugs| slugs.contains_key(slug));
                if !staked {
                    violations.push(InvariantViolation::UnbackedSponsor {
                        lang: lang.clone(),
                        slug: slug.clone(),
                    });
                }
            }
        }
    }

    violations
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(state: &WikiState) -> InvariantCheckResult {
    let mut violations = Vec::new();

    if !check_supply_ceiling(state) {
        violations.push(InvariantViolation::SupplyCeilingExceeded {
            total: total_supply(state),
        });
    }

    violations.extend(stake_sponsorship_violations(state));

    if !check_lock_records(state) {
        violations.push(InvariantViolation::MalformedLock);
    }

    if !check_single_vote(state) {
        violations.push(InvariantViolation::DuplicateVoter);
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Total supply above the safe-integer ceiling.
    SupplyCeilingExceeded { total: u128 },
    /// A stake with no matching sponsored page.
    OrphanStake {
        address: String,
        lang: String,
        slug: String,
    },
    /// A sponsored page whose sponsor holds no stake.
    UnbackedSponsor { lang: String, slug: String },
    /// A lock with zero balance or `start > end`.
    MalformedLock,
    /// An address voted twice on one proposal.
    DuplicateVoter,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SupplyCeilingExceeded { total } => {
                write!(f, "total supply {total} exceeds {SAFE_INTEGER_MAX}")
            }
            Self::OrphanStake {
                address,
                lang,
                slug,
            } => {
                write!(f, "stake of {address} on {lang}/{slug} has no matching sponsorship")
            }
            Self::UnbackedSponsor { lang, slug } => {
                write!(f, "sponsor of {lang}/{slug} holds no stake")
            }
            Self::MalformedLock => write!(f, "vault holds a malformed lock record"),
            Self::DuplicateVoter => write!(f, "an address voted twice on one proposal"),
        }
    }
}

// =============================================================================
// LENGTH LIMITS
// =============================================================================

/// Maximum lengths of user-supplied text, in characters.
pub mod limits {
    /// Vote note.
    pub const NOTE_MAX_LENGTH: usize = 200;

    /// Key of a `set` proposal.
    pub const KEY_MAX_LENGTH: usize = 50;

    /// String value of a `set` proposal.
    pub const KEY_STRING_VALUE_MAX_LENGTH: usize = 50;

    /// Role name of a role assignment.
    pub const ROLE_VALUE_MAX_LENGTH: usize = 50;

    /// Language code.
    pub const LANG_CODE_MAX_LENGTH: usize = 2;

    /// Language ISO and native names.
    pub const LANG_NAME_MAX_LENGTH: usize = 50;

    /// Page slug.
    pub const PAGE_SLUG_MAX_LENGTH: usize = 70;

    /// Category label.
    pub const CATEGORY_LABEL_MAX_LENGTH: usize = 50;

    /// Category slug.
    pub const CATEGORY_SLUG_MAX_LENGTH: usize = 50;
}

// =============================================================================
// TESTS
// =============================================================================
