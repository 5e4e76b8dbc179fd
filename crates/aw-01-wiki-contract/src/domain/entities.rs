//! # Core Entities
//!
//! The single state object owned by the wiki contract and every record it
//! holds.
//!
//! ## Clusters
//!
//! - **Ledger**: `Balances`, `Vault`, `LockRecord`, `Stakes`
//! - **Governance**: `Settings`, `Vote`, `Proposal`, roles
//! - **Moderation**: `Page`, `PageUpdate`, `Category`, `Language`
//! - **State root**: `WikiState`
//!
//! Maps are `BTreeMap`s so that iteration, and therefore the serialized
//! snapshot, is deterministic.

use crate::domain::value_objects::{LockAction, VoteStatus, VoteType, VoteValue, WritingSystem};
use serde::{Deserialize, Serialize};
use shared_types::{empty_string_as_none, non_negative_integer, Address};
use std::collections::BTreeMap;

// =============================================================================
// CLUSTER A: LEDGER
// =============================================================================

/// Free balances. Absence of an entry means zero.
pub type Balances = BTreeMap<Address, u64>;

/// Time-locked balances per address, in insertion order.
pub type Vault = BTreeMap<Address, Vec<LockRecord>>;

/// Page-sponsorship escrow: address → language → slug → staked amount.
pub type Stakes = BTreeMap<Address, BTreeMap<String, BTreeMap<String, u64>>>;

/// A positive balance frozen over the block range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Locked amount.
    pub balance: u64,
    /// Height at which the lock was opened.
    pub start: u64,
    /// Height at which the lock expires.
    pub end: u64,
    /// Language of the page this record rewards, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Slug of the page this record rewards, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Moderation event that produced this record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<LockAction>,
}

impl LockRecord {
    /// Creates a plain lock record.
    #[must_use]
    pub fn new(balance: u64, start: u64, end: u64) -> Self {
        Self {
            balance,
            start,
            end,
            lang: None,
            slug: None,
            action: None,
        }
    }

    /// Creates a record tied to a page moderation event.
    #[must_use]
    pub fn for_page(
        balance: u64,
        start: u64,
        end: u64,
        lang: &str,
        slug: &str,
        action: LockAction,
    ) -> Self {
        Self {
            balance,
            start,
            end,
            lang: Some(lang.to_string()),
            slug: Some(slug.to_string()),
            action: Some(action),
        }
    }

    /// Full lock duration in blocks.
    #[must_use]
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Voting weight of this record: balance × full duration.
    #[must_use]
    pub fn weight(&self) -> u128 {
        u128::from(self.balance) * u128::from(self.duration())
    }

    /// True once `height` has reached the end of the lock.
    #[must_use]
    pub fn is_expired_at(&self, height: u64) -> bool {
        height >= self.end
    }
}

// =============================================================================
// CLUSTER B: GOVERNANCE
// =============================================================================

/// Governable parameters.
///
/// The seven known keys are typed; any other key set by a passed vote lands
/// in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Minimum lock length in blocks.
    pub lock_min_length: u64,
    /// Maximum lock length in blocks.
    pub lock_max_length: u64,
    /// Length of a voting window in blocks.
    pub vote_length: u64,
    /// Fraction of the total weight that must participate.
    pub quorum: f64,
    /// Ratio yays/nays must exceed for a vote to pass.
    pub support: f64,
    /// Lock horizon moderators must cover, in blocks.
    pub page_approval_length: u64,
    /// Vault balance a moderator needs for language and category changes.
    pub moderators_min_vault_balance: u64,
    /// Additional governable keys.
    #[serde(flatten)]
    pub extra: BTreeMap<String, VoteValue>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lock_min_length: 720,
            lock_max_length: 788_400,
            vote_length: 2160,
            quorum: 0.5,
            support: 0.5,
            page_approval_length: 21_600,
            moderators_min_vault_balance: 1,
            extra: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Writes a validated setting.
    ///
    /// Integer keys only accept non-negative integers; a value that does not
    /// convert leaves the current setting in place.
    pub fn apply(&mut self, key: &str, value: &VoteValue) {
        let integer = || non_negative_integer(value.as_number());
        match key.trim() {
            "quorum" => self.quorum = value.as_number(),
            "support" => self.support = value.as_number(),
            "lockMinLength" => set_if_some(&mut self.lock_min_length, integer()),
            "lockMaxLength" => set_if_some(&mut self.lock_max_length, integer()),
            "voteLength" => set_if_some(&mut self.vote_length, integer()),
            "pageApprovalLength" => set_if_some(&mut self.page_approval_length, integer()),
            "moderatorsMinVaultBalance" => {
                set_if_some(&mut self.moderators_min_vault_balance, integer());
            }
            other => {
                self.extra.insert(other.to_string(), value.clone());
            }
        }
    }
}

fn set_if_some(slot: &mut u64, value: Option<u64>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// Type-specific payload of a vote. Serialized inline with a `type` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Proposal {
    /// Mint free balance.
    Mint {
        /// Account credited on enactment.
        recipient: Address,
        /// Amount minted.
        qty: u64,
        /// Lock length supplied with the proposal, if any.
        #[serde(
            rename = "lockLength",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        lock_length: Option<u64>,
    },
    /// Mint into a fresh vault lock.
    MintLocked {
        /// Account whose vault receives the lock.
        recipient: Address,
        /// Amount minted.
        qty: u64,
        /// Length of the lock created on enactment.
        #[serde(
            rename = "lockLength",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        lock_length: Option<u64>,
    },
    /// Delete the target's vault.
    BurnVault {
        /// Account whose vault is burned.
        target: Address,
    },
    /// Change a setting, or assign a role when `key` is `"role"`.
    Set {
        /// Setting name.
        key: String,
        /// New value.
        value: VoteValue,
        /// Role holder, for role assignments.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        recipient: Option<Address>,
    },
    /// Signal only.
    Indicative,
}

impl Proposal {
    /// Returns the type tag of this proposal.
    #[must_use]
    pub fn vote_type(&self) -> VoteType {
        match self {
            Self::Mint { .. } => VoteType::Mint,
            Self::MintLocked { .. } => VoteType::MintLocked,
            Self::BurnVault { .. } => VoteType::BurnVault,
            Self::Set { .. } => VoteType::Set,
            Self::Indicative => VoteType::Indicative,
        }
    }
}

/// A governance proposal and its tally. Identified by its index in
/// `WikiState::votes`; never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    /// Lifecycle status.
    pub status: VoteStatus,
    /// Type tag and payload.
    #[serde(flatten)]
    pub proposal: Proposal,
    /// Free-text description.
    pub note: String,
    /// Accumulated weight in favour.
    pub yays: u128,
    /// Accumulated weight against.
    pub nays: u128,
    /// Addresses that have cast a vote.
    pub voted: Vec<Address>,
    /// Creation height.
    pub start: u64,
    /// Snapshot of the total vault weight at creation.
    pub total_weight: u128,
}

impl Vote {
    /// Opens a new vote.
    #[must_use]
    pub fn open(proposal: Proposal, note: String, start: u64, total_weight: u128) -> Self {
        Self {
            status: VoteStatus::Active,
            proposal,
            note,
            yays: 0,
            nays: 0,
            voted: Vec::new(),
            start,
            total_weight,
        }
    }

    /// Returns true if `address` has already voted.
    #[must_use]
    pub fn has_voted(&self, address: &Address) -> bool {
        self.voted.contains(address)
    }
}

// =============================================================================
// CLUSTER C: MODERATION
// =============================================================================

/// One approved revision of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    /// Transaction holding the content.
    pub tx: String,
    /// Moderator who approved it.
    pub approved_by: Address,
    /// Approval height.
    pub at: u64,
    /// Value attached to the approval.
    pub value: u64,
}

/// A wiki page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Linked ownership token, if any.
    #[serde(with = "empty_string_as_none", default)]
    pub nft: Option<Address>,
    /// Current sponsor, if any.
    #[serde(with = "empty_string_as_none", default)]
    pub sponsor: Option<Address>,
    /// Current sponsorship value.
    pub value: u64,
    /// Approved revisions, oldest first.
    pub updates: Vec<PageUpdate>,
    /// Category slug.
    pub category: String,
    /// Display order.
    #[serde(default)]
    pub order: u64,
    /// Whether the page is visible.
    pub active: bool,
    /// Listed in the menu.
    #[serde(default)]
    pub show_in_menu: bool,
    /// Listed in the footer.
    #[serde(default)]
    pub show_in_footer: bool,
    /// Listed on the main page.
    #[serde(default)]
    pub show_in_main_page: bool,
}

/// A page category within one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display label.
    pub label: String,
    /// Display order.
    pub order: u64,
    /// Whether the category is visible.
    pub active: bool,
    /// Slug of the parent category in the same language.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// A wiki language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Whether the language is visible.
    pub active: bool,
    /// English name.
    pub iso_name: String,
    /// Name in the language itself.
    pub native_name: String,
    /// Text direction.
    pub writing_system: WritingSystem,
}

/// Pages per language, then per slug.
pub type Pages = BTreeMap<String, BTreeMap<String, Page>>;

/// Categories per language, then per slug.
pub type Categories = BTreeMap<String, BTreeMap<String, Category>>;

// =============================================================================
// STATE ROOT
// =============================================================================

/// The complete wiki contract state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WikiState {
    /// Token name.
    #[serde(default)]
    pub name: String,
    /// Token ticker.
    #[serde(default)]
    pub ticker: String,
    /// Account allowed to evolve the contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Address>,
    /// Whether `evolve` is enabled.
    #[serde(default)]
    pub can_evolve: bool,
    /// Source of the evolved contract, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolve: Option<String>,
    /// Free balances.
    #[serde(default)]
    pub balances: Balances,
    /// Time-locked balances.
    #[serde(default)]
    pub vault: Vault,
    /// Votes in creation order.
    #[serde(default)]
    pub votes: Vec<Vote>,
    /// Role per address.
    #[serde(default)]
    pub roles: BTreeMap<Address, String>,
    /// Governable settings.
    #[serde(default)]
    pub settings: Settings,
    /// Page-sponsorship escrow.
    #[serde(default)]
    pub stakes: Stakes,
    /// Wiki pages.
    #[serde(default)]
    pub pages: Pages,
    /// Page categories.
    #[serde(default)]
    pub categories: Categories,
    /// Wiki languages.
    #[serde(default)]
    pub languages: BTreeMap<String, Language>,
}

impl WikiState {
    /// Creates an empty state with the given token identity and default
    /// settings.
    #[must_use]
    pub fn new(name: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    /// Looks up a page.
    #[must_use]
    pub fn page(&self, lang: &str, slug: &str) -> Option<&Page> {
        self.pages.get(lang).and_then(|pages| pages.get(slug))
    }

    /// Returns the role assigned to `address`, if any.
    #[must_use]
    pub fn role_of(&self, address: &Address) -> Option<&str> {
        self.roles.get(address).map(String::as_str)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn addr(c: char) -> Address {
        Address::parse(&c.to_string().repeat(43)).unwrap()
    }

    #[test]
    fn test_lock_record_weight_and_expiry() {
        let lock = LockRecord::new(30, 5, 15);
        assert_eq!(lock.duration(), 10);
        assert_eq!(lock.weight(), 300);
        assert!(!lock.is_expired_at(14));
        assert!(lock.is_expired_at(15));
    }

    #[test]
    fn test_lock_record_wire_shape() {
        let plain = serde_json::to_value(LockRecord::new(1, 2, 3)).unwrap();
        assert_eq!(plain, json!({"balance": 1, "start": 2, "end": 3}));

        let escrow = LockRecord::for_page(5, 0, 10, "en", "home", LockAction::New);
        let value = serde_json::to_value(escrow).unwrap();
        assert_eq!(value["action"], "new");
        assert_eq!(value["lang"], "en");
    }

    #[test]
    fn test_settings_defaults_and_extra_keys() {
        let settings: Settings =
            serde_json::from_value(json!({"voteLength": 10, "communityLogo": "tx"})).unwrap();
        assert_eq!(settings.vote_length, 10);
        assert_eq!(settings.lock_min_length, 720);
        assert_eq!(settings.extra["communityLogo"], VoteValue::from("tx"));
    }

    #[test]
    fn test_settings_apply() {
        let mut settings = Settings::default();
        settings.apply("quorum", &VoteValue::Number(0.3));
        settings.apply(" voteLength ", &VoteValue::from("15"));
        settings.apply("moderatorsMinVaultBalance", &VoteValue::Number(0.0));
        settings.apply("communityDescription", &VoteValue::from("wiki"));
        assert_eq!(settings.quorum, 0.3);
        assert_eq!(settings.vote_length, 15);
        assert_eq!(settings.moderators_min_vault_balance, 0);
        assert!(settings.extra.contains_key("communityDescription"));
    }

    #[test]
    fn test_vote_wire_shape_flattens_type() {
        let vote = Vote::open(
            Proposal::MintLocked {
                recipient: addr('r'),
                qty: 10,
                lock_length: Some(800),
            },
            "grant".to_string(),
            3,
            100,
        );
        let value = serde_json::to_value(&vote).unwrap();
        assert_eq!(value["type"], "mintLocked");
        assert_eq!(value["lockLength"], 800);
        assert_eq!(value["status"], "active");
        assert_eq!(value["totalWeight"], 100);

        let back: Vote = serde_json::from_value(value).unwrap();
        assert_eq!(back, vote);
        assert_eq!(back.proposal.vote_type(), VoteType::MintLocked);
    }

    #[test]
    fn test_page_empty_sponsor_roundtrip() {
        let page: Page = serde_json::from_value(json!({
            "nft": "",
            "sponsor": "",
            "value": 10,
            "updates": [],
            "category": "general",
            "active": false
        }))
        .unwrap();
        assert_eq!(page.sponsor, None);
        assert_eq!(serde_json::to_value(&page).unwrap()["sponsor"], "");
    }

    #[test]
    fn test_state_snapshot_field_names() {
        let mut state = WikiState::new("ArWiki", "AWK");
        state.languages.insert(
            "en".to_string(),
            Language {
                active: true,
                iso_name: "English".to_string(),
                native_name: "English".to_string(),
                writing_system: WritingSystem::Ltr,
            },
        );
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["canEvolve"], false);
        assert_eq!(value["languages"]["en"]["writing_system"], "LTR");
        assert_eq!(value["settings"]["pageApprovalLength"], 21_600);
    }
}
