//! # Value Objects
//!
//! Small immutable types carried inside the contract state: vote payload
//! values, vote status and type tags, cast directions, writing systems and
//! lock-record actions.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// NUMERIC COERCION
// =============================================================================

/// Coerces a text value to a number the way the contract's clients expect:
/// surrounding whitespace is ignored, the empty string is zero and anything
/// unparseable is `NaN` (which then fails every integer or range check).
#[must_use]
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

// =============================================================================
// VOTE VALUE
// =============================================================================

/// Payload value of a `set` proposal: either a number or a string.
///
/// Validated once at proposal time and carried through finalization unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VoteValue {
    /// A numeric setting.
    Number(f64),
    /// A textual setting or role name.
    Text(String),
}

impl VoteValue {
    /// Returns the numeric reading of the value.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => coerce_number(s),
        }
    }

    /// Returns the text if this is a string value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }
}

impl fmt::Display for VoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for VoteValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for VoteValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

// =============================================================================
// VOTE TAGS
// =============================================================================

/// Lifecycle status of a vote. Every status other than `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoteStatus {
    /// Open for votes or awaiting finalization.
    Active,
    /// Participation fell short of the quorum.
    QuorumFailed,
    /// Passed and enacted.
    Passed,
    /// Rejected, or could not be enacted.
    Failed,
}

impl VoteStatus {
    /// Returns true once the vote can no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// The kind of proposal carried by a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteType {
    /// Mint free balance to a recipient.
    Mint,
    /// Mint directly into a recipient's vault.
    MintLocked,
    /// Delete a target's entire vault.
    BurnVault,
    /// Change a setting or assign a role.
    Set,
    /// Signal only.
    Indicative,
}

impl VoteType {
    /// Parses the wire name of a vote type.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "mint" => Some(Self::Mint),
            "mintLocked" => Some(Self::MintLocked),
            "burnVault" => Some(Self::BurnVault),
            "set" => Some(Self::Set),
            "indicative" => Some(Self::Indicative),
            _ => None,
        }
    }
}

/// Direction of a cast vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cast {
    /// In favour.
    Yay,
    /// Against.
    Nay,
}

impl Cast {
    /// Parses `"yay"` or `"nay"`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "yay" => Some(Self::Yay),
            "nay" => Some(Self::Nay),
            _ => None,
        }
    }
}

// =============================================================================
// MODERATION TAGS
// =============================================================================

/// Text direction of a wiki language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WritingSystem {
    /// Left to right.
    #[serde(rename = "LTR")]
    Ltr,
    /// Right to left.
    #[serde(rename = "RTL")]
    Rtl,
}

impl WritingSystem {
    /// Parses `"LTR"` or `"RTL"` (exact case).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "LTR" => Some(Self::Ltr),
            "RTL" => Some(Self::Rtl),
            _ => None,
        }
    }
}

/// Why a page-related record was appended to an author's vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockAction {
    /// The author's page was approved.
    New,
    /// An update by the author was approved.
    Update,
}

/// Role name that unlocks moderation operations.
pub const MODERATOR_ROLE: &str = "MODERATOR";

/// Returns true if `role` names the moderator role (case-insensitive,
/// surrounding whitespace ignored).
#[must_use]
pub fn is_moderator_role(role: &str) -> bool {
    role.trim().eq_ignore_ascii_case(MODERATOR_ROLE)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(" 42 "), 42.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("0.25"), 0.25);
        assert!(coerce_number("abc").is_nan());
    }

    #[test]
    fn test_vote_value_untagged_serde() {
        let n: VoteValue = serde_json::from_str("0.5").unwrap();
        assert_eq!(n, VoteValue::Number(0.5));
        let s: VoteValue = serde_json::from_str("\"logo\"").unwrap();
        assert_eq!(s.as_text(), Some("logo"));
        assert_eq!(VoteValue::from("7").as_number(), 7.0);
        assert!(serde_json::from_str::<VoteValue>("true").is_err());
    }

    #[test]
    fn test_vote_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&VoteStatus::QuorumFailed).unwrap(),
            "\"quorumFailed\""
        );
        assert!(VoteStatus::Passed.is_terminal());
        assert!(!VoteStatus::Active.is_terminal());
    }

    #[test]
    fn test_tag_parsing() {
        assert_eq!(VoteType::parse("mintLocked"), Some(VoteType::MintLocked));
        assert_eq!(VoteType::parse("MINT"), None);
        assert_eq!(Cast::parse("nay"), Some(Cast::Nay));
        assert_eq!(Cast::parse("maybe"), None);
        assert_eq!(WritingSystem::parse("RTL"), Some(WritingSystem::Rtl));
        assert_eq!(WritingSystem::parse("ltr"), None);
    }

    #[test]
    fn test_moderator_role_is_case_insensitive() {
        assert!(is_moderator_role("moderator"));
        assert!(is_moderator_role(" MODERATOR "));
        assert!(!is_moderator_role("admin"));
    }
}
