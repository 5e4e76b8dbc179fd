//! # Core Entities
//!
//! Value types shared by the wiki contract and the contracts linked to it.
//!
//! ## Clusters
//!
//! - **Identity**: `Address`
//! - **Numbers**: `SAFE_INTEGER_MAX` and the integer predicates used to
//!   validate JSON numeric inputs
//! - **Serde helpers**: `empty_string_as_none`

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Length of a wallet / transaction address.
pub const ADDRESS_LENGTH: usize = 43;

/// A 43-character base64url account or transaction identifier.
///
/// Construction always validates, so any `Address` held in state is
/// well-formed. Deserialization goes through the same check.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parses and validates an address.
    ///
    /// Returns `None` unless the input is exactly 43 characters drawn from
    /// `[A-Za-z0-9_-]`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if is_valid_address(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `raw` is a syntactically valid address.
#[must_use]
pub fn is_valid_address(raw: &str) -> bool {
    raw.len() == ADDRESS_LENGTH
        && raw
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        if is_valid_address(&raw) {
            Ok(Self(raw))
        } else {
            Err(format!("invalid address: {raw:?}"))
        }
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// CLUSTER B: NUMBERS
// =============================================================================

/// Largest integer exactly representable by the host numeric type (2^53 - 1).
pub const SAFE_INTEGER_MAX: u64 = 9_007_199_254_740_991;

/// Returns true if `value` is finite and has no fractional part.
#[must_use]
pub fn is_integer(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0
}

/// Returns true if `value` is an integer whose magnitude is at most
/// [`SAFE_INTEGER_MAX`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn is_safe_integer(value: f64) -> bool {
    is_integer(value) && value.abs() <= SAFE_INTEGER_MAX as f64
}

/// Converts a safe, strictly positive integer into an amount.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn positive_integer(value: f64) -> Option<u64> {
    (is_safe_integer(value) && value > 0.0).then(|| value as u64)
}

/// Converts a safe, non-negative integer into an amount.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn non_negative_integer(value: f64) -> Option<u64> {
    (is_safe_integer(value) && value >= 0.0).then(|| value as u64)
}

// =============================================================================
// CLUSTER C: SERDE HELPERS
// =============================================================================

/// Encodes `Option<Address>` as `""` when absent, and decodes `""` back to
/// `None`. Page sponsors and NFT links use this shape on the wire.
pub mod empty_string_as_none {
    use super::Address;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `None` as the empty string.
    pub fn serialize<S>(value: &Option<Address>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_ref().map_or("", Address::as_str))
    }

    /// Deserializes the empty string (or `null`) as `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Address>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        Address::try_from(raw)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// TESTS
// =============================================================================
