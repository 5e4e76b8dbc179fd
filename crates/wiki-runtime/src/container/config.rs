//! # Runtime Configuration
//!
//! Loaded from environment variables:
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `WIKI_GENESIS` | Path to the genesis JSON | required |
//! | `WIKI_INTERACTIONS` | Path to the interaction log JSON | none (no replay) |
//! | `WIKI_REQUIRE_SPONSOR_VAULT` | Vault gate on `updatePageSponsor` | `false` |
//! | `WIKI_VERIFY_INVARIANTS` | Post-call invariant checks | `true` |
//! | `WIKI_STRICT_HEIGHTS` | Abort replay on a height regression | `false` |

use aw_01_wiki_contract::service::ContractConfig;
use std::path::PathBuf;
use thiserror::Error;

/// Genesis file variable.
pub const ENV_GENESIS: &str = "WIKI_GENESIS";
/// Interaction log variable.
pub const ENV_INTERACTIONS: &str = "WIKI_INTERACTIONS";
/// Sponsor vault gate variable.
pub const ENV_REQUIRE_SPONSOR_VAULT: &str = "WIKI_REQUIRE_SPONSOR_VAULT";
/// Invariant check variable.
pub const ENV_VERIFY_INVARIANTS: &str = "WIKI_VERIFY_INVARIANTS";
/// Strict height ordering variable.
pub const ENV_STRICT_HEIGHTS: &str = "WIKI_STRICT_HEIGHTS";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A boolean variable holds something other than true/false.
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBool {
        /// Variable name.
        var: &'static str,
        /// Offending value.
        value: String,
    },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Genesis JSON location.
    pub genesis_path: PathBuf,
    /// Interaction log location, if any.
    pub interactions_path: Option<PathBuf>,
    /// Wiki contract behaviour switches.
    pub contract: ContractConfig,
    /// Abort instead of skipping records whose height goes backwards.
    pub strict_heights: bool,
}

impl RuntimeConfig {
    /// Load from the process environment.
    ///
    /// # Errors
    ///
    /// See [`RuntimeConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` without `WIKI_GENESIS`, and
    /// `ConfigError::InvalidBool` for an unparseable switch.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let genesis_path = lookup(ENV_GENESIS)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing(ENV_GENESIS))?;
        let interactions_path = lookup(ENV_INTERACTIONS)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let defaults = ContractConfig::default();
        let contract = ContractConfig {
            require_sponsor_vault_balance: flag(
                &lookup,
                ENV_REQUIRE_SPONSOR_VAULT,
                defaults.require_sponsor_vault_balance,
            )?,
            verify_invariants: flag(&lookup, ENV_VERIFY_INVARIANTS, defaults.verify_invariants)?,
        };

        Ok(Self {
            genesis_path,
            interactions_path,
            contract,
            strict_heights: flag(&lookup, ENV_STRICT_HEIGHTS, false)?,
        })
    }
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(default),
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}
