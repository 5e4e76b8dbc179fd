//! # Genesis State Builder
//!
//! Creates and validates the initial state of a wiki contract.

use aw_01_wiki_contract::domain::entities::{Category, Language, LockRecord, Settings, WikiState};
use aw_01_wiki_contract::domain::invariants::{check_all_invariants, InvariantCheckResult};
use aw_01_wiki_contract::domain::ledger::total_supply;
use aw_01_wiki_contract::domain::value_objects::{WritingSystem, MODERATOR_ROLE};
use serde::Deserialize;
use shared_types::{Address, SAFE_INTEGER_MAX};
use std::collections::BTreeMap;
use thiserror::Error;

/// Genesis creation errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// An address in the configuration is malformed.
    #[error("Invalid address in genesis {field}: {value:?}")]
    InvalidAddress {
        /// Configuration field holding the address.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    /// Initial balances, locks and stakes exceed the safe-integer ceiling.
    #[error("Genesis supply {0} exceeds the safe-integer ceiling")]
    SupplyTooLarge(u128),

    /// The genesis file could not be read.
    #[error("Failed to read genesis file: {0}")]
    Io(#[from] std::io::Error),

    /// The genesis file is not valid JSON of the expected shape.
    #[error("Failed to parse genesis file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An initial vault lock.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenesisLock {
    /// Lock holder.
    pub address: String,
    /// Locked amount.
    pub balance: u64,
    /// Opening height.
    pub start: u64,
    /// Expiry height.
    pub end: u64,
}

/// An initial wiki language.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisLanguage {
    /// Language code, stored lowercased.
    pub code: String,
    /// English name.
    pub iso_name: String,
    /// Name in the language itself.
    pub native_name: String,
    /// Text direction.
    pub writing_system: WritingSystem,
    /// Initial categories keyed by slug.
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
}

/// Wiki genesis configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenesisConfig {
    /// Token name.
    pub name: String,
    /// Token ticker.
    pub ticker: String,
    /// Account allowed to evolve the contract.
    #[serde(default)]
    pub owner: Option<String>,
    /// Whether `evolve` is enabled.
    #[serde(default)]
    pub can_evolve: bool,
    /// Initial free balances.
    #[serde(default)]
    pub balances: BTreeMap<String, u64>,
    /// Initial vault locks.
    #[serde(default)]
    pub vault: Vec<GenesisLock>,
    /// Accounts granted the moderator role.
    #[serde(default)]
    pub moderators: Vec<String>,
    /// Starting languages.
    #[serde(default)]
    pub languages: Vec<GenesisLanguage>,
    /// Governable settings.
    #[serde(default)]
    pub settings: Settings,
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self {
            name: "ArWiki".to_string(),
            ticker: "AWK".to_string(),
            owner: None,
            can_evolve: false,
            balances: BTreeMap::new(),
            vault: Vec::new(),
            moderators: Vec::new(),
            languages: Vec::new(),
            settings: Settings::default(),
        }
    }
}

impl GenesisConfig {
    /// Single-operator development configuration: `operator` owns the
    /// contract, moderates, holds `supply` split evenly between free balance
    /// and a lock covering `[0, lockMaxLength)`, and English is active.
    #[must_use]
    pub fn devnet(operator: &Address, supply: u64) -> Self {
        let settings = Settings::default();
        let locked = supply / 2;
        Self {
            owner: Some(operator.to_string()),
            can_evolve: true,
            balances: BTreeMap::from([(operator.to_string(), supply - locked)]),
            vault: vec![GenesisLock {
                address: operator.to_string(),
                balance: locked,
                start: 0,
                end: settings.lock_max_length,
            }],
            moderators: vec![operator.to_string()],
            languages: vec![GenesisLanguage {
                code: "en".to_string(),
                iso_name: "English".to_string(),
                native_name: "English".to_string(),
                writing_system: WritingSystem::Ltr,
                categories: BTreeMap::new(),
            }],
            settings,
            ..Self::default()
        }
    }

    /// Validate the parts of the configuration that do not need the built
    /// state.
    ///
    /// # Errors
    ///
    /// `GenesisError::InvalidConfig` for an empty ticker, a zero or inverted
    /// lock, a malformed language code, or a quorum/support outside [0, 1].
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.ticker.trim().is_empty() {
            return Err(GenesisError::InvalidConfig("ticker must be set".to_string()));
        }
        for lock in &self.vault {
            if lock.balance == 0 || lock.start > lock.end {
                return Err(GenesisError::InvalidConfig(format!(
                    "lock of {} must have a positive balance and start <= end",
                    lock.address
                )));
            }
        }
        for language in &self.languages {
            let code = language.code.trim();
            if code.is_empty() || code.chars().count() > 2 {
                return Err(GenesisError::InvalidConfig(format!(
                    "language code {code:?} must be 1-2 characters"
                )));
            }
        }
        for (name, value) in [("quorum", self.settings.quorum), ("support", self.settings.support)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenesisError::InvalidConfig(format!(
                    "{name} must be between 0 and 1"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for wiki genesis states.
pub struct GenesisBuilder {
    config: GenesisConfig,
}

impl GenesisBuilder {
    /// Create a new genesis builder with configuration.
    #[must_use]
    pub fn new(config: GenesisConfig) -> Self {
        Self { config }
    }

    /// Build the genesis state.
    ///
    /// # Errors
    ///
    /// Any validation failure, a malformed address, or a supply above
    /// `SAFE_INTEGER_MAX`.
    pub fn build(self) -> Result<WikiState, GenesisError> {
        self.config.validate()?;
        let config = self.config;

        let mut state = WikiState::new(config.name, config.ticker);
        state.can_evolve = config.can_evolve;
        state.settings = config.settings;
        state.owner = config
            .owner
            .as_deref()
            .map(|raw| parse_address("owner", raw))
            .transpose()?;

        for (raw, amount) in &config.balances {
            let address = parse_address("balances", raw)?;
            state.balances.insert(address, *amount);
        }
        for lock in &config.vault {
            let address = parse_address("vault", &lock.address)?;
            state
                .vault
                .entry(address)
                .or_default()
                .push(LockRecord::new(lock.balance, lock.start, lock.end));
        }
        for raw in &config.moderators {
            let address = parse_address("moderators", raw)?;
            state.roles.insert(address, MODERATOR_ROLE.to_string());
        }
        for language in config.languages {
            let code = language.code.trim().to_lowercase();
            state.languages.insert(
                code.clone(),
                Language {
                    active: true,
                    iso_name: language.iso_name,
                    native_name: language.native_name,
                    writing_system: language.writing_system,
                },
            );
            state.pages.entry(code.clone()).or_default();
            state.categories.insert(code, language.categories);
        }

        let supply = total_supply(&state);
        if supply > u128::from(SAFE_INTEGER_MAX) {
            return Err(GenesisError::SupplyTooLarge(supply));
        }
        if let InvariantCheckResult::Invalid(violations) = check_all_invariants(&state) {
            let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
            return Err(GenesisError::InvalidConfig(reasons.join("; ")));
        }
        Ok(state)
    }
}

fn parse_address(field: &'static str, raw: &str) -> Result<Address, GenesisError> {
    Address::parse(raw).ok_or_else(|| GenesisError::InvalidAddress {
        field,
        value: raw.to_string(),
    })
}
