//! # Operation Inputs
//!
//! Typed payloads for every operation the wiki contract accepts, and the
//! decoder that turns the raw `Interaction::input` JSON into one of them.
//!
//! Decoding is two-step: the `function` field selects the operation (an
//! unknown name fails with `UnknownFunction`), then the whole object is
//! decoded into that operation's payload (a shape mismatch fails with
//! `InvalidInput`). Extra fields, including `function` itself, are ignored.
//!
//! Fields whose absence has its own rejection message are `Option`s; the
//! handlers in `domain` produce those messages.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use shared_types::ContractError;

use crate::domain::value_objects::VoteValue;

// =============================================================================
// PAYLOADS
// =============================================================================

/// `transfer{target, qty}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransferInput {
    /// Recipient address.
    #[serde(default)]
    pub target: Option<String>,
    /// Amount to send.
    #[serde(default)]
    pub qty: Option<f64>,
}

/// Read-only queries taking an optional `target`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TargetInput {
    /// Account to inspect; defaults to the caller.
    #[serde(default)]
    pub target: Option<String>,
}

/// `lock{qty, lockLength}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockInput {
    /// Amount to lock.
    #[serde(default)]
    pub qty: Option<f64>,
    /// Lock length in blocks.
    #[serde(default)]
    pub lock_length: Option<f64>,
}

/// `increaseVault{id, lockLength}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncreaseVaultInput {
    /// Index into the caller's vault.
    #[serde(default)]
    pub id: Option<f64>,
    /// New lock length, counted from the current height.
    #[serde(default)]
    pub lock_length: Option<f64>,
}

/// `propose{type, note, recipient?, qty?, lockLength?, target?, key?, value?}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeInput {
    /// Vote type name.
    #[serde(rename = "type", default)]
    pub vote_type: Option<String>,
    /// Description of the proposal.
    #[serde(default)]
    pub note: Option<String>,
    /// Mint recipient or role holder.
    #[serde(default)]
    pub recipient: Option<String>,
    /// Mint amount; numeric strings are accepted.
    #[serde(default, deserialize_with = "number_like::deserialize")]
    pub qty: Option<f64>,
    /// Lock length for minted locks.
    #[serde(default)]
    pub lock_length: Option<f64>,
    /// Vault to burn.
    #[serde(default)]
    pub target: Option<String>,
    /// Setting name.
    #[serde(default)]
    pub key: Option<String>,
    /// Setting value.
    #[serde(default)]
    pub value: Option<VoteValue>,
}

/// `vote{id, cast}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VoteInput {
    /// Vote index.
    #[serde(default)]
    pub id: Option<f64>,
    /// `"yay"` or `"nay"`.
    #[serde(default)]
    pub cast: Option<String>,
}

/// `finalize{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FinalizeInput {
    /// Vote index.
    #[serde(default)]
    pub id: Option<f64>,
}

/// `approvePage{author, pageTX, pageValue, langCode, slug, category}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePageInput {
    /// Page author, rewarded with a vault record.
    #[serde(default)]
    pub author: Option<String>,
    /// Transaction holding the page content.
    #[serde(rename = "pageTX", default)]
    pub page_tx: Option<String>,
    /// Sponsorship value staked by the approving moderator.
    #[serde(default, deserialize_with = "number_like::deserialize")]
    pub page_value: Option<f64>,
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Page slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Category slug.
    #[serde(default)]
    pub category: Option<String>,
}

/// `updatePageSponsor{langCode, slug, pageValue}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageSponsorInput {
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Page slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// New sponsorship value.
    #[serde(default, deserialize_with = "number_like::deserialize")]
    pub page_value: Option<f64>,
}

/// `stopPageSponsorshipAndDeactivatePage{langCode, slug}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRefInput {
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Page slug.
    #[serde(default)]
    pub slug: Option<String>,
}

/// `addPageUpdate{langCode, slug, updateTX, author, pageValue, category}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPageUpdateInput {
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Page slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Transaction holding the update.
    #[serde(rename = "updateTX", default)]
    pub update_tx: Option<String>,
    /// Update author, rewarded with a vault record.
    #[serde(default)]
    pub author: Option<String>,
    /// Value of the update.
    #[serde(default, deserialize_with = "number_like::deserialize")]
    pub page_value: Option<f64>,
    /// Category slug after the update.
    #[serde(default)]
    pub category: Option<String>,
}

/// `activateDeactivatePage{langCode, slug, active}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivatePageInput {
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Page slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// New visibility.
    #[serde(default)]
    pub active: bool,
}

/// `addLanguage` / `updateLanguage`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInput {
    /// Two-letter code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// `"LTR"` or `"RTL"`.
    #[serde(default)]
    pub writing_system: Option<String>,
    /// English name.
    #[serde(default)]
    pub iso_name: Option<String>,
    /// Native name.
    #[serde(default)]
    pub native_name: Option<String>,
    /// Visibility.
    #[serde(default)]
    pub active: bool,
}

/// `addCategory` / `updateCategory`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Display label.
    #[serde(default)]
    pub label: Option<String>,
    /// Category slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Parent category slug; empty means none.
    #[serde(default)]
    pub parent: Option<String>,
    /// Display order; numeric strings are accepted.
    #[serde(default, deserialize_with = "number_like::deserialize")]
    pub order: Option<f64>,
    /// Visibility.
    #[serde(default)]
    pub active: bool,
}

/// `updatePageProperties{langCode, slug, order, showInMenu, showInMainPage,
/// showInFooter, nft}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePropertiesInput {
    /// Language code.
    #[serde(default)]
    pub lang_code: Option<String>,
    /// Page slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Display order; numeric strings are accepted.
    #[serde(default, deserialize_with = "number_like::deserialize")]
    pub order: Option<f64>,
    /// Listed in the menu.
    #[serde(default)]
    pub show_in_menu: bool,
    /// Listed on the main page.
    #[serde(default)]
    pub show_in_main_page: bool,
    /// Listed in the footer.
    #[serde(default)]
    pub show_in_footer: bool,
    /// Linked NFT address; empty clears it.
    #[serde(default)]
    pub nft: Option<String>,
}

/// `evolve{value}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EvolveInput {
    /// Source transaction of the evolved contract.
    #[serde(default)]
    pub value: Option<String>,
}

// =============================================================================
// DECODED INPUT
// =============================================================================

/// A fully decoded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractInput {
    /// Move free balance.
    Transfer(TransferInput),
    /// Free + vault + stake total.
    Balance(TargetInput),
    /// Free balance only.
    UnlockedBalance(TargetInput),
    /// Move free balance into the vault.
    Lock(LockInput),
    /// Extend a lock.
    IncreaseVault(IncreaseVaultInput),
    /// Release expired locks.
    Unlock,
    /// Unexpired vault balance.
    VaultBalance(TargetInput),
    /// Open a vote.
    Propose(ProposeInput),
    /// Cast a vote.
    Vote(VoteInput),
    /// Close a vote.
    Finalize(FinalizeInput),
    /// Role lookup.
    Role(TargetInput),
    /// Create a page.
    ApprovePage(ApprovePageInput),
    /// Outbid a page's sponsor.
    UpdatePageSponsor(UpdatePageSponsorInput),
    /// Withdraw sponsorship.
    StopPageSponsorshipAndDeactivatePage(PageRefInput),
    /// Balance split by sub-ledger.
    BalanceDetail(TargetInput),
    /// Approve a page revision.
    AddPageUpdate(AddPageUpdateInput),
    /// Toggle a page.
    ActivateDeactivatePage(ActivatePageInput),
    /// Create a language.
    AddLanguage(LanguageInput),
    /// Edit a language.
    UpdateLanguage(LanguageInput),
    /// Create a category.
    AddCategory(CategoryInput),
    /// Edit a category.
    UpdateCategory(CategoryInput),
    /// Edit page display metadata.
    UpdatePageProperties(PagePropertiesInput),
    /// Replace the contract source.
    Evolve(EvolveInput),
}

impl ContractInput {
    /// Decodes a raw interaction input.
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` if `function` is missing or unrecognised.
    /// - `InvalidInput` if the payload does not match the operation's shape.
    pub fn decode(input: &Value) -> Result<Self, ContractError> {
        let function = input
            .get("function")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let decoded = match function {
            "transfer" => Self::Transfer(payload(input)?),
            "balance" => Self::Balance(payload(input)?),
            "unlockedBalance" => Self::UnlockedBalance(payload(input)?),
            "lock" => Self::Lock(payload(input)?),
            "increaseVault" => Self::IncreaseVault(payload(input)?),
            "unlock" => Self::Unlock,
            "vaultBalance" => Self::VaultBalance(payload(input)?),
            "propose" => Self::Propose(payload(input)?),
            "vote" => Self::Vote(payload(input)?),
            "finalize" => Self::Finalize(payload(input)?),
            "role" => Self::Role(payload(input)?),
            "approvePage" => Self::ApprovePage(payload(input)?),
            "updatePageSponsor" => Self::UpdatePageSponsor(payload(input)?),
            "stopPageSponsorshipAndDeactivatePage" => {
                Self::StopPageSponsorshipAndDeactivatePage(payload(input)?)
            }
            "balanceDetail" => Self::BalanceDetail(payload(input)?),
            "addPageUpdate" => Self::AddPageUpdate(payload(input)?),
            "activateDeactivatePage" => Self::ActivateDeactivatePage(payload(input)?),
            "addLanguage" => Self::AddLanguage(payload(input)?),
            "updateLanguage" => Self::UpdateLanguage(payload(input)?),
            "addCategory" => Self::AddCategory(payload(input)?),
            "updateCategory" => Self::UpdateCategory(payload(input)?),
            "updatePageProperties" => Self::UpdatePageProperties(payload(input)?),
            "evolve" => Self::Evolve(payload(input)?),
            other => return Err(ContractError::UnknownFunction(other.to_string())),
        };
        Ok(decoded)
    }

    /// Wire name of the operation.
    #[must_use]
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Transfer(_) => "transfer",
            Self::Balance(_) => "balance",
            Self::UnlockedBalance(_) => "unlockedBalance",
            Self::Lock(_) => "lock",
            Self::IncreaseVault(_) => "increaseVault",
            Self::Unlock => "unlock",
            Self::VaultBalance(_) => "vaultBalance",
            Self::Propose(_) => "propose",
            Self::Vote(_) => "vote",
            Self::Finalize(_) => "finalize",
            Self::Role(_) => "role",
            Self::ApprovePage(_) => "approvePage",
            Self::UpdatePageSponsor(_) => "updatePageSponsor",
            Self::StopPageSponsorshipAndDeactivatePage(_) => {
                "stopPageSponsorshipAndDeactivatePage"
            }
            Self::BalanceDetail(_) => "balanceDetail",
            Self::AddPageUpdate(_) => "addPageUpdate",
            Self::ActivateDeactivatePage(_) => "activateDeactivatePage",
            Self::AddLanguage(_) => "addLanguage",
            Self::UpdateLanguage(_) => "updateLanguage",
            Self::AddCategory(_) => "addCategory",
            Self::UpdateCategory(_) => "updateCategory",
            Self::UpdatePageProperties(_) => "updatePageProperties",
            Self::Evolve(_) => "evolve",
        }
    }

    /// True for operations that return a result and never touch state.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::Balance(_)
                | Self::UnlockedBalance(_)
                | Self::VaultBalance(_)
                | Self::Role(_)
                | Self::BalanceDetail(_)
        )
    }
}

fn payload<T: DeserializeOwned>(input: &Value) -> Result<T, ContractError> {
    T::deserialize(input).map_err(|e| ContractError::InvalidInput(e.to_string()))
}

/// Accepts a JSON number or a numeric string for fields that clients
/// historically send either way.
mod number_like {
    use crate::domain::value_objects::coerce_number;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
            Raw::Number(n) => n,
            Raw::Text(s) => coerce_number(&s),
        }))
    }
}

// =============================================================================
// TESTS
// =============================================================================
