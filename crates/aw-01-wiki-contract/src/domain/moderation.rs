//! # Moderation Workflow
//!
//! Languages, categories and pages, plus the stake escrow that sponsors a
//! page.
//!
//! ## Gates
//!
//! - **Moderator**: the caller's role is `MODERATOR` (case-insensitive).
//! - **Vault horizon**: the caller's vault balance covering
//!   `height + pageApprovalLength` reaches a threshold (`pageValue` for page
//!   approvals and updates, `moderatorsMinVaultBalance` for metadata).
//!
//! Language codes are trimmed and lower-cased, slugs are trimmed, before any
//! lookup.

use crate::domain::entities::{Category, Language, LockRecord, Page, PageUpdate, WikiState};
use crate::domain::invariants::limits;
use crate::domain::ledger::{
    append_lock, credit, debit, ensure_supply_headroom, free_balance, insert_stake, remove_stake,
    stake_of, vault_balance_covering_height,
};
use crate::domain::value_objects::{is_moderator_role, LockAction, WritingSystem};
use crate::input::{
    ActivatePageInput, AddPageUpdateInput, ApprovePageInput, CategoryInput, LanguageInput,
    PagePropertiesInput, PageRefInput, UpdatePageSponsorInput,
};
use shared_types::{ensure, non_negative_integer, positive_integer, Address, ContractError};

/// Whether an upsert-style operation creates or edits its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// The record must not exist yet.
    Add,
    /// The record must already exist.
    Update,
}

// =============================================================================
// GATES & FIELD HELPERS
// =============================================================================

fn ensure_moderator(state: &WikiState, caller: &Address) -> Result<(), ContractError> {
    let role = state.role_of(caller).unwrap_or_default();
    ensure(is_moderator_role(role), "Caller must be an admin.")
}

fn ensure_vault_horizon(
    state: &WikiState,
    caller: &Address,
    height: u64,
    required: u64,
) -> Result<(), ContractError> {
    ensure(
        state.vault.contains_key(caller),
        "Caller needs to have locked balances.",
    )?;
    let end = height.saturating_add(state.settings.page_approval_length);
    let covering = vault_balance_covering_height(&state.vault, caller, end);
    ensure(
        covering >= required,
        format!(
            "Caller doesn't have {required} or more tokens locked for enough time (start:{height}, end:{end}, vault:{covering})."
        ),
    )
}

fn required_text<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, ContractError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ContractError::rejected(message))
}

fn lang_key(value: Option<&str>, message: &str) -> Result<String, ContractError> {
    required_text(value, message).map(str::to_lowercase)
}

fn page_value(value: Option<f64>) -> Result<u64, ContractError> {
    value
        .and_then(positive_integer)
        .ok_or_else(|| ContractError::rejected("\"pageValue\" must be a positive integer."))
}

fn display_order(value: Option<f64>) -> Result<u64, ContractError> {
    value
        .and_then(non_negative_integer)
        .ok_or_else(|| ContractError::rejected("\"order\" must be a positive integer."))
}

fn max_length(value: &str, max: usize, field: &str) -> Result<(), ContractError> {
    ensure(
        value.chars().count() <= max,
        format!("{field} is longer than max allowed length {max}."),
    )
}

/// Resolves `(lang, slug)` of an existing page for the sponsor operations.
fn existing_page_ref(
    state: &WikiState,
    lang: Option<&str>,
    slug: Option<&str>,
) -> Result<(String, String), ContractError> {
    let lang = lang_key(lang, "LangCode must be specified")?;
    let slug = required_text(slug, "Slug must be specified")?.to_string();
    let pages = state
        .pages
        .get(&lang)
        .ok_or_else(|| ContractError::rejected("Invalid LangCode"))?;
    ensure(pages.contains_key(&slug), "Invalid slug!")?;
    Ok((lang, slug))
}

fn page_mut<'a>(state: &'a mut WikiState, lang: &str, slug: &str) -> Result<&'a mut Page, ContractError> {
    state
        .pages
        .get_mut(lang)
        .and_then(|pages| pages.get_mut(slug))
        .ok_or_else(|| ContractError::rejected("Page does not exist!"))
}

// =============================================================================
// PAGES
// =============================================================================

/// Creates a page. The approving moderator stakes `pageValue` as its first
/// sponsor and the author receives a matching vault record.
///
/// # Errors
///
/// Rejects invalid fields, non-moderators, moderators without enough locked
/// balance or free balance, taken slugs and unknown languages or categories.
pub fn approve_page(
    state: &mut WikiState,
    caller: &Address,
    input: &ApprovePageInput,
    height: u64,
) -> Result<(), ContractError> {
    let author = input
        .author
        .as_deref()
        .and_then(Address::parse)
        .ok_or_else(|| ContractError::rejected("Invalid author."))?;
    let value = page_value(input.page_value)?;
    ensure_moderator(state, caller)?;
    let lang = lang_key(input.lang_code.as_deref(), "LangCode must be specified")?;
    let slug = required_text(input.slug.as_deref(), "Slug must be specified")?;
    max_length(slug, limits::PAGE_SLUG_MAX_LENGTH, "slug")?;
    let category = required_text(input.category.as_deref(), "Category must be specified")?;
    let page_tx = required_text(input.page_tx.as_deref(), "PageTX must be specified")?;
    ensure(Address::parse(page_tx).is_some(), "Invalid pageTX.")?;
    ensure_vault_horizon(state, caller, height, value)?;

    let pages = state
        .pages
        .get(&lang)
        .ok_or_else(|| ContractError::rejected("Invalid LangCode (pages)!"))?;
    let categories = state
        .categories
        .get(&lang)
        .ok_or_else(|| ContractError::rejected("Invalid LangCode (categories)!"))?;
    ensure(!pages.contains_key(slug), "Slug already taken!")?;
    ensure(categories.contains_key(category), "Invalid Category!")?;
    ensure(
        stake_of(&state.stakes, caller, &lang, slug).is_none(),
        "User is already staking on this page",
    )?;
    ensure(
        state.balances.contains_key(caller) && free_balance(&state.balances, caller) >= value,
        "Not enough balance.",
    )?;
    ensure_supply_headroom(state, value, "'value' too large.")?;

    let end = height.saturating_add(state.settings.page_approval_length);
    debit(&mut state.balances, caller, value);
    insert_stake(&mut state.stakes, caller, &lang, slug, value);
    append_lock(
        &mut state.vault,
        &author,
        LockRecord::for_page(value, height, end, &lang, slug, LockAction::New),
    );
    let page = Page {
        nft: None,
        sponsor: Some(caller.clone()),
        value,
        updates: vec![PageUpdate {
            tx: page_tx.to_string(),
            approved_by: caller.clone(),
            at: height,
            value,
        }],
        category: category.to_string(),
        order: 0,
        active: true,
        show_in_menu: false,
        show_in_footer: false,
        show_in_main_page: false,
    };
    state.pages.entry(lang).or_default().insert(slug.to_string(), page);
    Ok(())
}

/// Outbids the current sponsor of a page. The previous sponsor's stake is
/// refunded to their free balance.
///
/// When `require_vault` is set the caller must also hold locked balance
/// covering the approval horizon worth at least the new value.
///
/// # Errors
///
/// Rejects unknown pages, non-increasing values, callers already staking
/// on the page and insufficient balances.
pub fn update_page_sponsor(
    state: &mut WikiState,
    caller: &Address,
    input: &UpdatePageSponsorInput,
    height: u64,
    require_vault: bool,
) -> Result<(), ContractError> {
    let (lang, slug) = existing_page_ref(state, input.lang_code.as_deref(), input.slug.as_deref())?;
    let value = page_value(input.page_value)?;
    let balance = free_balance(&state.balances, caller);
    ensure(
        state.balances.contains_key(caller) && balance >= value,
        format!("Not enough balance :: {balance} vs {value}"),
    )?;
    if require_vault {
        ensure_vault_horizon(state, caller, height, value)?;
    }
    ensure_supply_headroom(state, value, "'value' too large.")?;
    ensure(
        stake_of(&state.stakes, caller, &lang, &slug).is_none(),
        "User is already staking for this page",
    )?;
    let page = page_mut(state, &lang, &slug)?;
    ensure(
        page.sponsor.as_ref() != Some(caller),
        "Caller is already staking for this page",
    )?;
    ensure(
        value > page.value,
        "New page value must be greater than the previous one.",
    )?;
    let previous_sponsor = page.sponsor.replace(caller.clone());
    page.value = value;
    page.active = true;

    debit(&mut state.balances, caller, value);
    if let Some(previous) = previous_sponsor {
        if let Some(refund) = remove_stake(&mut state.stakes, &previous, &lang, &slug) {
            credit(&mut state.balances, &previous, refund);
        }
    }
    insert_stake(&mut state.stakes, caller, &lang, &slug, value);
    Ok(())
}

/// Withdraws the caller's sponsorship, refunding the stake and deactivating
/// the page.
///
/// # Errors
///
/// Rejects unknown pages and callers who are not the staking sponsor.
pub fn stop_page_sponsorship(
    state: &mut WikiState,
    caller: &Address,
    input: &PageRefInput,
) -> Result<(), ContractError> {
    let (lang, slug) = existing_page_ref(state, input.lang_code.as_deref(), input.slug.as_deref())?;
    ensure(
        stake_of(&state.stakes, caller, &lang, &slug).is_some(),
        "User is not staking for this page",
    )?;
    let page = page_mut(state, &lang, &slug)?;
    ensure(page.sponsor.as_ref() == Some(caller), "User is not the sponsor")?;
    page.sponsor = None;
    page.active = false;

    if let Some(refund) = remove_stake(&mut state.stakes, caller, &lang, &slug) {
        credit(&mut state.balances, caller, refund);
    }
    Ok(())
}

/// Approves a revision of an active page and rewards its author with a
/// vault record.
///
/// # Errors
///
/// Rejects invalid fields, unknown pages or categories, non-moderators,
/// inactive pages and moderators without enough locked balance.
pub fn add_page_update(
    state: &mut WikiState,
    caller: &Address,
    input: &AddPageUpdateInput,
    height: u64,
) -> Result<(), ContractError> {
    let value = page_value(input.page_value)?;
    let author = required_text(input.author.as_deref(), "Author address must be specified")?;
    let author = Address::parse(author).ok_or_else(|| ContractError::rejected("Invalid author."))?;
    let lang = lang_key(input.lang_code.as_deref(), "LangCode must be specified")?;
    let slug = required_text(input.slug.as_deref(), "Slug must be specified")?;
    let update_tx = required_text(input.update_tx.as_deref(), "UpdateTX must be specified")?;

    let pages = state
        .pages
        .get(&lang)
        .ok_or_else(|| ContractError::rejected("Invalid LangCode (pages)"))?;
    let categories = state
        .categories
        .get(&lang)
        .ok_or_else(|| ContractError::rejected("Invalid LangCode (categories)"))?;
    let page = pages
        .get(slug)
        .ok_or_else(|| ContractError::rejected("Invalid slug!"))?;
    let category = required_text(input.category.as_deref(), "Category must be specified")?;
    ensure(categories.contains_key(category), "Invalid Category!")?;
    ensure_moderator(state, caller)?;
    ensure(page.active, "Page is inactive")?;
    ensure_vault_horizon(state, caller, height, value)?;
    ensure_supply_headroom(state, value, "'value' too large.")?;

    let end = height.saturating_add(state.settings.page_approval_length);
    let page = page_mut(state, &lang, slug)?;
    page.updates.push(PageUpdate {
        tx: update_tx.to_string(),
        approved_by: caller.clone(),
        at: height,
        value,
    });
    page.category = category.to_string();
    append_lock(
        &mut state.vault,
        &author,
        LockRecord::for_page(value, height, end, &lang, slug, LockAction::Update),
    );
    Ok(())
}

/// Shows or hides a page. Only a moderator who is also its staking sponsor
/// may do this.
///
/// # Errors
///
/// Rejects unknown pages, non-moderators and callers who are not the
/// staking sponsor.
pub fn activate_deactivate_page(
    state: &mut WikiState,
    caller: &Address,
    input: &ActivatePageInput,
) -> Result<(), ContractError> {
    let (lang, slug) = existing_page_ref(state, input.lang_code.as_deref(), input.slug.as_deref())?;
    ensure_moderator(state, caller)?;
    ensure(
        stake_of(&state.stakes, caller, &lang, &slug).is_some(),
        "User is not staking for this page",
    )?;
    let page = page_mut(state, &lang, &slug)?;
    ensure(page.sponsor.as_ref() == Some(caller), "User is not the sponsor")?;
    page.active = input.active;
    Ok(())
}

/// Writes page display metadata and the optional NFT link.
///
/// # Errors
///
/// Rejects non-moderators, unknown languages or pages, invalid orders,
/// moderators without the minimum locked balance and malformed NFT
/// addresses.
pub fn update_page_properties(
    state: &mut WikiState,
    caller: &Address,
    input: &PagePropertiesInput,
    height: u64,
) -> Result<(), ContractError> {
    ensure_moderator(state, caller)?;
    let lang = lang_key(input.lang_code.as_deref(), "langCode must be specified")?;
    ensure(
        state.pages.contains_key(&lang),
        format!("LangCode does not exist! {lang}"),
    )?;
    let order = display_order(input.order)?;
    ensure_vault_horizon(
        state,
        caller,
        height,
        state.settings.moderators_min_vault_balance,
    )?;
    let slug = input.slug.as_deref().map(str::trim).unwrap_or_default();
    ensure(state.page(&lang, slug).is_some(), "Page does not exist!")?;
    let nft = match input.nft.as_deref().map(str::trim).unwrap_or_default() {
        "" => None,
        raw => Some(
            Address::parse(raw).ok_or_else(|| ContractError::rejected("Invalid NFT address!"))?,
        ),
    };

    let page = page_mut(state, &lang, slug)?;
    page.order = order;
    page.nft = nft;
    page.show_in_menu = input.show_in_menu;
    page.show_in_main_page = input.show_in_main_page;
    page.show_in_footer = input.show_in_footer;
    Ok(())
}

// =============================================================================
// LANGUAGES
// =============================================================================

/// Creates or edits a language. A new language also gets empty page and
/// category maps.
///
/// # Errors
///
/// Rejects non-moderators, invalid fields, moderators without the minimum
/// locked balance, adding an existing code and updating a missing one.
pub fn upsert_language(
    state: &mut WikiState,
    caller: &Address,
    input: &LanguageInput,
    height: u64,
    mode: Upsert,
) -> Result<(), ContractError> {
    ensure_moderator(state, caller)?;
    let lang = lang_key(input.lang_code.as_deref(), "langCode must be specified")?;
    max_length(&lang, limits::LANG_CODE_MAX_LENGTH, "langCode")?;
    let iso_name = input
        .iso_name
        .as_deref()
        .ok_or_else(|| ContractError::rejected("isoName must be specified"))?
        .trim();
    max_length(iso_name, limits::LANG_NAME_MAX_LENGTH, "isoName")?;
    let native_name = input
        .native_name
        .as_deref()
        .ok_or_else(|| ContractError::rejected("nativeName must be specified"))?
        .trim();
    max_length(native_name, limits::LANG_NAME_MAX_LENGTH, "nativeName")?;
    let writing_system = input
        .writing_system
        .as_deref()
        .map(|ws| ws.trim().to_uppercase())
        .as_deref()
        .and_then(WritingSystem::parse)
        .ok_or_else(|| ContractError::rejected("Invalid writing system."))?;
    ensure_vault_horizon(
        state,
        caller,
        height,
        state.settings.moderators_min_vault_balance,
    )?;
    match mode {
        Upsert::Add => ensure(
            !state.languages.contains_key(&lang),
            "LangCode already exists!",
        )?,
        Upsert::Update => ensure(
            state.languages.contains_key(&lang),
            "LangCode does not exist!",
        )?,
    }

    let language = Language {
        active: mode == Upsert::Add || input.active,
        iso_name: iso_name.to_string(),
        native_name: native_name.to_string(),
        writing_system,
    };
    state.languages.insert(lang.clone(), language);
    if mode == Upsert::Add {
        state.pages.entry(lang.clone()).or_default();
        state.categories.entry(lang).or_default();
    }
    Ok(())
}

// =============================================================================
// CATEGORIES
// =============================================================================

/// Creates or edits a category.
///
/// The parent must exist in the same language and differ from the category
/// itself. Longer parent chains are not checked for cycles.
///
/// # Errors
///
/// Rejects non-moderators, unknown languages, invalid fields, unknown
/// parents, moderators without the minimum locked balance, adding an
/// existing slug, updating a missing one and self-parenting.
pub fn upsert_category(
    state: &mut WikiState,
    caller: &Address,
    input: &CategoryInput,
    height: u64,
    mode: Upsert,
) -> Result<(), ContractError> {
    ensure_moderator(state, caller)?;
    let lang = lang_key(input.lang_code.as_deref(), "langCode must be specified")?;
    let categories = state
        .categories
        .get(&lang)
        .ok_or_else(|| ContractError::rejected(format!("LangCode does not exist! {lang}")))?;
    let label = input
        .label
        .as_deref()
        .ok_or_else(|| ContractError::rejected("label must be specified"))?
        .trim();
    max_length(label, limits::CATEGORY_LABEL_MAX_LENGTH, "label")?;
    let slug = required_text(input.slug.as_deref(), "Slug must be specified")?;
    max_length(slug, limits::CATEGORY_SLUG_MAX_LENGTH, "slug")?;
    let parent = input.parent.as_deref().map(str::trim).filter(|p| !p.is_empty());
    if let Some(parent) = parent {
        ensure(
            categories.contains_key(parent),
            format!("Parent id is not a valid category {parent}."),
        )?;
    }
    let order = display_order(input.order)?;
    ensure_vault_horizon(
        state,
        caller,
        height,
        state.settings.moderators_min_vault_balance,
    )?;
    let exists = categories.contains_key(slug);
    match mode {
        Upsert::Add => ensure(!exists, "Category already exists!")?,
        Upsert::Update => ensure(exists, "Category does not exist!")?,
    }
    ensure(parent != Some(slug), "Slug and parent_id must be different!")?;

    let category = Category {
        label: label.to_string(),
        order,
        active: mode == Upsert::Add || input.active,
        parent_id: parent.map(str::to_string),
    };
    state
        .categories
        .entry(lang)
        .or_default()
        .insert(slug.to_string(), category);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
