//! End-to-end contract flows through the JSON entry point.

use super::{addr, apply, call, wiki_from_genesis};
use aw_01_wiki_contract::domain::entities::{LockRecord, WikiState};
use aw_01_wiki_contract::domain::ledger::{insert_stake, stake_of, total_supply};
use aw_01_wiki_contract::domain::value_objects::VoteStatus;
use aw_01_wiki_contract::ports::inbound::WikiContractApi;
use aw_01_wiki_contract::service::{load_state, ContractConfig, WikiContractService};
use serde_json::{json, Value};
use shared_types::{BlockContext, ContractError, Interaction};

/// `a` holds 1000 free tokens; locks may be as short as one block.
fn token_wiki() -> WikiState {
    wiki_from_genesis(json!({
        "name": "ArWiki",
        "ticker": "AWK",
        "balances": {addr('a').to_string(): 1000},
        "settings": {"lockMinLength": 1, "lockMaxLength": 1000}
    }))
}

/// `a` and `b` hold locks over [0, 1000); voteLength 10; quorum 0.3.
fn governed_wiki() -> WikiState {
    wiki_from_genesis(json!({
        "name": "ArWiki",
        "ticker": "AWK",
        "vault": [
            {"address": addr('a').to_string(), "balance": 100, "start": 0, "end": 1000},
            {"address": addr('b').to_string(), "balance": 50, "start": 0, "end": 1000}
        ],
        "settings": {"voteLength": 10, "lockMinLength": 5, "quorum": 0.3}
    }))
}

/// Moderator `m` (1000 free, 500 locked until 1_000_000), users `b` and `c`
/// with 100 free each, language `en` with category `general`.
fn moderated_wiki() -> WikiState {
    let state = wiki_from_genesis(json!({
        "name": "ArWiki",
        "ticker": "AWK",
        "balances": {
            addr('m').to_string(): 1000,
            addr('b').to_string(): 100,
            addr('c').to_string(): 100
        },
        "vault": [{"address": addr('m').to_string(), "balance": 500, "start": 0, "end": 1_000_000}],
        "moderators": [addr('m').to_string()],
        "languages": [{
            "code": "en",
            "isoName": "English",
            "nativeName": "English",
            "writingSystem": "LTR"
        }],
        "settings": {"pageApprovalLength": 100}
    }));
    apply(
        &state,
        &addr('m'),
        0,
        json!({"function": "addCategory", "langCode": "en", "label": "General", "slug": "general", "order": 1}),
    )
}

fn approve(slug: &str, value: u64) -> Value {
    json!({
        "function": "approvePage",
        "author": addr('w').to_string(),
        "pageTX": addr('t').to_string(),
        "pageValue": value,
        "langCode": "en",
        "slug": slug,
        "category": "general"
    })
}

fn sponsor(slug: &str, value: u64) -> Value {
    json!({"function": "updatePageSponsor", "langCode": "en", "slug": slug, "pageValue": value})
}

fn balance_of(state: &WikiState, function: &str, target: char) -> u64 {
    let result = call(state, &addr(target), 0, json!({"function": function}))
        .unwrap()
        .into_result()
        .unwrap();
    serde_json::to_value(result).unwrap()["balance"].as_u64().unwrap()
}

fn hundred_for_a() -> WikiState {
    wiki_from_genesis(json!({
        "name": "ArWiki",
        "ticker": "AWK",
        "balances": {addr('a').to_string(): 100},
        "settings": {"lockMinLength": 1, "lockMaxLength": 1000}
    }))
}

#[test]
fn test_transfer_forty() {
    let (a, b) = (addr('a'), addr('b'));
    let state = apply(
        &hundred_for_a(),
        &a,
        0,
        json!({"function": "transfer", "target": b.to_string(), "qty": 40}),
    );
    assert_eq!(state.balances[&a], 60);
    assert_eq!(state.balances[&b], 40);
}

#[test]
fn test_lock_thirty_for_ten_blocks() {
    let a = addr('a');
    let state = apply(&hundred_for_a(), &a, 5, json!({"function": "lock", "qty": 30, "lockLength": 10}));
    assert_eq!(state.balances[&a], 70);
    assert_eq!(state.vault[&a], vec![LockRecord::new(30, 5, 15)]);
}

#[test]
fn test_transfer_moves_free_balance() {
    let state = token_wiki();
    let state = apply(
        &state,
        &addr('a'),
        1,
        json!({"function": "transfer", "target": addr('b').to_string(), "qty": 100}),
    );
    assert_eq!(state.balances[&addr('a')], 900);
    assert_eq!(state.balances[&addr('b')], 100);
    assert_eq!(total_supply(&state), 1000);

    let result = call(
        &state,
        &addr('z'),
        1,
        json!({"function": "balance", "target": addr('b').to_string()}),
    )
    .unwrap()
    .into_result()
    .unwrap();
    assert_eq!(
        serde_json::to_value(result).unwrap(),
        json!({"target": addr('b').to_string(), "ticker": "AWK", "balance": 100})
    );

    let err = call(
        &state,
        &addr('b'),
        2,
        json!({"function": "transfer", "target": addr('a').to_string(), "qty": 101}),
    )
    .unwrap_err();
    assert_eq!(err.message(), "Caller balance not high enough to send 101 token(s)!");
}

#[test]
fn test_lock_then_unlock_round_trip() {
    let a = addr('a');
    let state = apply(&token_wiki(), &a, 5, json!({"function": "lock", "qty": 10, "lockLength": 1}));
    assert_eq!(state.balances[&a], 990);
    let record = &state.vault[&a][0];
    assert_eq!((record.balance, record.start, record.end), (10, 5, 6));
    assert_eq!(balance_of(&state, "unlockedBalance", 'a'), 990);
    assert_eq!(balance_of(&state, "balance", 'a'), 1000);

    // Still locked at its own start height.
    let same = apply(&state, &a, 5, json!({"function": "unlock"}));
    assert_eq!(same.balances[&a], 990);

    let released = apply(&state, &a, 6, json!({"function": "unlock"}));
    assert_eq!(released.balances[&a], 1000);
    assert!(released.vault[&a].is_empty());
    assert_eq!(total_supply(&released), 1000);
}

#[test]
fn test_unlock_is_idempotent() {
    let a = addr('a');
    let state = apply(&token_wiki(), &a, 0, json!({"function": "lock", "qty": 10, "lockLength": 1}));
    let once = apply(&state, &a, 50, json!({"function": "unlock"}));
    let twice = apply(&once, &a, 50, json!({"function": "unlock"}));
    assert_eq!(once, twice);
}

#[test]
fn test_lock_length_out_of_range() {
    let err = call(
        &token_wiki(),
        &addr('a'),
        0,
        json!({"function": "lock", "qty": 10, "lockLength": 1001}),
    )
    .unwrap_err();
    assert_eq!(
        err.message(),
        "lockLength is out of range. lockLength must be between 1 - 1000."
    );
}

#[test]
fn test_set_quorum_through_governance() {
    let (a, b) = (addr('a'), addr('b'));
    let mut state = governed_wiki();
    state = apply(
        &state,
        &a,
        1,
        json!({"function": "propose", "type": "set", "key": "quorum", "value": 0.6, "note": "raise quorum"}),
    );
    state = apply(&state, &a, 2, json!({"function": "vote", "id": 0, "cast": "yay"}));
    // Last block of the window.
    state = apply(&state, &b, 10, json!({"function": "vote", "id": 0, "cast": "yay"}));

    let err = call(&state, &a, 10, json!({"function": "finalize", "id": 0})).unwrap_err();
    assert_eq!(err.message(), "Vote has not yet concluded.");

    state = apply(&state, &b, 11, json!({"function": "finalize", "id": 0}));
    assert_eq!(state.votes[0].status, VoteStatus::Passed);
    assert!((state.settings.quorum - 0.6).abs() < f64::EPSILON);

    let err = call(&state, &a, 12, json!({"function": "finalize", "id": 0})).unwrap_err();
    assert_eq!(err.message(), "Vote is not active.");
}

#[test]
fn test_vote_window_closes_at_start_plus_length() {
    let (a, b) = (addr('a'), addr('b'));
    let state = apply(
        &governed_wiki(),
        &a,
        1,
        json!({"function": "propose", "type": "indicative", "note": "poll"}),
    );
    assert!(call(&state, &b, 10, json!({"function": "vote", "id": 0, "cast": "nay"})).is_ok());
    let err = call(&state, &b, 11, json!({"function": "vote", "id": 0, "cast": "nay"})).unwrap_err();
    assert_eq!(err.message(), "Vote has already concluded.");
}

#[test]
fn test_non_moderator_cannot_approve_page() {
    let state = moderated_wiki();
    let err = call(&state, &addr('b'), 1, approve("home", 10)).unwrap_err();
    assert_eq!(err.message(), "Caller must be an admin.");
}

#[test]
fn test_sponsorship_outbidding() {
    let (m, b, c) = (addr('m'), addr('b'), addr('c'));
    let mut state = apply(&moderated_wiki(), &m, 1, approve("home", 10));
    assert_eq!(state.balances[&m], 990);
    let supply = total_supply(&state);

    state = apply(&state, &b, 2, sponsor("home", 20));
    assert_eq!(state.balances[&m], 1000);
    assert_eq!(state.balances[&b], 80);

    state = apply(&state, &c, 3, sponsor("home", 30));
    assert_eq!(state.balances[&b], 100);
    assert_eq!(stake_of(&state.stakes, &c, "en", "home"), Some(30));
    assert_eq!(state.page("en", "home").unwrap().sponsor.as_ref(), Some(&c));
    assert_eq!(total_supply(&state), supply);

    let err = call(&state, &b, 4, sponsor("home", 25)).unwrap_err();
    assert_eq!(err.message(), "New page value must be greater than the previous one.");
}

#[test]
fn test_rejection_after_handler_writes_leaves_state_untouched() {
    let (a, b) = (addr('a'), addr('b'));
    let mut state = WikiState::new("ArWiki", "AWK");
    state.balances.insert(a.clone(), 100);
    // A stake without a sponsored page: the transfer itself succeeds on the
    // working copy, then the post-call consistency check rejects it.
    insert_stake(&mut state.stakes, &b, "en", "ghost", 1);
    let before = state.clone();

    let mut service = WikiContractService::new(ContractConfig::default());
    let transfer = Interaction::new(
        a.clone(),
        json!({"function": "transfer", "target": b.to_string(), "qty": 40}),
    );
    let err = service
        .apply_interaction(&mut state, &transfer, BlockContext::at(1))
        .unwrap_err();
    assert!(matches!(err, ContractError::InvariantViolated(_)));
    assert_eq!(state, before);
    assert_eq!(service.stats().rejections, 1);

    let mut relaxed = WikiContractService::new(ContractConfig {
        verify_invariants: false,
        ..ContractConfig::default()
    });
    relaxed
        .apply_interaction(&mut state, &transfer, BlockContext::at(1))
        .unwrap();
    assert_eq!(state.balances[&a], 60);
}

#[test]
fn test_state_json_survives_reload() {
    let state = apply(&moderated_wiki(), &addr('m'), 1, approve("home", 10));
    let value = serde_json::to_value(&state).unwrap();
    assert!(value["pages"]["en"]["home"].is_object());
    let reloaded = load_state(value).unwrap();
    assert_eq!(reloaded, state);
}

#[test]
fn test_unknown_function() {
    let err = call(&token_wiki(), &addr('a'), 0, json!({"function": "mint"})).unwrap_err();
    assert_eq!(
        err.message(),
        "No function supplied or function not recognised: \"mint\""
    );
}
