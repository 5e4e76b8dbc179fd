//! Page NFT ownership following wiki sponsorship, replayed through the host.

use super::addr;
use aw_01_wiki_contract::service::ContractConfig;
use aw_02_atomic_nft::domain::entities::NftState;
use serde_json::{json, Value};
use shared_types::Address;
use std::path::PathBuf;
use wiki_runtime::host::HostedContract;
use wiki_runtime::{ContractHost, GenesisFile, InteractionRecord, RuntimeConfig};

/// Devnet wiki at `w` operated by `o`, page NFT at `n` held by `o` and
/// linked to page `en/home`.
fn host() -> ContractHost {
    let genesis: GenesisFile = serde_json::from_value(json!({
        "contracts": {
            addr('w').to_string(): {
                "kind": "wiki",
                "name": "ArWiki",
                "ticker": "AWK",
                "owner": addr('o').to_string(),
                "balances": {addr('o').to_string(): 500},
                "vault": [{"address": addr('o').to_string(), "balance": 500, "start": 0, "end": 788_400}],
                "moderators": [addr('o').to_string()],
                "languages": [{
                    "code": "en",
                    "isoName": "English",
                    "nativeName": "English",
                    "writingSystem": "LTR"
                }]
            },
            addr('n').to_string(): {
                "kind": "atomicNft",
                "balances": {addr('o').to_string(): 1},
                "title": "Home",
                "name": "ArWiki Page",
                "ticker": "AWP",
                "contentType": "text/markdown",
                "linkedContract": addr('w').to_string(),
                "linkedProperties": {"slug": "home", "langCode": "en"}
            }
        }
    }))
    .unwrap();
    let config = RuntimeConfig {
        genesis_path: PathBuf::from("genesis.json"),
        interactions_path: None,
        contract: ContractConfig::default(),
        strict_heights: true,
    };
    ContractHost::from_genesis(genesis, &config).unwrap()
}

fn record(contract: char, height: u64, caller: char, input: Value) -> InteractionRecord {
    InteractionRecord {
        contract: addr(contract),
        height,
        caller: addr(caller),
        input,
    }
}

/// Category, page approval by `o`, funds for `b`, and `b` outbidding `o`.
fn sponsored_by_b() -> Vec<InteractionRecord> {
    vec![
        record('w', 1, 'o', json!({
            "function": "addCategory", "langCode": "en", "label": "General", "slug": "general", "order": 1
        })),
        record('w', 2, 'o', json!({
            "function": "approvePage",
            "author": addr('a').to_string(),
            "pageTX": addr('t').to_string(),
            "pageValue": 10,
            "langCode": "en",
            "slug": "home",
            "category": "general"
        })),
        record('w', 3, 'o', json!({"function": "transfer", "target": addr('b').to_string(), "qty": 100})),
        record('w', 4, 'b', json!({
            "function": "updatePageSponsor", "langCode": "en", "slug": "home", "pageValue": 20
        })),
    ]
}

fn nft_state(host: &ContractHost) -> NftState {
    match host.store().get(&addr('n')) {
        Some(HostedContract::AtomicNft(state)) => state,
        other => panic!("expected an NFT at n, got {other:?}"),
    }
}

fn nft_transfer(height: u64, target: &Address) -> InteractionRecord {
    record('n', height, 'o', json!({"function": "transfer", "target": target.to_string(), "qty": 1}))
}

#[tokio::test]
async fn test_nft_follows_new_sponsor() {
    let mut host = host();
    let mut records = sponsored_by_b();
    records.push(nft_transfer(5, &addr('b')));

    let summary = host.replay(&records).await.unwrap();
    assert_eq!((summary.accepted, summary.rejected), (5, 0));

    let nft = nft_state(&host);
    assert_eq!(nft.owner(), Some(&addr('b')));
    assert_eq!(nft.balance_of(&addr('o')), 0);
    assert_eq!(summary.digests.len(), 2);
}

#[tokio::test]
async fn test_nft_rejects_non_sponsor() {
    let mut host = host();
    let mut records = sponsored_by_b();
    // `o` lost the sponsorship at height 4.
    records.push(nft_transfer(5, &addr('c')));

    let summary = host.replay(&records).await.unwrap();
    assert_eq!(summary.rejected, 1);
    assert_eq!(nft_state(&host).owner(), Some(&addr('o')));
}

#[tokio::test]
async fn test_moderator_relinks_nft() {
    let mut host = host();
    let records = vec![
        record('n', 1, 'b', json!({"function": "updateLinkedContract", "contractAddress": addr('x').to_string()})),
        record('n', 2, 'o', json!({"function": "updateLinkedContract", "contractAddress": addr('x').to_string()})),
        // The new link does not resolve to a hosted wiki.
        nft_transfer(3, &addr('b')),
    ];

    let summary = host.replay(&records).await.unwrap();
    assert_eq!((summary.accepted, summary.rejected), (1, 2));
    assert_eq!(nft_state(&host).linked_contract, addr('x'));
}
