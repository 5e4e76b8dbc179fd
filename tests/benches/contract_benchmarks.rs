//! # ArWiki Contract Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | aw-01-dispatch | Decode, dispatch and invariant check of one `transfer` |
//! | aw-01-vote-weight | Total vote weight over a growing vault |
//! | runtime-replay | Host replay of a transfer log |

use aw_01_wiki_contract::domain::entities::{LockRecord, WikiState};
use aw_01_wiki_contract::domain::governance::total_vote_weight;
use aw_01_wiki_contract::service::{handle, ContractConfig};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use serde_json::json;
use shared_types::{Address, BlockContext, Interaction};
use wiki_runtime::host::HostedContract;
use wiki_runtime::{ContractHost, GenesisBuilder, GenesisConfig, InteractionRecord};

fn addr(i: usize) -> Address {
    let mut raw = format!("{i:0>43}");
    raw.truncate(43);
    Address::parse(&raw).expect("numeric addresses are valid")
}

fn funded_wiki(accounts: usize) -> WikiState {
    let mut state = WikiState::new("ArWiki", "AWK");
    for i in 0..accounts {
        state.balances.insert(addr(i), 1_000_000);
    }
    state
}

// ============================================================================
// AW-01: Dispatch
// ============================================================================

fn bench_transfer_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("aw-01-dispatch");
    let config = ContractConfig::default();

    for accounts in [10, 1_000] {
        let state = funded_wiki(accounts);
        let call = Interaction::new(
            addr(0),
            json!({"function": "transfer", "target": addr(1).to_string(), "qty": 10}),
        );
        group.bench_with_input(BenchmarkId::new("transfer", accounts), &state, |b, state| {
            b.iter_batched(
                || state.clone(),
                |state| black_box(handle(state, &call, BlockContext::at(1), &config)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

// ============================================================================
// AW-01: Vote weight
// ============================================================================

fn bench_vote_weight(c: &mut Criterion) {
    let mut group = c.benchmark_group("aw-01-vote-weight");
    let mut rng = rand::thread_rng();

    for locks in [100, 10_000] {
        let mut state = funded_wiki(0);
        for i in 0..locks {
            let start = rng.gen_range(0..1_000);
            let record = LockRecord::new(rng.gen_range(1..10_000), start, start + rng.gen_range(1..10_000));
            state.vault.entry(addr(i % 500)).or_default().push(record);
        }
        group.throughput(Throughput::Elements(locks as u64));
        group.bench_with_input(BenchmarkId::new("total", locks), &state, |b, state| {
            b.iter(|| black_box(total_vote_weight(&state.vault)));
        });
    }
    group.finish();
}

// ============================================================================
// Runtime: Replay
// ============================================================================

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("runtime-replay");
    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let operator = addr(0);
    let wiki = addr(999);
    let genesis = GenesisBuilder::new(GenesisConfig::devnet(&operator, 1_000_000))
        .build()
        .expect("devnet genesis");

    for len in [10, 100] {
        let records: Vec<InteractionRecord> = (0..len)
            .map(|i| InteractionRecord {
                contract: wiki.clone(),
                height: i as u64,
                caller: operator.clone(),
                input: json!({"function": "transfer", "target": addr(1 + i % 20).to_string(), "qty": 1}),
            })
            .collect();
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("transfers", len), &records, |b, records| {
            b.iter_batched(
                || {
                    let host = ContractHost::new(ContractConfig::default(), false);
                    host.deploy(wiki.clone(), HostedContract::Wiki(genesis.clone()));
                    host
                },
                |mut host| black_box(runtime.block_on(host.replay(records))),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transfer_dispatch, bench_vote_weight, bench_replay);
criterion_main!(benches);
