use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ethers::types::{Address, U256};

use token_analyzer::{
    analyzer::{extract_participants, rank_holders, Holder},
    constants::TRANSFER_TOPIC,
    explorer::TransferLog,
    utils::{format_amount, to_display_amount},
};

fn sample_holders(count: u64) -> Vec<Holder> {
    (1..=count)
        .map(|i| {
            let amount = U256::from((i * 7_919) % 10_007) * U256::exp10(15);
            Holder {
                address: Address::from_low_u64_be(i),
                amount,
                display: to_display_amount(amount, 18),
            }
        })
        .collect()
}

fn sample_logs(count: u64) -> Vec<TransferLog> {
    let topic = |i: u64| format!("0x{:0>64x}", i);
    (1..=count)
        .map(|i| TransferLog {
            topics: vec![TRANSFER_TOPIC.to_string(), topic(i % 311), topic(i % 173 + 1)],
            address: String::new(),
            data: "0x".to_string(),
            block_number: String::new(),
            transaction_hash: String::new(),
        })
        .collect()
}

pub fn benchmark_unit_conversion(c: &mut Criterion) {
    let amount = U256::from_dec_str("123456789012345678901234567890").unwrap();

    c.bench_function("format_amount", |b| {
        b.iter(|| format_amount(black_box(amount), black_box(18)))
    });
    c.bench_function("to_display_amount", |b| {
        b.iter(|| to_display_amount(black_box(amount), black_box(18)))
    });
}

pub fn benchmark_sampling(c: &mut Criterion) {
    let holders = sample_holders(1_000);
    let logs = sample_logs(1_000);

    c.bench_function("rank_holders", |b| {
        b.iter(|| rank_holders(black_box(holders.clone()), black_box(10)))
    });
    c.bench_function("extract_participants", |b| {
        b.iter(|| extract_participants(black_box(&logs)))
    });
}

criterion_group!(benches, benchmark_unit_conversion, benchmark_sampling);
criterion_main!(benches);
