use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use market_feed_protocol::{
    decode_blockhash, decode_message, decode_pool_update, decode_pool_update_batch,
    decode_price_entries, decode_priority_fees, decode_quote,
};

fn le(out: &mut Vec<u8>, v: u64) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn pool_update(mints: usize) -> Vec<u8> {
    let mut p = Vec::new();
    le(&mut p, 64);
    p.extend_from_slice(&[0x5A; 64]);
    le(&mut p, 1);
    le(&mut p, 2);
    le(&mut p, 3);
    le(&mut p, 11);
    p.extend_from_slice(b"RaydiumClmm");
    p.extend_from_slice(&[9; 32]);
    le(&mut p, mints as u64);
    for i in 0..mints {
        p.extend_from_slice(&[i as u8 + 1; 32]);
    }
    le(&mut p, mints as u64);
    for i in 0..mints {
        le(&mut p, i as u64 * 1_000);
    }
    le(&mut p, mints as u64);
    for _ in 0..mints {
        p.extend_from_slice(&9i32.to_le_bytes());
    }
    p.push(1);
    le(&mut p, 100);
    le(&mut p, 10);
    p.push(0);
    p
}

fn quote() -> Vec<u8> {
    let mut p = Vec::new();
    le(&mut p, 8);
    p.extend_from_slice(b"SOL-USDC");
    le(&mut p, 1_700_000_000_000);
    le(&mut p, 42);
    p.extend_from_slice(&[1; 32]);
    p.extend_from_slice(&[2; 32]);
    le(&mut p, 1_000_000);
    le(&mut p, 150_000);
    p.extend_from_slice(&(-3i32).to_le_bytes());
    le(&mut p, 250_000_000);
    le(&mut p, 4);
    p.extend_from_slice(b"best");
    p.extend_from_slice(&[1, 0, 0]);
    let route = br#"[{"amm":"Whirlpool","percent":100}]"#;
    le(&mut p, route.len() as u64);
    p.extend_from_slice(route);
    p
}

fn bench_fixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_layout");
    let fees: Vec<u8> = (0..119u8).collect();
    let hash: Vec<u8> = (0..65u8).map(|b| b.wrapping_mul(37)).collect();

    group.throughput(Throughput::Bytes(fees.len() as u64));
    group.bench_function("priority_fees", |b| {
        b.iter(|| decode_priority_fees(black_box(&fees)))
    });
    group.throughput(Throughput::Bytes(hash.len() as u64));
    group.bench_function("blockhash", |b| b.iter(|| decode_blockhash(black_box(&hash))));
    group.finish();
}

fn bench_variable(c: &mut Criterion) {
    let mut group = c.benchmark_group("variable_layout");

    for mints in [2usize, 8] {
        let payload = pool_update(mints);
        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_function(format!("pool_update_{mints}_mints"), |b| {
            b.iter(|| decode_pool_update(black_box(&payload)))
        });
    }

    let payload = quote();
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("quote", |b| b.iter(|| decode_quote(black_box(&payload))));
    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let element = pool_update(2);
    let mut payload = Vec::new();
    payload.extend_from_slice(&100u16.to_le_bytes());
    for _ in 0..100 {
        payload.extend_from_slice(&(element.len() as u32).to_le_bytes());
        payload.extend_from_slice(&element);
    }

    let mut frame = vec![0x0E];
    frame.extend_from_slice(&payload);

    let mut group = c.benchmark_group("batch");
    group.throughput(Throughput::Bytes(payload.len() as u64));
    group.bench_function("pool_update_batch_100", |b| {
        b.iter(|| decode_pool_update_batch(black_box(&payload)))
    });
    group.bench_function("decode_message_batch_100", |b| {
        b.iter_batched(
            || frame.clone(),
            |f| decode_message(&f),
            BatchSize::SmallInput,
        )
    });

    let mut prices = Vec::new();
    prices.extend_from_slice(&500u16.to_le_bytes());
    for i in 0..500u64 {
        prices.extend_from_slice(&[i as u8; 32]);
        le(&mut prices, 150_000_000_000_000 + i);
        le(&mut prices, 250_000_000 + i);
        le(&mut prices, 1_700_000_000_000);
    }
    group.throughput(Throughput::Bytes(prices.len() as u64));
    group.bench_function("price_entries_500", |b| {
        b.iter(|| decode_price_entries(black_box(&prices)))
    });
    group.finish();
}

criterion_group!(benches, bench_fixed, bench_variable, bench_batch);
criterion_main!(benches);
