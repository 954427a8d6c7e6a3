#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};

use packed_json::prelude::*;

const N_BIG_ARR: usize = 2000;

fn big_arr() -> Packed {
    let v: Vec<Packed> = (0..N_BIG_ARR).map(|i| Packed::from(i as i64)).collect();
    Packed::from(v)
}

const N_ARR: usize = 10;
const N_MAP: usize = 10;

fn big_p() -> Packed {
    let v0: Vec<Packed> = (0..N_ARR).map(|i| Packed::from(i as i64)).collect();
    let m: VecMap<String, Packed> = (0..N_MAP)
        .map(|i| (format!("key{}", i), Packed::from(v0.clone())))
        .collect();
    let v: Vec<Packed> = std::iter::repeat(m).map(Packed::from).take(N_ARR).collect();
    Packed::from(v)
}

fn bench_construction(c: &mut Criterion) {
    c.bench_function(
        &format!(
            "Creating a Packed value of size {}",
            encode_full(&big_p()).len()
        ),
        |b| b.iter(|| black_box(big_p())),
    );
}

fn bench_enc(c: &mut Criterion) {
    let big_p = big_p();
    let enc_len = encode_full(&big_p).len();
    c.bench_function(
        &format!("Encoding a Packed object, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_p))),
    );
}

fn bench_enc_single_alloc(c: &mut Criterion) {
    let big_p = big_p();
    let enc_len = encode_full(&big_p).len();
    c.bench_function(
        &format!(
            "Encoding a Packed object, output size of {} bytes, buffer preallocated",
            enc_len
        ),
        move |b| {
            b.iter(|| {
                let mut out = Vec::with_capacity(enc_len * 2);
                encode(black_box(&big_p), &mut out);
                out
            })
        },
    );
}

fn bench_enc_flat(c: &mut Criterion) {
    let big_arr = big_arr();
    let enc_len = encode_full(&big_arr).len();
    c.bench_function(
        &format!("Encoding a Packed vector, output size of {} bytes", enc_len),
        move |b| b.iter(|| encode_full(black_box(&big_arr))),
    );
}

fn bench_enc_native(c: &mut Criterion) {
    let v: Vec<i64> = (0..N_BIG_ARR as i64).collect();
    c.bench_function(
        &format!("Encoding a Vec<i64> of length {} directly", N_BIG_ARR),
        move |b| b.iter(|| encode_full(black_box(&v))),
    );
}

criterion_group!(
    benches,
    bench_construction,
    bench_enc,
    bench_enc_single_alloc,
    bench_enc_flat,
    bench_enc_native
);
criterion_main!(benches);
