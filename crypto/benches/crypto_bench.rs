use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn secp256k1_sign_bench(c: &mut Criterion) {
    let kp = stepstake_crypto::generate_keypair();
    let msg = "x".repeat(128);

    c.bench_function("secp256k1_sign_128B", |b| {
        b.iter(|| stepstake_crypto::sign_message(black_box(&msg), &kp.private))
    });
}

fn secp256k1_recover_bench(c: &mut Criterion) {
    let kp = stepstake_crypto::generate_keypair();
    let msg = "x".repeat(128);
    let sig = stepstake_crypto::sign_message(&msg, &kp.private).unwrap();

    c.bench_function("secp256k1_recover_128B", |b| {
        b.iter(|| stepstake_crypto::recover_signer(black_box(&msg), &sig))
    });
}

fn keccak256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("keccak256_256B", |b| {
        b.iter(|| stepstake_crypto::keccak256(black_box(&data)))
    });
}

fn message_digest_bench(c: &mut Criterion) {
    let msg = "challenge-17:day-4:steps-12000";

    c.bench_function("message_digest_short", |b| {
        b.iter(|| stepstake_crypto::message_digest(black_box(msg)))
    });
}

criterion_group!(
    benches,
    secp256k1_sign_bench,
    secp256k1_recover_bench,
    keccak256_bench,
    message_digest_bench,
);
criterion_main!(benches);
