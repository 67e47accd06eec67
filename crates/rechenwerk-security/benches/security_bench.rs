// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for encryption, archiving and integrity hashing in the
// rechenwerk-security crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use rechenwerk_security::archive::{pack, unpack};
use rechenwerk_security::{EncryptedStorage, SymmetricKey, hash_bytes};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// AES-256-GCM encrypt-then-decrypt round trip on a 10 KiB payload.
fn bench_encrypt_decrypt_roundtrip(c: &mut Criterion) {
    let storage = EncryptedStorage::new(SymmetricKey::generate().expect("generate key"));
    let plaintext = vec![0x42u8; 10 * 1024]; // 10 KiB

    c.bench_function("encrypt_decrypt_roundtrip (10 KiB)", |b| {
        b.iter(|| {
            let ciphertext = storage
                .encrypt(black_box(&plaintext))
                .expect("encrypt failed");
            let decrypted = storage.decrypt(&ciphertext).expect("decrypt failed");
            assert_eq!(decrypted.len(), plaintext.len());
            black_box(decrypted);
        });
    });
}

/// Single-entry deflate archive of a repetitive text document.
fn bench_archive_roundtrip(c: &mut Criterion) {
    let document = b"Result: 3 + 4 and 10 / 2 end\n".repeat(2048);

    c.bench_function("archive_roundtrip (~58 KiB text)", |b| {
        b.iter(|| {
            let archive = pack("document.txt", black_box(&document)).expect("pack failed");
            let members = unpack(&archive).expect("unpack failed");
            black_box(members);
        });
    });
}

/// SHA-256 integrity hashing at various document sizes.
fn bench_integrity_hash(c: &mut Criterion) {
    let sizes: &[(&str, usize)] = &[
        ("1 KiB", 1024),
        ("10 KiB", 10 * 1024),
        ("100 KiB", 100 * 1024),
        ("1 MiB", 1024 * 1024),
    ];

    let mut group = c.benchmark_group("integrity_hash_sha256");
    for &(label, size) in sizes {
        let data = vec![0xABu8; size];
        group.bench_function(label, |b| {
            b.iter(|| {
                let hex = hash_bytes(black_box(&data));
                black_box(hex);
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_encrypt_decrypt_roundtrip,
    bench_archive_roundtrip,
    bench_integrity_hash,
);
criterion_main!(benches);
