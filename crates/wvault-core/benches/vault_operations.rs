//! Benchmarks for vault listing and passkey authentication.
//!
//! Listing scans the vault directory on every call, so its cost grows with
//! the number of stored files. Authentication cost is dominated by scrypt for
//! hashed records and is near zero for plaintext ones.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tempfile::TempDir;
use wvault_core::crypto::HashParams;
use wvault_core::vault::{AccessControl, CredentialStorage, MasterKey, VaultSettings};

const MASTER_KEY: &str = "bench-master-key";

fn setup(storage: CredentialStorage, hash_params: HashParams) -> (TempDir, AccessControl) {
    let temp_dir = TempDir::new().unwrap();
    let settings = VaultSettings::new(temp_dir.path(), MasterKey::new(MASTER_KEY))
        .with_credential_storage(storage)
        .with_hash_params(hash_params);
    let access = AccessControl::from_settings(settings).unwrap();
    (temp_dir, access)
}

fn bench_list_files(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_files");

    for count in [10usize, 100, 1000] {
        let (_temp_dir, access) = setup(CredentialStorage::Plaintext, HashParams::default());
        let session = access.create_vault("choir", "abc123").unwrap();
        for i in 0..count {
            session.save_file(&format!("photo_{i:04}.png"), b"x").unwrap();
        }

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(session.list_files().unwrap()));
        });
    }

    group.finish();
}

fn bench_authenticate(c: &mut Criterion) {
    let mut group = c.benchmark_group("authenticate");
    group.sample_size(20);

    let cases = [
        ("plaintext", CredentialStorage::Plaintext, HashParams::default()),
        ("scrypt_ln10", CredentialStorage::Hashed, HashParams::new(10, 8, 1)),
        ("scrypt_ln15", CredentialStorage::Hashed, HashParams::default()),
    ];

    for (label, storage, params) in cases {
        let (_temp_dir, access) = setup(storage, params);
        access.create_vault("choir", "abc123").unwrap();

        group.bench_function(BenchmarkId::new("admin", label), |b| {
            b.iter(|| black_box(access.authenticate("choir", black_box("abc123")).unwrap()));
        });
        group.bench_function(BenchmarkId::new("rejected", label), |b| {
            b.iter(|| black_box(access.authenticate("choir", black_box("wrong")).is_err()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_list_files, bench_authenticate);
criterion_main!(benches);
