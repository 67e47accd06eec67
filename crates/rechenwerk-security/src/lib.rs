// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rechenwerk-security — Reversible protective transforms for Rechenwerk.
//
// In-memory primitives (AES-256-GCM storage, single-entry zip archives,
// SHA-256 fingerprints) and the file-level transforms built on them. The
// transforms never recurse; callers drive multi-step unwrapping.

pub mod archive;
pub mod integrity;
pub mod storage;
pub mod transforms;

pub use archive::ArchiveMember;
pub use integrity::{hash_bytes, hash_file, verify_hash};
pub use storage::{EncryptedStorage, SymmetricKey};
pub use transforms::{
    apply, archive_then_encrypt, decrypt, decrypt_with_key, encrypt, encrypt_then_archive, extract,
};
