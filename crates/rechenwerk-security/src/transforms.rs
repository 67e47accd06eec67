// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File-level protective transforms.
//
// Each primitive reads one file and publishes its result beside it, named by
// appending or stripping a single suffix. Intermediates are kept; nothing
// here ever recurses into nested suffixes.

use std::path::{Path, PathBuf};

use rechenwerk_core::error::{RechenError, Result};
use rechenwerk_core::{
    ARCHIVE_SUFFIX, DECRYPTED_SUFFIX, ENCRYPTED_SUFFIX, EXTRACTED_SUFFIX, TransformStep,
    append_suffix, fs, key_path_for, strip_suffix,
};
use tracing::{info, instrument, warn};

use crate::archive::{pack, unpack};
use crate::storage::{EncryptedStorage, SymmetricKey};

fn require_suffix(path: &Path, suffix: &str) -> Result<PathBuf> {
    strip_suffix(path, suffix).ok_or_else(|| {
        RechenError::InvalidChain(format!("{} does not end in `{suffix}`", path.display()))
    })
}

fn base_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| RechenError::InvalidChain(format!("{} has no file name", path.display())))
}

/// Apply one protective transform, returning the path it produced.
pub fn apply(path: &Path, step: TransformStep) -> Result<PathBuf> {
    match step {
        TransformStep::Encrypt => encrypt(path),
        TransformStep::Archive => archive(path),
    }
}

/// Encrypt `path` into `path.encrypted` under a fresh key saved as `path.key`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn encrypt(path: &Path) -> Result<PathBuf> {
    let plaintext = fs::read(path)?;
    let key = SymmetricKey::generate()?;
    let ciphertext = EncryptedStorage::new(key.clone()).encrypt(&plaintext)?;

    let key_path = key_path_for(path);
    fs::publish(&key_path, key.as_bytes())?;

    let encrypted = append_suffix(path, ENCRYPTED_SUFFIX);
    if let Err(e) = fs::publish(&encrypted, &ciphertext) {
        if let Err(cleanup) = std::fs::remove_file(&key_path) {
            warn!(key = %key_path.display(), error = %cleanup, "could not remove orphaned key");
        }
        return Err(e);
    }

    info!(output = %encrypted.display(), key = %key_path.display(), "encrypted");
    Ok(encrypted)
}

/// Wrap `path` in a single-entry archive at `path.zip`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn archive(path: &Path) -> Result<PathBuf> {
    let member = base_name(path)?;
    let bytes = pack(&member, &fs::read(path)?)?;

    let archived = append_suffix(path, ARCHIVE_SUFFIX);
    fs::publish(&archived, &bytes)?;

    info!(output = %archived.display(), %member, "archived");
    Ok(archived)
}

pub fn encrypt_then_archive(path: &Path) -> Result<PathBuf> {
    archive(&encrypt(path)?)
}

pub fn archive_then_encrypt(path: &Path) -> Result<PathBuf> {
    encrypt(&archive(path)?)
}

/// Decrypt `path` using the key beside its stripped name.
///
/// Output defaults to the stripped name with `.decrypted` appended.
pub fn decrypt(path: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let plain = require_suffix(path, ENCRYPTED_SUFFIX)?;
    decrypt_with_key(path, &key_path_for(&plain), output)
}

/// Decrypt `path` using an explicit key file.
#[instrument(skip_all, fields(path = %path.display(), key = %key_path.display()))]
pub fn decrypt_with_key(path: &Path, key_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let plain = require_suffix(path, ENCRYPTED_SUFFIX)?;
    if !key_path.is_file() {
        return Err(RechenError::MissingKey(key_path.to_path_buf()));
    }

    let key = SymmetricKey::from_bytes(&fs::read(key_path)?)?;
    let plaintext = EncryptedStorage::new(key).decrypt(&fs::read(path)?)?;

    let target = output.map_or_else(|| append_suffix(&plain, DECRYPTED_SUFFIX), Path::to_path_buf);
    fs::publish(&target, &plaintext)?;

    info!(output = %target.display(), "decrypted");
    Ok(target)
}

/// Extract every file member of `path` into `dest_dir`.
///
/// `dest_dir` defaults to the stripped name with `.extracted` appended and is
/// created if missing. Returns the extracted paths in archive order.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn extract(path: &Path, dest_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let plain = require_suffix(path, ARCHIVE_SUFFIX)?;
    let dest = dest_dir.map_or_else(|| append_suffix(&plain, EXTRACTED_SUFFIX), Path::to_path_buf);

    let members = unpack(&fs::read(path)?)?;
    let mut extracted = Vec::with_capacity(members.len());
    for member in members {
        let target = dest.join(&member.name);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(RechenError::io_at(parent))?;
        }
        fs::publish(&target, &member.bytes)?;
        extracted.push(target);
    }

    info!(dest = %dest.display(), members = extracted.len(), "extracted");
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).expect("write fixture");
        path
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write(dir.path(), "report.txt", b"Result: 3 + 4");

        let encrypted = encrypt(&source).unwrap();
        assert_eq!(encrypted, dir.path().join("report.txt.encrypted"));
        assert_eq!(std::fs::read(dir.path().join("report.txt.key")).unwrap().len(), 32);
        assert_ne!(std::fs::read(&encrypted).unwrap(), b"Result: 3 + 4");

        let decrypted = decrypt(&encrypted, None).unwrap();
        assert_eq!(decrypted, dir.path().join("report.txt.decrypted"));
        assert_eq!(std::fs::read(&decrypted).unwrap(), b"Result: 3 + 4");
    }

    #[test]
    fn decrypt_honours_explicit_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write(dir.path(), "a.json", b"{}");
        let encrypted = encrypt(&source).unwrap();

        let chosen = dir.path().join("restored.json");
        assert_eq!(decrypt(&encrypted, Some(&chosen)).unwrap(), chosen);
        assert_eq!(std::fs::read(&chosen).unwrap(), b"{}");
    }

    #[test]
    fn decrypt_requires_suffix_and_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let plain = write(dir.path(), "a.txt", b"x");
        assert!(matches!(decrypt(&plain, None), Err(RechenError::InvalidChain(_))));

        let encrypted = encrypt(&plain).unwrap();
        std::fs::remove_file(dir.path().join("a.txt.key")).unwrap();
        match decrypt(&encrypted, None) {
            Err(RechenError::MissingKey(path)) => assert_eq!(path, dir.path().join("a.txt.key")),
            other => panic!("expected MissingKey, got {other:?}"),
        }
        assert!(!dir.path().join("a.txt.decrypted").exists());
    }

    #[test]
    fn decrypt_with_another_files_key_fails_without_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = encrypt(&write(dir.path(), "a.txt", b"alpha")).unwrap();
        encrypt(&write(dir.path(), "b.txt", b"beta")).unwrap();

        let result = decrypt_with_key(&a, &dir.path().join("b.txt.key"), None);
        assert!(matches!(result, Err(RechenError::Decryption(_))));
        assert!(!dir.path().join("a.txt.decrypted").exists());
    }

    #[test]
    fn extract_inverts_archive() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write(dir.path(), "page.html", b"<p>6 * 7</p>");

        let archived = archive(&source).unwrap();
        assert_eq!(archived, dir.path().join("page.html.zip"));

        let members = extract(&archived, None).unwrap();
        assert_eq!(members, vec![dir.path().join("page.html.extracted").join("page.html")]);
        assert_eq!(std::fs::read(&members[0]).unwrap(), b"<p>6 * 7</p>");
    }

    #[test]
    fn extract_requires_zip_suffix() {
        let dir = tempfile::tempdir().expect("tempdir");
        let plain = write(dir.path(), "a.txt", b"x");
        assert!(matches!(extract(&plain, None), Err(RechenError::InvalidChain(_))));
    }

    #[test]
    fn encrypt_then_archive_is_undone_by_extract_then_decrypt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write(dir.path(), "data.yaml", b"total: 8 / 4\n");

        let outer = encrypt_then_archive(&source).unwrap();
        assert_eq!(outer, dir.path().join("data.yaml.encrypted.zip"));
        assert!(dir.path().join("data.yaml.encrypted").exists());

        let scratch = dir.path().join("scratch");
        let members = extract(&outer, Some(&scratch)).unwrap();
        assert_eq!(members, vec![scratch.join("data.yaml.encrypted")]);

        let restored = decrypt_with_key(
            &members[0],
            &dir.path().join("data.yaml.key"),
            Some(&dir.path().join("restored.yaml")),
        )
        .unwrap();
        assert_eq!(std::fs::read(restored).unwrap(), b"total: 8 / 4\n");
    }

    #[test]
    fn archive_then_encrypt_is_undone_by_decrypt_then_extract() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write(dir.path(), "notes.txt", b"10 / 4");

        let outer = archive_then_encrypt(&source).unwrap();
        assert_eq!(outer, dir.path().join("notes.txt.zip.encrypted"));
        assert!(dir.path().join("notes.txt.zip.key").exists());

        let zip = decrypt(&outer, Some(&dir.path().join("notes.txt.zip"))).unwrap();
        let members = extract(&zip, None).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].file_name().unwrap(), "notes.txt");
        assert_eq!(std::fs::read(&members[0]).unwrap(), b"10 / 4");
    }

    #[test]
    fn apply_dispatches_on_step() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = write(dir.path(), "a.txt", b"x");
        assert_eq!(
            apply(&source, TransformStep::Archive).unwrap(),
            dir.path().join("a.txt.zip")
        );
        assert_eq!(
            apply(&source, TransformStep::Encrypt).unwrap(),
            dir.path().join("a.txt.encrypted")
        );
    }
}
