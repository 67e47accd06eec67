// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// File access helpers. Outputs are staged in a temporary file beside the
// destination and renamed into place, so a failed run never leaves a
// half-written file behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RechenError, Result};

/// Read a whole file, attaching the path to any I/O error.
pub fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(RechenError::io_at(path))
}

/// Atomically create or replace `path` with `bytes`.
pub fn publish(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(dir).map_err(RechenError::io_at(dir))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(RechenError::io_at(staged.path()))?;
    staged
        .persist(path)
        .map_err(|e| RechenError::io_at(path)(e.error))?;

    debug!(path = %path.display(), len = bytes.len(), "published");
    Ok(())
}
