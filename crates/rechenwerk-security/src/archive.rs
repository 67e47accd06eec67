// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Zip archives built and read entirely in memory.

use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use rechenwerk_core::error::{RechenError, Result};
use tracing::{debug, instrument, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

fn zip_err(e: impl std::fmt::Display) -> RechenError {
    RechenError::codec("zip", e)
}

/// A regular file read out of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Relative path, guaranteed not to escape the extraction directory.
    pub name: PathBuf,
    pub bytes: Vec<u8>,
}

/// Build a deflate-compressed archive holding `bytes` under `member_name`.
#[instrument(skip(bytes), fields(len = bytes.len()))]
pub fn pack(member_name: &str, bytes: &[u8]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    writer.start_file(member_name, options).map_err(zip_err)?;
    writer.write_all(bytes).map_err(zip_err)?;
    let archive = writer.finish().map_err(zip_err)?.into_inner();

    debug!(archive_len = archive.len(), "archive built");
    Ok(archive)
}

/// Read every regular file out of `archive`.
///
/// Directory entries are skipped. A member whose name is absolute or
/// climbs out with `..` rejects the whole archive.
#[instrument(skip_all, fields(len = archive.len()))]
pub fn unpack(archive: &[u8]) -> Result<Vec<ArchiveMember>> {
    let mut zip = ZipArchive::new(Cursor::new(archive)).map_err(zip_err)?;
    let mut members = Vec::with_capacity(zip.len());

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(zip_err)?;
        if entry.is_dir() {
            warn!(name = entry.name(), "skipping directory entry");
            continue;
        }
        let Some(name) = entry.enclosed_name() else {
            return Err(zip_err(format!(
                "member `{}` would escape the extraction directory",
                entry.name()
            )));
        };

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(zip_err)?;
        members.push(ArchiveMember { name, bytes });
    }

    debug!(members = members.len(), "archive read");
    Ok(members)
}
