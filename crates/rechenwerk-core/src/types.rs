// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Rechenwerk pipeline.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RechenError, Result};

/// Suffix appended to ciphertext files.
pub const ENCRYPTED_SUFFIX: &str = ".encrypted";
/// Suffix of the side-car file holding raw key bytes.
pub const KEY_SUFFIX: &str = ".key";
/// Suffix appended to archives.
pub const ARCHIVE_SUFFIX: &str = ".zip";
/// Default suffix for decrypt output when no path is chosen.
pub const DECRYPTED_SUFFIX: &str = ".decrypted";
/// Default suffix for the directory archives are extracted into.
pub const EXTRACTED_SUFFIX: &str = ".extracted";

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatTag {
    Text,
    Html,
    Json,
    Yaml,
    Xml,
    Protobuf,
}

impl FormatTag {
    /// Every format the codec registry can handle.
    pub const ALL: [FormatTag; 6] = [
        Self::Text,
        Self::Html,
        Self::Json,
        Self::Yaml,
        Self::Xml,
        Self::Protobuf,
    ];

    /// Lowercase identifier used in plans and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Protobuf => "protobuf",
        }
    }

    /// Infer format from a file extension (without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "xml" => Some(Self::Xml),
            "html" | "htm" => Some(Self::Html),
            "txt" => Some(Self::Text),
            "pb" => Some(Self::Protobuf),
            _ => None,
        }
    }

    /// Infer format from the final extension of `path`.
    pub fn infer(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            RechenError::UnsupportedFormat(format!("{} has no extension", path.display()))
        })?;
        Self::from_extension(ext).ok_or_else(|| {
            RechenError::UnsupportedFormat(format!(
                "unrecognised extension .{ext} on {}",
                path.display()
            ))
        })
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FormatTag {
    type Err = RechenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RechenError::UnsupportedFormat(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Protective transforms
// ---------------------------------------------------------------------------

/// A protective transform the user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformStep {
    Encrypt,
    Archive,
}

impl TransformStep {
    /// File-name marker this transform leaves behind.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Encrypt => ENCRYPTED_SUFFIX,
            Self::Archive => ARCHIVE_SUFFIX,
        }
    }
}

/// A transform that has been applied to a concrete file, with the auxiliary
/// data its inverse needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransformKind {
    Encrypt { key_file: PathBuf },
    Archive { member_name: String },
}

impl TransformKind {
    pub fn step(&self) -> TransformStep {
        match self {
            Self::Encrypt { .. } => TransformStep::Encrypt,
            Self::Archive { .. } => TransformStep::Archive,
        }
    }
}

/// Named states of the protective-transform state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainState {
    Bare,
    Encrypted,
    Archived,
    EncryptedThenArchived,
    ArchivedThenEncrypted,
    /// Repeated or longer chains (e.g. `.zip.zip`).
    Layered { depth: usize },
}

/// Ordered record of the transforms applied to a base file.
///
/// On disk the chain exists only as trailing suffixes on the file name;
/// this type is the in-memory form, serialised back to a path at the
/// boundary by [`TransformChain::current_path`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformChain {
    base: PathBuf,
    applied: Vec<TransformKind>,
}

impl TransformChain {
    /// A chain with nothing applied yet.
    pub fn bare(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            applied: Vec::new(),
        }
    }

    /// Recover the chain from the trailing markers of `path`.
    ///
    /// Suffixes are peeled right to left; the result lists transforms in the
    /// order they were applied.
    pub fn parse(path: &Path) -> Self {
        let mut peeled = Vec::new();
        let mut current = path.to_path_buf();
        loop {
            if let Some(inner) = strip_suffix(&current, ENCRYPTED_SUFFIX) {
                peeled.push(TransformStep::Encrypt);
                current = inner;
            } else if let Some(inner) = strip_suffix(&current, ARCHIVE_SUFFIX) {
                peeled.push(TransformStep::Archive);
                current = inner;
            } else {
                break;
            }
        }

        let mut chain = Self::bare(current);
        for step in peeled.into_iter().rev() {
            chain.push(step);
        }
        chain
    }

    /// Record `step` as applied to the current path and return the new path.
    pub fn push(&mut self, step: TransformStep) -> PathBuf {
        let inner = self.current_path();
        let kind = match step {
            TransformStep::Encrypt => TransformKind::Encrypt {
                key_file: key_path_for(&inner),
            },
            TransformStep::Archive => TransformKind::Archive {
                member_name: file_name_lossy(&inner),
            },
        };
        self.applied.push(kind);
        self.current_path()
    }

    /// Remove the most recently applied transform, returning it.
    pub fn pop(&mut self) -> Option<TransformKind> {
        self.applied.pop()
    }

    /// The unprotected file the chain started from.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Transforms in application order.
    pub fn applied(&self) -> &[TransformKind] {
        &self.applied
    }

    pub fn is_bare(&self) -> bool {
        self.applied.is_empty()
    }

    /// Path of the outermost file: the base plus every suffix.
    pub fn current_path(&self) -> PathBuf {
        self.applied.iter().fold(self.base.clone(), |path, kind| {
            append_suffix(&path, kind.step().suffix())
        })
    }

    pub fn state(&self) -> ChainState {
        let steps: Vec<TransformStep> = self.applied.iter().map(TransformKind::step).collect();
        match steps.as_slice() {
            [] => ChainState::Bare,
            [TransformStep::Encrypt] => ChainState::Encrypted,
            [TransformStep::Archive] => ChainState::Archived,
            [TransformStep::Encrypt, TransformStep::Archive] => ChainState::EncryptedThenArchived,
            [TransformStep::Archive, TransformStep::Encrypt] => ChainState::ArchivedThenEncrypted,
            other => ChainState::Layered { depth: other.len() },
        }
    }
}

// ---------------------------------------------------------------------------
// Suffix helpers
// ---------------------------------------------------------------------------

/// Append a literal suffix to the file name (`a.txt` + `.zip` → `a.txt.zip`).
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// Strip a literal suffix from the file name, if present and not the whole name.
pub fn strip_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(suffix)?;
    if stem.is_empty() {
        return None;
    }
    Some(path.with_file_name(stem))
}

/// Key file for a plaintext path: `path + ".key"`.
pub fn key_path_for(plain: &Path) -> PathBuf {
    append_suffix(plain, KEY_SUFFIX)
}

fn file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Plans and outcomes
// ---------------------------------------------------------------------------

/// Whether a run wraps a document or unwraps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

/// Everything the user chose, handed to the engine as a single value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingPlan {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Inferred from `input` when absent.
    #[serde(default)]
    pub input_format: Option<FormatTag>,
    /// Inferred from `output` when absent.
    #[serde(default)]
    pub output_format: Option<FormatTag>,
    /// Applied to the source document before processing.
    #[serde(default)]
    pub pre: Vec<TransformStep>,
    /// Applied to the processed output.
    #[serde(default)]
    pub post: Vec<TransformStep>,
    #[serde(default)]
    pub direction: Direction,
}

impl ProcessingPlan {
    /// Forward plan with formats inferred and no protective transforms.
    pub fn forward(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            input_format: None,
            output_format: None,
            pre: Vec::new(),
            post: Vec::new(),
            direction: Direction::Forward,
        }
    }

    /// Reverse plan: unwrap `input` and process the result into `output`.
    pub fn reverse(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            direction: Direction::Reverse,
            ..Self::forward(input, output)
        }
    }

    pub fn with_input_format(mut self, format: FormatTag) -> Self {
        self.input_format = Some(format);
        self
    }

    pub fn with_output_format(mut self, format: FormatTag) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn with_pre(mut self, steps: impl IntoIterator<Item = TransformStep>) -> Self {
        self.pre = steps.into_iter().collect();
        self
    }

    pub fn with_post(mut self, steps: impl IntoIterator<Item = TransformStep>) -> Self {
        self.post = steps.into_iter().collect();
        self
    }

    /// Explicit formats, falling back to suffix inference.
    pub fn resolve_formats(&self) -> Result<(FormatTag, FormatTag)> {
        let input = match self.input_format {
            Some(tag) => tag,
            None => FormatTag::infer(&self.input)?,
        };
        let output = match self.output_format {
            Some(tag) => tag,
            None => FormatTag::infer(&self.output)?,
        };
        Ok((input, output))
    }
}

/// Role of a file published by a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactRole {
    /// Rewritten document.
    Output,
    /// Protected copy of the source document.
    ProtectedSource,
    /// Protected copy of the rewritten document.
    ProtectedOutput,
    /// Side-car key material.
    KeyFile,
}

/// A file written by a run, with its SHA-256 fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub path: PathBuf,
    pub role: ArtifactRole,
    pub sha256: String,
}

/// Summary handed to the reporting collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub artifacts: Vec<Artifact>,
}

impl RunOutcome {
    /// Paths of the rewritten documents.
    pub fn outputs(&self) -> Vec<&Path> {
        self.artifacts
            .iter()
            .filter(|a| a.role == ArtifactRole::Output)
            .map(|a| a.path.as_path())
            .collect()
    }
}
