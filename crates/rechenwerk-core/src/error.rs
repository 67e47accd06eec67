// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Rechenwerk.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Top-level error type for all Rechenwerk operations.
#[derive(Debug, Error)]
pub enum RechenError {
    // -- Codec errors --
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed {format} payload: {message}")]
    Codec { format: String, message: String },

    // -- Rewriting --
    #[error("cannot evaluate `{expression}`: {reason}")]
    Expression { expression: String, reason: String },

    // -- Protective transforms --
    #[error("key file not found: {}", .0.display())]
    MissingKey(PathBuf),

    #[error("no protective transform matches {0}")]
    InvalidChain(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Storage / persistence --
    #[error("file I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    // -- Bridge --
    #[error("bridge error: {0}")]
    Bridge(String),
}

impl RechenError {
    /// Build a `Codec` error for `format` from any displayable parser error.
    pub fn codec(format: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Codec {
            format: format.into(),
            message: message.to_string(),
        }
    }

    /// Build an `Expression` error for the offending expression text.
    pub fn expression(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Expression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Returns a closure mapping an `io::Error` on `path` into `RechenError::Io`.
    pub fn io_at(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RechenError>;
