// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the reporting collaborator.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the UI presents it.

use crate::error::RechenError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// File system hiccup; trying again may work.
    Transient,
    /// User must do something (pick another file, restore a key).
    ActionRequired,
    /// The input itself is wrong and retrying will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether retrying the same run could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `RechenError` into a `HumanError`.
pub fn humanize_error(err: &RechenError) -> HumanError {
    match err {
        RechenError::UnsupportedFormat(detail) => HumanError {
            message: "This file type isn't supported.".into(),
            suggestion: format!(
                "Use a .txt, .html, .json, .yaml, .xml or .pb file, or pick the format explicitly. ({detail})"
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RechenError::Codec { format, message } => HumanError {
            message: format!("The {format} content couldn't be read."),
            suggestion: format!("Check that the file really is valid {format}. ({message})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        RechenError::Expression { expression, reason } => HumanError {
            message: format!("The calculation \"{expression}\" can't be worked out."),
            suggestion: format!("Fix that calculation in the document and run again. ({reason})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RechenError::MissingKey(path) => HumanError {
            message: "The key for this encrypted file is missing.".into(),
            suggestion: format!(
                "Put the key file back at {} and try again. Without it the file can't be opened.",
                path.display()
            ),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RechenError::InvalidChain(detail) => HumanError {
            message: "This file isn't encrypted or archived.".into(),
            suggestion: format!(
                "Only files ending in .encrypted or .zip can be unwrapped. Was the file renamed? ({detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        RechenError::Encryption(_) => HumanError {
            message: "The file couldn't be encrypted.".into(),
            suggestion: "Try again. If it keeps failing, check the system's random number source.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        RechenError::Decryption(_) => HumanError {
            message: "The encrypted file doesn't match its key.".into(),
            suggestion: "The file or its key may have been changed or swapped. Use the key created together with this file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        RechenError::IntegrityMismatch { expected, actual } => HumanError {
            message: "A file has changed since it was written.".into(),
            suggestion: format!(
                "Run again to regenerate it. (expected fingerprint {expected}, found {actual})"
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        RechenError::Io { path, source } => HumanError {
            message: "A file couldn't be read or written.".into(),
            suggestion: format!(
                "Check that {} exists and that you're allowed to use it. ({source})",
                path.display()
            ),
            retriable: true,
            severity: Severity::Transient,
        },

        RechenError::Config(detail) => HumanError {
            message: "The settings file has a problem.".into(),
            suggestion: format!("Fix or delete the settings file to use the defaults. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        RechenError::Bridge(detail) => HumanError {
            message: "Your choices couldn't be collected.".into(),
            suggestion: format!("Check the plan you provided and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn missing_key_is_action_required() {
        let human = humanize_error(&RechenError::MissingKey(PathBuf::from("a.txt.key")));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.suggestion.contains("a.txt.key"));
    }

    #[test]
    fn io_is_transient() {
        let err = RechenError::Io {
            path: PathBuf::from("in.txt"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn expression_names_the_calculation() {
        let human = humanize_error(&RechenError::expression("5 / 0", "division by zero"));
        assert!(human.message.contains("5 / 0"));
        assert_eq!(human.severity, Severity::ActionRequired);
    }

    #[test]
    fn codec_is_permanent() {
        let human = humanize_error(&RechenError::codec("json", "expected value at line 1"));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(human.message.contains("json"));
    }
}
