// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decoded in-memory document.

use rechenwerk_core::error::{RechenError, Result};

use crate::markup::MarkupTree;

/// What a codec decodes into and encodes from.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// Unstructured text.
    PlainText(String),
    /// Markup whose text leaves are rewritten in place.
    StructuredNodes(MarkupTree),
    /// Items of the xml calculation schema: expressions before processing,
    /// results after.
    RecordList(Vec<String>),
    /// Native json value.
    Data(serde_json::Value),
    /// Native yaml value. Kept apart from json so that non-string keys,
    /// tags, `.inf` and `.nan` survive a yaml to yaml run.
    YamlData(serde_yaml::Value),
}

impl Document {
    /// Render as a single string for formats without a native structure.
    ///
    /// Markup is re-serialised, records are newline-joined, and structured
    /// values become pretty JSON (a bare string value renders as itself).
    pub fn to_text(&self) -> Result<String> {
        match self {
            Self::PlainText(text) => Ok(text.clone()),
            Self::StructuredNodes(tree) => Ok(tree.to_markup()),
            Self::RecordList(items) => Ok(items.join("\n")),
            Self::Data(serde_json::Value::String(text)) => Ok(text.clone()),
            Self::Data(value) => {
                serde_json::to_string_pretty(value).map_err(|e| RechenError::codec("json", e))
            }
            Self::YamlData(serde_yaml::Value::String(text)) => Ok(text.clone()),
            Self::YamlData(value) => {
                serde_json::to_string_pretty(value).map_err(|e| RechenError::codec("json", e))
            }
        }
    }

    /// Short variant name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlainText(_) => "plain_text",
            Self::StructuredNodes(_) => "structured_nodes",
            Self::RecordList(_) => "record_list",
            Self::Data(_) => "data",
            Self::YamlData(_) => "yaml_data",
        }
    }
}
