// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RechenError, Result};

/// Order in which xml element text is concatenated when flattening a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XmlTextOrder {
    /// A node's own text, then each child's full text.
    #[default]
    SelfFirst,
    /// Each child's full text, then the node's own text.
    ChildrenFirst,
}

/// Settings shared by the codecs and the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Flattening order for non-calculation xml input.
    pub xml_text_order: XmlTextOrder,
    /// Pretty-print json output.
    pub pretty_output: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            xml_text_order: XmlTextOrder::SelfFirst,
            pretty_output: true,
        }
    }
}

impl EngineConfig {
    /// Load settings from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(RechenError::io_at(path)(e)),
        };
        serde_json::from_str(&data)
            .map_err(|e| RechenError::Config(format!("{}: {e}", path.display())))
    }
}
