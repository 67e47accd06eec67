// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Json codec.

use rechenwerk_core::error::{RechenError, Result};
use rechenwerk_core::FormatTag;
use serde_json::Value;

use super::Codec;
use crate::document::Document;

#[derive(Debug, Clone, Copy)]
pub struct JsonCodec {
    pub pretty: bool,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// The json view of any document.
///
/// Yaml values go through serde: integer keys become strings and `.inf`
/// or `.nan` become `null`, as json has no other spelling for them.
pub(crate) fn to_value(document: &Document) -> Result<Value> {
    Ok(match document {
        Document::Data(value) => value.clone(),
        Document::YamlData(value) => {
            serde_json::to_value(value).map_err(|e| RechenError::codec("json", e))?
        }
        Document::PlainText(text) => Value::String(text.clone()),
        Document::StructuredNodes(tree) => Value::String(tree.to_markup()),
        Document::RecordList(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
    })
}

impl Codec for JsonCodec {
    fn format(&self) -> FormatTag {
        FormatTag::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        serde_json::from_slice(bytes)
            .map(Document::Data)
            .map_err(|e| RechenError::codec("json", e))
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let value = to_value(document)?;
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(&value)
        } else {
            serde_json::to_vec(&value)
        };
        encoded.map_err(|e| RechenError::codec("json", e))
    }
}
