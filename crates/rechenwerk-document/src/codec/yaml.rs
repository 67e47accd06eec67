// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Yaml codec. Values stay in the yaml data model until an output format
// needs something else.

use rechenwerk_core::error::{RechenError, Result};
use rechenwerk_core::FormatTag;

use super::Codec;
use super::json::to_value;
use crate::document::Document;

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn format(&self) -> FormatTag {
        FormatTag::Yaml
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        serde_yaml::from_slice::<serde_yaml::Value>(bytes)
            .map(Document::YamlData)
            .map_err(|e| RechenError::codec("yaml", e))
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let encoded = match document {
            Document::YamlData(value) => serde_yaml::to_string(value),
            other => serde_yaml::to_string(&to_value(other)?),
        };
        encoded
            .map(String::into_bytes)
            .map_err(|e| RechenError::codec("yaml", e))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn yaml(source: &str) -> serde_yaml::Value {
        serde_yaml::from_str(source).expect("valid yaml")
    }

    #[test]
    fn decodes_into_the_yaml_data_model() {
        let doc = YamlCodec
            .decode(b"total: 3 + 4\nitems:\n  - 1\n  - two\n")
            .unwrap();
        assert_eq!(doc, Document::YamlData(yaml("total: 3 + 4\nitems: [1, two]")));
    }

    #[test]
    fn special_floats_and_integer_keys_survive() {
        let doc = YamlCodec.decode(b"1: x\nlimit: .inf\nfloor: -.inf\n").unwrap();
        let text = String::from_utf8(YamlCodec.encode(&doc).unwrap()).unwrap();
        assert_eq!(text, "1: x\nlimit: .inf\nfloor: -.inf\n");
    }

    #[test]
    fn json_values_encode_as_yaml() {
        let doc = Document::Data(json!({"a": "7", "b": 7}));
        let bytes = YamlCodec.encode(&doc).unwrap();
        assert!(String::from_utf8_lossy(&bytes).starts_with("a: "));
        assert_eq!(YamlCodec.decode(&bytes).unwrap(), Document::YamlData(yaml("a: '7'\nb: 7")));
    }
}
