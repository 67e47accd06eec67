// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Protobuf codec — a one-field envelope around plain text:
//
//   message ProcessedContent { string content = 1; }

use prost::Message;
use rechenwerk_core::FormatTag;
use rechenwerk_core::error::{RechenError, Result};

use super::Codec;
use crate::document::Document;

/// Wire message carrying the whole textual payload.
#[derive(Clone, PartialEq, Message)]
pub struct ProcessedContent {
    #[prost(string, tag = "1")]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufCodec;

impl Codec for ProtobufCodec {
    fn format(&self) -> FormatTag {
        FormatTag::Protobuf
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let message =
            ProcessedContent::decode(bytes).map_err(|e| RechenError::codec("protobuf", e))?;
        Ok(Document::PlainText(message.content))
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let message = ProcessedContent {
            content: document.to_text()?,
        };
        Ok(message.encode_to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_layout_is_field_one_length_delimited() {
        let bytes = ProtobufCodec
            .encode(&Document::PlainText("7".into()))
            .unwrap();
        assert_eq!(bytes, [0x0a, 0x01, b'7']);
    }

    #[test]
    fn empty_message_is_empty_text() {
        assert_eq!(
            ProtobufCodec.decode(&[]).unwrap(),
            Document::PlainText(String::new())
        );
    }

    #[test]
    fn invalid_utf8_content_is_rejected() {
        assert!(matches!(
            ProtobufCodec.decode(&[0x0a, 0x02, 0xff, 0xfe]),
            Err(RechenError::Codec { .. })
        ));
    }
}
