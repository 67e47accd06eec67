// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain text codec.

use rechenwerk_core::FormatTag;
use rechenwerk_core::error::Result;

use super::{Codec, utf8};
use crate::document::Document;

#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn format(&self) -> FormatTag {
        FormatTag::Text
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        Ok(Document::PlainText(utf8(bytes, FormatTag::Text)?.to_owned()))
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(document.to_text()?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_pass_through() {
        let raw = "line one\r\n\tline two – ünïcode\n";
        let doc = TextCodec.decode(raw.as_bytes()).unwrap();
        assert_eq!(doc, Document::PlainText(raw.into()));
        assert_eq!(TextCodec.encode(&doc).unwrap(), raw.as_bytes());
    }
}
