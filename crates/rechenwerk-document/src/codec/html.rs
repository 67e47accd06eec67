// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Html codec — decodes into a lenient markup tree so encoding can reproduce
// the original markup with only text nodes changed.

use rechenwerk_core::FormatTag;
use rechenwerk_core::error::Result;

use super::{Codec, utf8};
use crate::document::Document;
use crate::markup::MarkupTree;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCodec;

impl Codec for HtmlCodec {
    fn format(&self) -> FormatTag {
        FormatTag::Html
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let source = utf8(bytes, FormatTag::Html)?;
        Ok(Document::StructuredNodes(MarkupTree::parse(source)))
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        Ok(document.to_text()?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_markup_still_decodes() {
        let raw = "<div><p>open <b>bold</div> trailing </span>";
        let doc = HtmlCodec.decode(raw.as_bytes()).unwrap();
        assert_eq!(HtmlCodec.encode(&doc).unwrap(), raw.as_bytes());
    }

    #[test]
    fn plain_text_is_written_verbatim() {
        let doc = Document::PlainText("no <markup> here".into());
        assert_eq!(HtmlCodec.encode(&doc).unwrap(), b"no <markup> here");
    }
}
