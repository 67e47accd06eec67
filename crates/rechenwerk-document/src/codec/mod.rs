// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Codec registry — one decode/encode pair per `FormatTag`.

pub mod html;
pub mod json;
pub mod protobuf;
pub mod text;
pub mod xml;
pub mod yaml;

use rechenwerk_core::error::Result;
use rechenwerk_core::{EngineConfig, FormatTag};
use tracing::{debug, instrument};

use crate::document::Document;

pub use html::HtmlCodec;
pub use json::JsonCodec;
pub use protobuf::{ProcessedContent, ProtobufCodec};
pub use text::TextCodec;
pub use xml::XmlCodec;
pub use yaml::YamlCodec;

/// Format-specific conversion between bytes and a [`Document`].
pub trait Codec {
    fn format(&self) -> FormatTag;

    fn decode(&self, bytes: &[u8]) -> Result<Document>;

    fn encode(&self, document: &Document) -> Result<Vec<u8>>;
}

/// Holds one configured codec per format.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    text: TextCodec,
    html: HtmlCodec,
    json: JsonCodec,
    yaml: YamlCodec,
    xml: XmlCodec,
    protobuf: ProtobufCodec,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

impl CodecRegistry {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            text: TextCodec,
            html: HtmlCodec,
            json: JsonCodec {
                pretty: config.pretty_output,
            },
            yaml: YamlCodec,
            xml: XmlCodec {
                order: config.xml_text_order,
            },
            protobuf: ProtobufCodec,
        }
    }

    /// Formats this registry can decode and encode.
    pub fn supported_formats() -> &'static [FormatTag] {
        &FormatTag::ALL
    }

    pub fn codec(&self, tag: FormatTag) -> &dyn Codec {
        match tag {
            FormatTag::Text => &self.text,
            FormatTag::Html => &self.html,
            FormatTag::Json => &self.json,
            FormatTag::Yaml => &self.yaml,
            FormatTag::Xml => &self.xml,
            FormatTag::Protobuf => &self.protobuf,
        }
    }

    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn decode(&self, bytes: &[u8], tag: FormatTag) -> Result<Document> {
        let document = self.codec(tag).decode(bytes)?;
        debug!(kind = document.kind(), "decoded");
        Ok(document)
    }

    #[instrument(skip(self, document), fields(kind = document.kind()))]
    pub fn encode(&self, document: &Document, tag: FormatTag) -> Result<Vec<u8>> {
        let bytes = self.codec(tag).encode(document)?;
        debug!(len = bytes.len(), "encoded");
        Ok(bytes)
    }
}

/// Strict UTF-8 view of `bytes`, reported as a codec error for `format`.
pub(crate) fn utf8(bytes: &[u8], format: FormatTag) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| rechenwerk_core::RechenError::codec(format.name(), e))
}
