// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document processor — decode, rewrite every text-bearing node, encode.

use std::path::Path;

use rechenwerk_core::error::Result;
use rechenwerk_core::{EngineConfig, FormatTag, fs};
use tracing::{debug, info, instrument};

use crate::codec::CodecRegistry;
use crate::document::Document;
use crate::rewrite::{evaluate_expression, rewrite, rewrite_value, rewrite_yaml_value};

/// Runs the decode → rewrite → encode pipeline for one document.
///
/// Stateless apart from its configuration; every call is independent.
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    registry: CodecRegistry,
}

impl DocumentProcessor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            registry: CodecRegistry::new(config),
        }
    }

    pub fn registry(&self) -> &CodecRegistry {
        &self.registry
    }

    /// Evaluate every expression the document carries.
    pub fn rewrite_document(&self, document: Document) -> Result<Document> {
        match document {
            Document::PlainText(text) => Ok(Document::PlainText(rewrite(&text)?)),
            Document::StructuredNodes(mut tree) => {
                tree.try_for_each_text(|leaf| {
                    if !leaf.trim().is_empty() {
                        *leaf = rewrite(leaf)?;
                    }
                    Ok(())
                })?;
                Ok(Document::StructuredNodes(tree))
            }
            Document::RecordList(expressions) => {
                let results = expressions
                    .iter()
                    .map(|expression| evaluate_expression(expression).map(|v| v.to_string()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Document::RecordList(results))
            }
            Document::Data(mut value) => {
                rewrite_value(&mut value)?;
                Ok(Document::Data(value))
            }
            Document::YamlData(mut value) => {
                rewrite_yaml_value(&mut value)?;
                Ok(Document::YamlData(value))
            }
        }
    }

    /// In-memory pipeline.
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    pub fn process_bytes(
        &self,
        bytes: &[u8],
        input_format: FormatTag,
        output_format: FormatTag,
    ) -> Result<Vec<u8>> {
        let decoded = self.registry.decode(bytes, input_format)?;
        let kind = decoded.kind();
        let rewritten = self.rewrite_document(decoded)?;
        debug!(kind, "rewrite complete");
        self.registry.encode(&rewritten, output_format)
    }

    /// Read `input_path`, rewrite it, and publish the result at `output_path`.
    ///
    /// The output is only created once every stage has succeeded.
    #[instrument(skip_all, fields(
        input = %input_path.display(),
        output = %output_path.display(),
        %input_format,
        %output_format,
    ))]
    pub fn process(
        &self,
        input_path: &Path,
        output_path: &Path,
        input_format: FormatTag,
        output_format: FormatTag,
    ) -> Result<()> {
        let bytes = fs::read(input_path)?;
        let encoded = self.process_bytes(&bytes, input_format, output_format)?;
        fs::publish(output_path, &encoded)?;
        info!(len = encoded.len(), "document processed");
        Ok(())
    }
}
