// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// rechenwerk-document — Document processing for Rechenwerk.
//
// Provides the codec registry (text, html, json, yaml, xml, protobuf), the
// arithmetic expression rewriter, and the processor that ties them together
// (decode, rewrite every text-bearing node, encode).

pub mod codec;
pub mod document;
pub mod markup;
pub mod processor;
pub mod rewrite;

// Re-export the primary structs so callers can use `rechenwerk_document::DocumentProcessor` etc.
pub use codec::{Codec, CodecRegistry};
pub use document::Document;
pub use markup::MarkupTree;
pub use processor::DocumentProcessor;
pub use rewrite::{evaluate_expression, rewrite};
