// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lenient markup tree for html documents.
//
// Every tag, comment, doctype and raw-text body is kept as the exact source
// slice it came from; only text nodes are exposed for rewriting. Serialising
// the tree concatenates those slices again, so attributes, tag names, case,
// quoting and nesting come back unchanged.

use tracing::debug;

use rechenwerk_core::error::Result;

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose body is raw text, not markup or rewritable prose.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(Element),
    /// Rewritable character data (entities left as written).
    Text(String),
    /// Verbatim source: comments, doctype, stray end tags, raw-text bodies.
    Raw(String),
}

/// An element with its start tag and optional end tag kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub name: String,
    pub start_tag: String,
    pub children: Vec<MarkupNode>,
    /// `None` for void, self-closing or implicitly closed elements.
    pub end_tag: Option<String>,
}

/// A parsed html document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupTree {
    pub nodes: Vec<MarkupNode>,
}

impl MarkupTree {
    /// Parse markup, recovering from anything malformed.
    pub fn parse(source: &str) -> Self {
        TreeBuilder::default().build(source)
    }

    /// Serialise back to markup.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        write_nodes(&self.nodes, &mut out);
        out
    }

    /// Concatenated text leaves, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }

    /// Visit every text leaf in document order.
    pub fn try_for_each_text<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&mut String) -> Result<()>,
    {
        visit_text(&mut self.nodes, &mut f)
    }
}

fn write_nodes(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Element(el) => {
                out.push_str(&el.start_tag);
                write_nodes(&el.children, out);
                if let Some(end) = &el.end_tag {
                    out.push_str(end);
                }
            }
            MarkupNode::Text(text) | MarkupNode::Raw(text) => out.push_str(text),
        }
    }
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Element(el) => collect_text(&el.children, out),
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Raw(_) => {}
        }
    }
}

fn visit_text<F>(nodes: &mut [MarkupNode], f: &mut F) -> Result<()>
where
    F: FnMut(&mut String) -> Result<()>,
{
    for node in nodes {
        match node {
            MarkupNode::Element(el) => visit_text(&mut el.children, f)?,
            MarkupNode::Text(text) => f(text)?,
            MarkupNode::Raw(_) => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Token<'s> {
    Text(&'s str),
    Raw(&'s str),
    Start {
        name: String,
        raw: &'s str,
        self_closing: bool,
    },
    End {
        name: String,
        raw: &'s str,
    },
}

/// Lowercased tag name starting at `s` (which must begin with a letter).
fn tag_name(s: &str) -> String {
    s.chars()
        .take_while(|c| !c.is_ascii_whitespace() && *c != '/' && *c != '>')
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Byte offset just past the `>` closing a tag that starts at `from`,
/// skipping over quoted attribute values.
fn tag_end(source: &str, from: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (offset, &b) in source.as_bytes()[from..].iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(from + offset + 1),
            None => {}
        }
    }
    None
}

/// Byte offset of a case-insensitive `</name` at or after `from`.
fn find_end_tag(source: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("</{name}");
    let haystack = source[from..].to_ascii_lowercase();
    haystack.find(&needle).map(|pos| from + pos)
}

fn push_text<'s>(tokens: &mut Vec<Token<'s>>, source: &'s str, start: usize, end: usize) {
    if end > start {
        tokens.push(Token::Text(&source[start..end]));
    }
}

fn tokenize(source: &str) -> Vec<Token<'_>> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut text_start = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' {
            pos += 1;
            continue;
        }
        let rest = &source[pos..];
        let next = bytes.get(pos + 1).copied();

        if rest.starts_with("<!--") {
            push_text(&mut tokens, source, text_start, pos);
            let end = rest[4..].find("-->").map_or(source.len(), |i| pos + 4 + i + 3);
            tokens.push(Token::Raw(&source[pos..end]));
            pos = end;
            text_start = pos;
        } else if matches!(next, Some(b'!') | Some(b'?')) {
            push_text(&mut tokens, source, text_start, pos);
            let end = rest.find('>').map_or(source.len(), |i| pos + i + 1);
            tokens.push(Token::Raw(&source[pos..end]));
            pos = end;
            text_start = pos;
        } else if next == Some(b'/') && bytes.get(pos + 2).is_some_and(u8::is_ascii_alphabetic) {
            let Some(end) = tag_end(source, pos) else {
                // Unterminated end tag: the rest is text.
                break;
            };
            push_text(&mut tokens, source, text_start, pos);
            tokens.push(Token::End {
                name: tag_name(&source[pos + 2..end]),
                raw: &source[pos..end],
            });
            pos = end;
            text_start = pos;
        } else if next.is_some_and(|b| b.is_ascii_alphabetic()) {
            let Some(end) = tag_end(source, pos) else {
                break;
            };
            push_text(&mut tokens, source, text_start, pos);
            let raw = &source[pos..end];
            let name = tag_name(&source[pos + 1..end]);
            let self_closing = raw.ends_with("/>");
            pos = end;
            text_start = pos;

            let raw_text = !self_closing && RAW_TEXT_ELEMENTS.contains(&name.as_str());
            tokens.push(Token::Start {
                name: name.clone(),
                raw,
                self_closing,
            });
            if raw_text {
                let body_end = find_end_tag(source, pos, &name).unwrap_or(source.len());
                if body_end > pos {
                    tokens.push(Token::Raw(&source[pos..body_end]));
                }
                pos = body_end;
                text_start = pos;
            }
        } else {
            // A bare `<` is ordinary text.
            pos += 1;
        }
    }

    push_text(&mut tokens, source, text_start, source.len());
    tokens
}

// ---------------------------------------------------------------------------
// Tree building
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TreeBuilder {
    root: Vec<MarkupNode>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn build(mut self, source: &str) -> MarkupTree {
        for token in tokenize(source) {
            match token {
                Token::Text(text) => self.push(MarkupNode::Text(text.to_owned())),
                Token::Raw(raw) => self.push(MarkupNode::Raw(raw.to_owned())),
                Token::Start {
                    name,
                    raw,
                    self_closing,
                } => {
                    let element = Element {
                        start_tag: raw.to_owned(),
                        children: Vec::new(),
                        end_tag: None,
                        name,
                    };
                    if self_closing || VOID_ELEMENTS.contains(&element.name.as_str()) {
                        self.push(MarkupNode::Element(element));
                    } else {
                        self.open.push(element);
                    }
                }
                Token::End { name, raw } => self.close(&name, raw),
            }
        }

        while !self.open.is_empty() {
            self.close_innermost(None);
        }
        MarkupTree { nodes: self.root }
    }

    fn push(&mut self, node: MarkupNode) {
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn close(&mut self, name: &str, raw: &str) {
        let Some(depth) = self.open.iter().rposition(|el| el.name == name) else {
            debug!(tag = name, "stray end tag kept verbatim");
            self.push(MarkupNode::Raw(raw.to_owned()));
            return;
        };
        while self.open.len() > depth + 1 {
            self.close_innermost(None);
        }
        self.close_innermost(Some(raw.to_owned()));
    }

    fn close_innermost(&mut self, end_tag: Option<String>) {
        if let Some(mut element) = self.open.pop() {
            element.end_tag = end_tag;
            self.push(MarkupNode::Element(element));
        }
    }
}
