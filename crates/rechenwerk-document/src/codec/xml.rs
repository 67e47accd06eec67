// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Xml codec.
//
// Two mutually exclusive schemas:
//
//   <calculations>                      RecordList, one item per expression
//     <calculation><expression>..</expression></calculation>
//   </calculations>
//
//   <ProcessedContent>                  everything else, as a single string
//     <Result>..</Result>
//   </ProcessedContent>
//
// Input that is not a calculation list is flattened to plain text by joining
// element text depth-first with single spaces.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use rechenwerk_core::FormatTag;
use rechenwerk_core::config::XmlTextOrder;
use rechenwerk_core::error::{RechenError, Result};

use super::{Codec, utf8};
use crate::document::Document;

const CALCULATIONS: &str = "calculations";
const CALCULATION: &str = "calculation";
const EXPRESSION: &str = "expression";
const PROCESSED_CONTENT: &str = "ProcessedContent";
const RESULT: &str = "Result";

fn xml_err(e: impl std::fmt::Display) -> RechenError {
    RechenError::codec("xml", e)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec {
    pub order: XmlTextOrder,
}

/// Minimal element tree: own text segments plus child elements.
#[derive(Debug, Default)]
struct XmlElement {
    name: String,
    text: Vec<String>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(start: &BytesStart<'_>) -> Self {
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Self::default()
        }
    }

    fn flatten(&self, order: XmlTextOrder, out: &mut Vec<String>) {
        let own = self.text.iter().filter(|t| !t.is_empty()).cloned();
        match order {
            XmlTextOrder::SelfFirst => {
                out.extend(own);
                for child in &self.children {
                    child.flatten(order, out);
                }
            }
            XmlTextOrder::ChildrenFirst => {
                for child in &self.children {
                    child.flatten(order, out);
                }
                out.extend(own);
            }
        }
    }

    fn full_text(&self, order: XmlTextOrder) -> String {
        let mut parts = Vec::new();
        self.flatten(order, &mut parts);
        parts.join(" ")
    }

    /// Expressions if this is a calculation list, else `None`.
    fn calculations(&self, order: XmlTextOrder) -> Option<Vec<String>> {
        if self.name != CALCULATIONS {
            return None;
        }
        self.children
            .iter()
            .map(|calc| {
                if calc.name != CALCULATION {
                    return None;
                }
                calc.children
                    .iter()
                    .find(|child| child.name == EXPRESSION)
                    .map(|expr| expr.full_text(order))
            })
            .collect()
    }
}

fn parse_tree(source: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    let mut attach = |element: XmlElement, open: &mut Vec<XmlElement>| -> Result<()> {
        match open.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => root = Some(element),
            None => return Err(xml_err("more than one root element")),
        }
        Ok(())
    };

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(start) => open.push(XmlElement::new(&start)),
            Event::Empty(start) => attach(XmlElement::new(&start), &mut open)?,
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| xml_err("end tag without a matching start tag"))?;
                attach(element, &mut open)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_err)?;
                match open.last_mut() {
                    Some(element) => element.text.push(text.into_owned()),
                    None => return Err(xml_err(format!("text outside the root element: {text}"))),
                }
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                if let Some(element) = open.last_mut() {
                    element.text.push(text);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(xml_err(format!("unclosed element <{}>", unclosed.name)));
    }
    root.ok_or_else(|| xml_err("document has no root element"))
}

fn write_leaf<W: std::io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

impl XmlCodec {
    fn encode_calculations<W: std::io::Write>(
        writer: &mut Writer<W>,
        items: &[String],
    ) -> Result<()> {
        writer
            .write_event(Event::Start(BytesStart::new(CALCULATIONS)))
            .map_err(xml_err)?;
        for item in items {
            writer
                .write_event(Event::Start(BytesStart::new(CALCULATION)))
                .map_err(xml_err)?;
            write_leaf(writer, EXPRESSION, item)?;
            writer
                .write_event(Event::End(BytesEnd::new(CALCULATION)))
                .map_err(xml_err)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(CALCULATIONS)))
            .map_err(xml_err)?;
        Ok(())
    }

    fn encode_content<W: std::io::Write>(writer: &mut Writer<W>, text: &str) -> Result<()> {
        writer
            .write_event(Event::Start(BytesStart::new(PROCESSED_CONTENT)))
            .map_err(xml_err)?;
        write_leaf(writer, RESULT, text)?;
        writer
            .write_event(Event::End(BytesEnd::new(PROCESSED_CONTENT)))
            .map_err(xml_err)?;
        Ok(())
    }
}

impl Codec for XmlCodec {
    fn format(&self) -> FormatTag {
        FormatTag::Xml
    }

    fn decode(&self, bytes: &[u8]) -> Result<Document> {
        let root = parse_tree(utf8(bytes, FormatTag::Xml)?)?;
        Ok(match root.calculations(self.order) {
            Some(expressions) => Document::RecordList(expressions),
            None => Document::PlainText(root.full_text(self.order)),
        })
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;

        match document {
            Document::RecordList(items) => Self::encode_calculations(&mut writer, items)?,
            other => Self::encode_content(&mut writer, &other.to_text()?)?,
        }

        let mut bytes = writer.into_inner().into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED: &str = "<root>head<a>alpha<b>beta</b></a>tail<c/></root>";

    #[test]
    fn flattens_self_then_children() {
        let codec = XmlCodec::default();
        assert_eq!(
            codec.decode(NESTED.as_bytes()).unwrap(),
            Document::PlainText("head tail alpha beta".into())
        );
    }

    #[test]
    fn flattens_children_then_self_when_configured() {
        let codec = XmlCodec {
            order: XmlTextOrder::ChildrenFirst,
        };
        assert_eq!(
            codec.decode(NESTED.as_bytes()).unwrap(),
            Document::PlainText("beta alpha head tail".into())
        );
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let doc = XmlCodec::default()
            .decode(b"<r>1 &lt; 2<![CDATA[ & 3 + 4]]></r>")
            .unwrap();
        assert_eq!(doc, Document::PlainText("1 < 2  & 3 + 4".into()));
    }

    #[test]
    fn calculation_schema_decodes_to_records() {
        let source = "<?xml version=\"1.0\"?>\n<calculations>\n  <calculation><expression>3 + 4</expression></calculation>\n  <calculation><expression> 10 / 2 </expression></calculation>\n</calculations>";
        assert_eq!(
            XmlCodec::default().decode(source.as_bytes()).unwrap(),
            Document::RecordList(vec!["3 + 4".into(), "10 / 2".into()])
        );
    }

    #[test]
    fn calculation_root_with_foreign_children_is_plain_text() {
        let source = "<calculations><note>1 + 1</note></calculations>";
        assert_eq!(
            XmlCodec::default().decode(source.as_bytes()).unwrap(),
            Document::PlainText("1 + 1".into())
        );
    }

    #[test]
    fn records_round_trip_through_the_calculation_schema() {
        let codec = XmlCodec::default();
        let doc = Document::RecordList(vec!["7".into(), "5.0".into()]);
        let bytes = codec.encode(&doc).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("<calculations>"));
        assert!(text.contains("<expression>5.0</expression>"));
        assert_eq!(codec.decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn other_documents_use_the_processed_content_schema() {
        let codec = XmlCodec::default();
        let doc = Document::PlainText("Result: 7 & <done>".into());
        let bytes = codec.encode(&doc).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("<ProcessedContent>"));
        assert!(text.contains("<Result>Result: 7 &amp; &lt;done&gt;</Result>"));
        assert!(!text.contains("<calculations>"));
        assert_eq!(codec.decode(&bytes).unwrap(), doc);
    }

    #[test]
    fn structural_errors() {
        let codec = XmlCodec::default();
        for bad in ["<a><b></a>", "<a>", "", "<a/><b/>", "stray"] {
            assert!(
                matches!(codec.decode(bad.as_bytes()), Err(RechenError::Codec { .. })),
                "{bad:?} should fail"
            );
        }
    }
}
