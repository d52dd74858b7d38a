//! Document-to-tree parsing with a single pinned configuration:
//!
//! - attributes merge into their element's mapping as plain child keys
//! - text is trimmed and internal whitespace runs collapse to one space
//! - an element repeated under one parent becomes a List in document order
//! - a leaf element becomes a Scalar (empty element gives an empty Scalar)
//! - an element with attributes or children stores its own text under `_`,
//!   and an attribute-only element always gets one (possibly empty)
//!
//! The returned tree is a Node keyed by the document's root tag.

use crate::error::{CreditReportError, Result};
use crate::node::{RawNode, TEXT_KEY};
use log::debug;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;

struct Frame {
    name: String,
    children: BTreeMap<String, RawNode>,
    has_elements: bool,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
        let mut children = BTreeMap::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| {
                CreditReportError::UnparseableDocument(format!(
                    "Malformed attribute on <{}>: {}",
                    name, e
                ))
            })?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr.unescape_value().map_err(|e| {
                unparseable(format!("Malformed value for attribute '{}' on <{}>: {}", key, name, e))
            })?;
            insert_child(&mut children, key, RawNode::Scalar(normalize_whitespace(&value)));
        }

        Ok(Self {
            name,
            children,
            has_elements: false,
            text: String::new(),
        })
    }

    fn close(self) -> (String, RawNode) {
        let text = normalize_whitespace(&self.text);
        if self.children.is_empty() {
            return (self.name, RawNode::Scalar(text));
        }

        let mut children = self.children;
        if !text.is_empty() || !self.has_elements {
            insert_child(&mut children, TEXT_KEY.to_string(), RawNode::Scalar(text));
        }
        (self.name, RawNode::Node(children))
    }
}

fn insert_child(children: &mut BTreeMap<String, RawNode>, key: String, value: RawNode) {
    match children.remove(&key) {
        None => {
            children.insert(key, value);
        }
        Some(RawNode::List(mut items)) => {
            items.push(value);
            children.insert(key, RawNode::List(items));
        }
        Some(existing) => {
            children.insert(key, RawNode::List(vec![existing, value]));
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text for a character or predefined entity reference. Unknown references are kept verbatim.
fn resolve_reference(reference: &BytesRef<'_>) -> String {
    let name = String::from_utf8_lossy(reference);
    match reference.resolve_char_ref() {
        Ok(Some(c)) => c.to_string(),
        Ok(None) => match resolve_predefined_entity(&name) {
            Some(resolved) => resolved.to_string(),
            None => format!("&{};", name),
        },
        Err(_) => format!("&{};", name),
    }
}

fn unparseable(details: impl Into<String>) -> CreditReportError {
    CreditReportError::UnparseableDocument(details.into())
}

/// Parses raw document bytes into a [`RawNode`] tree.
///
/// Fails with `UnparseableDocument` for empty or non-UTF-8 input, malformed
/// markup, text outside the root element, or a document without exactly one root.
pub fn parse_document(bytes: &[u8]) -> Result<RawNode> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| unparseable(format!("Document is not valid UTF-8: {}", e)))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    if content.trim().is_empty() {
        return Err(unparseable("Document is empty"));
    }

    let mut reader = Reader::from_str(content);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, RawNode)> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            unparseable(format!(
                "Malformed markup near byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(unparseable("Document has more than one root element"));
                }
                stack.push(Frame::open(e)?);
            }
            Event::Empty(ref e) => {
                if root.is_some() {
                    return Err(unparseable("Document has more than one root element"));
                }
                let closed = Frame::open(e)?.close();
                attach(&mut stack, &mut root, closed);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| unparseable("Closing tag without matching opening tag"))?;
                attach(&mut stack, &mut root, frame.close());
            }
            Event::Text(ref e) => {
                let raw = String::from_utf8_lossy(e);
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&raw),
                    None if raw.trim().is_empty() => {}
                    None => return Err(unparseable("Text found outside the root element")),
                }
            }
            Event::CData(ref e) => match stack.last_mut() {
                Some(frame) => frame.text.push_str(&String::from_utf8_lossy(e)),
                None => return Err(unparseable("CDATA found outside the root element")),
            },
            Event::GeneralRef(ref e) => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| unparseable("Entity reference outside the root element"))?;
                frame.text.push_str(&resolve_reference(e));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(unparseable(format!("Element <{}> is never closed", frame.name)));
    }

    let (name, value) = root.ok_or_else(|| unparseable("Document has no root element"))?;
    debug!("Parsed document with root element <{}>", name);

    let mut document = BTreeMap::new();
    document.insert(name, value);
    Ok(RawNode::Node(document))
}

fn attach(stack: &mut [Frame], root: &mut Option<(String, RawNode)>, closed: (String, RawNode)) {
    match stack.last_mut() {
        Some(parent) => {
            parent.has_elements = true;
            insert_child(&mut parent.children, closed.0, closed.1);
        }
        None => *root = Some(closed),
    }
}
