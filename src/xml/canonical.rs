//! Canonical line-oriented rendering of an XML document.
//!
//! Two documents that differ only in formatting render to the same text:
//! declaration, comments, processing instructions and doctype are dropped,
//! whitespace-only text is dropped and other text trimmed, attributes are
//! sorted by name. Output has one element per line, indented one space per
//! depth; text-only elements stay on one line and empty elements self-close.

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("{0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("unexpected closing tag")]
    UnexpectedClose,

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document has more than one root element")]
    MultipleRoots,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        attributes.sort();
        Ok(Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
        })
    }
}

/// Render `document` in canonical form.
pub fn canonicalize(document: &[u8]) -> Result<String, XmlError> {
    let root = parse(document)?;
    let mut out = String::new();
    render(&root, 0, &mut out);
    Ok(out)
}

fn parse(document: &[u8]) -> Result<Element, XmlError> {
    let mut reader = Reader::from_reader(document);
    reader.config_mut().trim_text(true);

    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => open.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::End(_) => {
                let element = open.pop().ok_or(XmlError::UnexpectedClose)?;
                attach(&mut open, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut open, text.trim());
            }
            Event::CData(data) => {
                let data = data.into_inner();
                push_text(&mut open, String::from_utf8_lossy(&data).trim());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(element) = open.pop() {
        return Err(XmlError::Unclosed(element.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn attach(open: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), XmlError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_some() => return Err(XmlError::MultipleRoots),
        None => *root = Some(element),
    }
    Ok(())
}

/// Text outside the root element is ignored.
fn push_text(open: &mut [Element], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(parent) = open.last_mut() {
        parent.children.push(Node::Text(text.to_string()));
    }
}

fn render(element: &Element, depth: usize, out: &mut String) {
    let indent = " ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push_str(&format!(" {key}=\"{}\"", escape(value.as_str())));
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    let text_only = element
        .children
        .iter()
        .all(|child| matches!(child, Node::Text(_)));
    if text_only {
        out.push('>');
        for child in &element.children {
            if let Node::Text(text) = child {
                out.push_str(&escape(text.as_str()));
            }
        }
    } else {
        out.push_str(">\n");
        for child in &element.children {
            match child {
                Node::Element(nested) => render(nested, depth + 1, out),
                Node::Text(text) => {
                    out.push_str(&" ".repeat(depth + 1));
                    out.push_str(&escape(text.as_str()));
                    out.push('\n');
                }
            }
        }
        out.push_str(&indent);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}
