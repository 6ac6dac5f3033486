//! Minimal XML element tree built on quick-xml events.
//!
//! Namespace prefixes are dropped: elements and attributes are keyed by their
//! local name only.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ParseError, Result};

#[derive(Debug, Default, Clone)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Trimmed text of a direct child, if the child exists and has text.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
    }
}

/// Parse a whole document and return its root element.
pub(crate) fn parse_document(content: &str) -> Result<Element> {
    let mut reader = Reader::from_str(content);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| ParseError::Deserialization {
            format: "XML",
            detail: Some(e.to_string()),
        })?;

        match event {
            Event::Start(ref e) => stack.push(start_element(e)?),
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| ParseError::deserialization("XML"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&decode(e)?);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::Deserialization {
            format: "XML",
            detail: Some("unclosed element".to_string()),
        });
    }

    root.ok_or_else(|| ParseError::deserialization("XML"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(ParseError::Deserialization {
                format: "XML",
                detail: Some("multiple root elements".to_string()),
            });
        }
    }
    Ok(())
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::Deserialization {
            format: "XML",
            detail: Some(err.to_string()),
        })?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = decode(&attr.value)?;
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Default::default()
    })
}

fn decode(raw: &[u8]) -> Result<String> {
    let text = String::from_utf8_lossy(raw);
    let unescaped = quick_xml::escape::unescape(&text)
        .map_err(|_| ParseError::deserialization("XML"))?;
    Ok(unescaped.into_owned())
}
