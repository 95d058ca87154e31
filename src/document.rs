//! Minimal XML element tree used for locale metadata and collection files.
//!
//! Documents are parsed into an owned [`Element`] tree, queried by
//! slash-separated paths and written back with a UTF-8 declaration and
//! two-space indentation. Text content is kept verbatim; nothing is trimmed.

use std::fs;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{LocaleError, Result};

/// A single XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder-style attribute setter. Attributes keep insertion order.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content of the element, exactly as it appeared in the document.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Find an element by absolute path, e.g. `/localization/locale/name`.
    ///
    /// The first segment must match this element's own name. Each following
    /// segment selects the first child with that name.
    pub fn find(&self, path: &str) -> Option<&Element> {
        let mut segments = path.split('/').filter(|segment| !segment.is_empty());

        if segments.next()? != self.name {
            return None;
        }

        segments.try_fold(self, |element, segment| element.child(segment))
    }
}

/// Parse an XML document from a string and return its root element.
pub fn parse_str(xml: &str) -> Result<Element> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(element_from_start(&start)?),
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    LocaleError::MalformedDocument("unexpected closing tag".to_string())
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(LocaleError::MalformedDocument(format!(
            "element '{}' is never closed",
            open.name
        )));
    }

    root.ok_or_else(|| LocaleError::MalformedDocument("document has no root element".to_string()))
}

/// Read and parse an XML file.
pub fn parse_file(path: &Path) -> Result<Element> {
    let xml = fs::read_to_string(path)?;
    parse_str(&xml)
}

/// Serialize an element tree into a complete XML document.
pub fn to_xml_string(root: &Element) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_element(&mut writer, root)?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| LocaleError::MalformedDocument(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

/// Serialize an element tree and write it to `path`, replacing any existing file.
pub fn write_file(root: &Element, path: &Path) -> Result<()> {
    let xml = to_xml_string(root)?;
    fs::write(path, xml)?;
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

// Closed elements become children of the enclosing element; the first
// top-level element is the root and any later top-level siblings are dropped.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if element.children.is_empty() {
        writer.write_event(Event::Text(BytesText::new(&element.text)))?;
    } else {
        for child in &element.children {
            write_element(writer, child)?;
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}
