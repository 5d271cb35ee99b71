//! A small owned XML tree, read and written with `quick-xml`.
//!
//! Objects write their attributes onto an element with
//! [`ObjectExt::get_values_xml`](crate::object::ObjectExt::get_values_xml),
//! and plugin descriptors are read through [`XmlElement::parse`].

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// Errors raised while reading an XML document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
    #[error("XML document has no root element")]
    MissingRoot,
}

// -----------------------------------------------------------------------------
// Node

/// A child of an [`XmlElement`].
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

// -----------------------------------------------------------------------------
// Element

/// An element with ordered attributes and children.
///
/// ```
/// use lumen_rtti::xml::XmlElement;
///
/// let mut node = XmlElement::new("Foo");
/// node.set_attribute("Count", "5");
/// node.set_attribute("Name", "a<b");
/// assert_eq!(node.to_xml_string(), r#"<Foo Count="5" Name="a&lt;b"/>"#);
///
/// let parsed = XmlElement::parse(&node.to_xml_string()).unwrap();
/// assert_eq!(parsed, node);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing one in place.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|(key, _)| key == name)?;
        Some(self.attributes.remove(index).1)
    }

    /// Iterates attributes in document order.
    pub fn attributes(&self) -> impl ExactSizeIterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[inline]
    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    pub fn push_child(&mut self, child: XmlElement) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Iterates the child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// The first child element called `name`.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// The text of the first child element called `name`.
    pub fn child_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.child(name).map(XmlElement::text)
    }

    /// The concatenated text children of this element.
    pub fn text(&self) -> Cow<'_, str> {
        let mut texts = self.children.iter().filter_map(|node| match node {
            XmlNode::Text(text) => Some(text.as_str()),
            XmlNode::Element(_) => None,
        });
        match (texts.next(), texts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(first), None) => Cow::Borrowed(first),
            (Some(first), Some(second)) => {
                let mut out = String::from(first);
                out.push_str(second);
                texts.for_each(|t| out.push_str(t));
                Cow::Owned(out)
            }
        }
    }

    /// Parses a document and returns its root element.
    ///
    /// Declarations, comments and processing instructions are dropped, and
    /// whitespace around text is trimmed.
    pub fn parse(text: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        Self::attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    if let Some(parent) = stack.last_mut()
                        && !text.is_empty()
                    {
                        parent.push_text(text.into_owned());
                    }
                }
                Event::CData(data) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.push_text(String::from_utf8_lossy(&data.into_inner()).into_owned());
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        root.ok_or(XmlError::MissingRoot)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
        let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(XmlNode::Element(element)),
            None => {
                if root.is_none() {
                    *root = Some(element);
                }
            }
        }
    }

    /// Serializes the element and its children without indentation.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                XmlNode::Element(element) => element.write_to(out),
                XmlNode::Text(text) => out.push_str(&escape(text.as_str())),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::{XmlElement, XmlError};

    const DOCUMENT: &str = r#"<?xml version="1.0"?>
        <!-- comment -->
        <Plugin Version="1">
            <Name>Demo &amp; Co</Name>
            <Classes>
                <Class Name="Foo"/>
                <Class Name="Bar"><![CDATA[raw <text>]]></Class>
            </Classes>
        </Plugin>"#;

    #[test]
    fn parses_nested_document() {
        let root = XmlElement::parse(DOCUMENT).unwrap();
        assert_eq!(root.name(), "Plugin");
        assert_eq!(root.attribute("Version"), Some("1"));
        assert_eq!(root.child_text("Name").as_deref(), Some("Demo & Co"));

        let classes: Vec<_> = root
            .child("Classes")
            .unwrap()
            .elements()
            .filter_map(|c| c.attribute("Name"))
            .collect();
        assert_eq!(classes, ["Foo", "Bar"]);
        let bar = root.child("Classes").unwrap().elements().nth(1).unwrap();
        assert_eq!(bar.text(), "raw <text>");
    }

    #[test]
    fn rejects_broken_documents() {
        assert!(matches!(XmlElement::parse(""), Err(XmlError::MissingRoot)));
        assert!(XmlElement::parse("<a></b>").is_err());
    }

    #[test]
    fn attributes_replace_in_place() {
        let mut element = XmlElement::new("Node");
        element.set_attribute("A", "1");
        element.set_attribute("B", "2");
        element.set_attribute("A", "3");
        let attrs: Vec<_> = element.attributes().collect();
        assert_eq!(attrs, [("A", "3"), ("B", "2")]);
        assert_eq!(element.remove_attribute("A").as_deref(), Some("3"));
        assert_eq!(element.attribute("A"), None);
    }
}
