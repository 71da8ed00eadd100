use indexmap::IndexMap;
use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::io::BufRead;

use super::error;

pub type Attributes = IndexMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Comment(String),
}

/// An element of a parsed document. Children keep document order, including
/// the text and comment nodes between elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Attributes,
    children: Vec<XmlNode>,
}

impl From<XmlElement> for XmlNode {
    fn from(element: XmlElement) -> Self {
        XmlNode::Element(element)
    }
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(..) | XmlNode::Comment(..) => None,
        }
    }
}

impl XmlElement {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child<N: Into<XmlNode>>(mut self, child: N) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text<S: Into<String>>(self, text: S) -> Self {
        self.with_child(XmlNode::Text(text.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Element children only.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    pub fn first_element(&self) -> Option<&XmlElement> {
        self.elements().next()
    }

    pub fn child_named(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|child| child.name == name)
    }

    pub fn children_named(&self, name: &str) -> impl Iterator<Item = &XmlElement> {
        let name = name.to_owned();
        self.elements().filter(move |child| child.name == name)
    }

    pub fn child_with_attribute(&self, attribute: &str, value: &str) -> Option<&XmlElement> {
        self.elements()
            .find(|child| child.attribute(attribute) == Some(value))
    }

    /// Raw text directly inside this element, whitespace untouched.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(..) | XmlNode::Comment(..) => None,
            })
            .collect()
    }
}

fn start_element<B: BufRead>(
    reader: &Reader<B>,
    start: &BytesStart<'_>,
) -> Result<XmlElement, error::Error> {
    let mut element = XmlElement::new(reader.decode(start.name())?);

    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?.to_owned();
        let value = attribute.unescape_and_decode_value(reader)?;
        element.attributes.insert(key, value);
    }

    Ok(element)
}

fn close_element(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), error::Error> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(error::Error::MalformedXml(format!(
            "second root element <{}>",
            element.name
        )));
    }

    Ok(())
}

/// Parses a whole document into its root element.
pub fn parse(xml: &str) -> Result<XmlElement, error::Error> {
    let mut reader = Reader::from_str(xml);
    let mut buffer = Vec::new();
    let mut stack = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event(&mut buffer)? {
            Event::Start(start) => stack.push(start_element(&reader, &start)?),

            Event::Empty(start) => {
                let element = start_element(&reader, &start)?;
                close_element(&mut stack, &mut root, element)?;
            }

            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    error::Error::MalformedXml(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(end.name())
                    ))
                })?;
                close_element(&mut stack, &mut root, element)?;
            }

            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape_and_decode(&reader)?;

                    if !text.is_empty() {
                        parent.children.push(XmlNode::Text(text));
                    }
                }
            }

            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    let text = data.unescape_and_decode(&reader)?;
                    parent.children.push(XmlNode::Text(text));
                }
            }

            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(XmlNode::Comment(reader.decode(&comment)?.to_owned()));
                }
            }

            Event::Eof => break,

            _ => (),
        }

        buffer.clear();
    }

    if let Some(open) = stack.last() {
        return Err(error::Error::MalformedXml(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or(error::Error::EmptyDocument)
}
