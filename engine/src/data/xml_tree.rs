// Owned, mutable XML tree built on quick-xml events.
// Only elements and text are modelled; declarations, comments, CDATA and processing
// instructions are kept as raw events and written back untouched.

use crate::error::EngineError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    Other(Event<'static>),
}

#[derive(Debug, Clone, Default)]
pub struct XmlElement {
    /// Qualified name as written, e.g. `w:p`.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

#[derive(Debug, Clone)]
pub struct XmlDocument {
    prolog: Vec<Event<'static>>,
    pub root: XmlElement,
    epilog: Vec<Event<'static>>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.set_attribute(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Concatenated text of the direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.child_elements().filter(move |el| el.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> + 'a {
        self.children.iter_mut().filter_map(move |node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|el| el.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find_map(|node| match node {
            XmlNode::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }

    /// Returns the child called `name`, creating it first if missing.
    ///
    /// A new child goes to the front when `at_front` is set, otherwise to the end.
    pub fn child_or_insert(&mut self, name: &str, at_front: bool) -> &mut XmlElement {
        let existing = self
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(el) if el.name == name));
        let index = match existing {
            Some(i) => i,
            None if at_front => {
                self.children.insert(0, XmlNode::Element(XmlElement::new(name)));
                0
            }
            None => {
                self.children.push(XmlNode::Element(XmlElement::new(name)));
                self.children.len() - 1
            }
        };
        match &mut self.children[index] {
            XmlNode::Element(el) => el,
            _ => unreachable!("index was chosen to point at an element"),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, EngineError> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| EngineError::xml(format!("Invalid tag name: {e}")))?
            .to_string();
        let mut element = XmlElement::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| EngineError::xml(format!("Invalid attribute: {e}")))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| EngineError::xml(format!("Invalid attribute name: {e}")))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| EngineError::xml(format!("Invalid value for '{key}': {e}")))?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), EngineError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(write_error)?;
            return Ok(());
        }

        writer.write_event(Event::Start(start)).map_err(write_error)?;
        for child in &self.children {
            match child {
                XmlNode::Element(el) => el.write_to(writer)?,
                XmlNode::Text(text) => writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(write_error)?,
                XmlNode::Other(event) => writer.write_event(event.clone()).map_err(write_error)?,
            }
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(write_error)?;
        Ok(())
    }
}

fn write_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::xml(format!("Write error: {e}"))
}

impl XmlDocument {
    pub fn parse(input: &[u8]) -> Result<Self, EngineError> {
        let mut reader = Reader::from_reader(input);
        let mut buf = Vec::new();

        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                EngineError::xml(format!(
                    "XML parse error at position {}: {e}",
                    reader.error_position()
                ))
            })?;

            match event {
                Event::Start(start) => stack.push(XmlElement::from_start(&start)?),
                Event::Empty(start) => {
                    let element = XmlElement::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| EngineError::xml("Closing tag without an open element"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => match stack.last_mut() {
                    Some(parent) => {
                        let unescaped = text
                            .unescape()
                            .map_err(|e| EngineError::xml(format!("Invalid text content: {e}")))?;
                        parent.children.push(XmlNode::Text(unescaped.into_owned()));
                    }
                    None if root.is_none() => prolog.push(Event::Text(text.into_owned())),
                    None => epilog.push(Event::Text(text.into_owned())),
                },
                Event::Eof => break,
                other => match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::Other(other.into_owned())),
                    None if root.is_none() => prolog.push(other.into_owned()),
                    None => epilog.push(other.into_owned()),
                },
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(EngineError::xml(format!(
                "Unclosed element '{}'",
                stack.last().map(|el| el.name.as_str()).unwrap_or_default()
            )));
        }
        let root = root.ok_or_else(|| EngineError::xml("Document has no root element"))?;
        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        let mut writer = Writer::new(Vec::new());
        for event in &self.prolog {
            writer.write_event(event.clone()).map_err(write_error)?;
        }
        self.root.write_to(&mut writer)?;
        for event in &self.epilog {
            writer.write_event(event.clone()).map_err(write_error)?;
        }
        Ok(writer.into_inner())
    }
}

/// Hands a finished element to its parent, or makes it the root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), EngineError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(EngineError::xml(format!(
                "Second root element '{}'",
                element.name
            )))
        }
    }
    Ok(())
}
