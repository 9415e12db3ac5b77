use crate::error::{ChangelogError, ResultExt};
use crate::types::Result;
use quick_xml::Reader;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::fs;
use std::mem;
use std::path::Path;

/// Content of an element. Text, comments and attribute values keep the
/// escaped form they had in the source so cloned entries are written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute, escaping `value`.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: &str) -> Self {
        self.attributes
            .push((key.into(), escape(value).into_owned()));
        self
    }

    /// Adds an attribute whose value is already escaped.
    pub fn push_raw_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    /// Adds a text node, escaping `text`.
    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::Text(escape(text).into_owned()));
        self
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }

    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element name without its namespace prefix
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Unescaped value of the attribute `key`
    pub fn attribute(&self, key: &str) -> Result<Option<Cow<'_, str>>> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| unescape(value).map_err(ChangelogError::from))
            .transpose()
    }

    /// Attributes as (name, escaped value) pairs, in source order
    pub fn raw_attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Every element below this one, depth first in document order
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.child_elements().rev().collect(),
        }
    }

    /// Descendants whose local name is `local_name`
    pub fn descendants_named<'a>(
        &'a self,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.descendants()
            .filter(move |element| element.local_name() == local_name)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Self::new(std::str::from_utf8(start.name().as_ref())?);
        for attribute in start.attributes() {
            let attribute = attribute?;
            element.push_raw_attribute(
                std::str::from_utf8(attribute.key.as_ref())?,
                std::str::from_utf8(&attribute.value)?,
            );
        }
        Ok(element)
    }
}

pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.child_elements().rev());
        Some(element)
    }
}

/// An XML document reduced to its root element. The prolog is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    #[must_use]
    pub const fn new(root: Element) -> Self {
        Self { root }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_path_context("Failed to read changelog", path)?;
        Self::parse(&content).with_path_context("Failed to parse changelog", path)
    }

    /// Parses a document. Whitespace-only text between elements is dropped.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut builder = TreeBuilder::default();

        loop {
            match reader.read_event()? {
                Event::Text(text) => builder.text(std::str::from_utf8(&text)?),
                Event::GeneralRef(reference) => {
                    builder.text("&");
                    builder.text(std::str::from_utf8(&reference)?);
                    builder.text(";");
                }
                Event::Start(start) => builder.open(Element::from_start(&start)?),
                Event::Empty(start) => builder.leaf(Element::from_start(&start)?),
                Event::End(_) => builder.close(),
                Event::CData(data) => {
                    builder.node(Node::CData(std::str::from_utf8(&data)?.to_string()));
                }
                Event::Comment(comment) => {
                    builder.node(Node::Comment(std::str::from_utf8(&comment)?.to_string()));
                }
                Event::PI(instruction) => builder.node(Node::ProcessingInstruction(
                    std::str::from_utf8(&instruction)?.to_string(),
                )),
                Event::Eof => break,
                _ => {}
            }
        }

        builder.finish().map(Self::new)
    }

    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<Element>,
    root: Option<Element>,
    pending_text: String,
}

impl TreeBuilder {
    fn text(&mut self, text: &str) {
        self.pending_text.push_str(text);
    }

    fn open(&mut self, element: Element) {
        self.flush_text();
        self.open.push(element);
    }

    fn close(&mut self) {
        self.flush_text();
        if let Some(element) = self.open.pop() {
            self.leaf(element);
        }
    }

    fn leaf(&mut self, element: Element) {
        self.flush_text();
        match self.open.last_mut() {
            Some(parent) => parent.push_element(element),
            None if self.root.is_none() => self.root = Some(element),
            None => {}
        }
    }

    fn node(&mut self, node: Node) {
        self.flush_text();
        if let Some(parent) = self.open.last_mut() {
            parent.push_node(node);
        }
    }

    fn flush_text(&mut self) {
        let text = mem::take(&mut self.pending_text);
        if text.trim().is_empty() {
            return;
        }
        if let Some(parent) = self.open.last_mut() {
            parent.push_node(Node::Text(text));
        }
    }

    fn finish(mut self) -> Result<Element> {
        self.flush_text();
        if let Some(unclosed) = self.open.last() {
            return Err(ChangelogError::Other(format!(
                "Element <{}> is never closed",
                unclosed.name()
            )));
        }
        self.root.ok_or(ChangelogError::MissingRoot)
    }
}
