//! Ground-truth XML documents.
//!
//! Descriptors are small (one page, a handful of tables), so they are read
//! into a plain element tree rather than streamed. The tree keeps attribute
//! order so rewritten fragments stay diffable against their source.

use crate::core::constants::XML_INDENT;
use crate::core::{AugmentError, AugmentResult};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::path::Path;

/// Root element name of a ground-truth document.
pub const ROOT_ELEMENT: &str = "GroundTruth";
/// Attribute on the root naming the image the document describes.
pub const INPUT_FILE_ATTRIBUTE: &str = "InputFile";
/// Container element for table regions.
pub const TABLES_ELEMENT: &str = "Tables";
/// Element describing one table region.
pub const TABLE_ELEMENT: &str = "Table";

/// An XML element with its attributes, text content and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated, trimmed text content directly under this element.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// All descendants (not including `self`) with the given name, in
    /// document order.
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        for child in &self.children {
            child.collect_named(name, &mut found);
        }
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        if self.name == name {
            found.push(self);
        }
        for child in &self.children {
            child.collect_named(name, found);
        }
    }

    /// Table regions of a ground-truth document.
    pub fn tables(&self) -> Vec<&XmlElement> {
        self.descendants_named(TABLE_ELEMENT)
    }

    /// Wraps one table fragment into a complete ground-truth document for
    /// the given image file name.
    pub fn ground_truth_document(input_file: &str, table: XmlElement) -> Self {
        XmlElement::new(ROOT_ELEMENT)
            .with_attribute(INPUT_FILE_ATTRIBUTE, input_file)
            .with_child(XmlElement::new(TABLES_ELEMENT).with_child(table))
    }

    /// Parses a document and returns its root element.
    pub fn parse_str(xml: &str) -> AugmentResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event().map_err(AugmentError::ground_truth)? {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| AugmentError::ground_truth("unexpected closing tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&text.unescape().map_err(AugmentError::ground_truth)?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(AugmentError::ground_truth(format!(
                "unclosed element <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }
        root.ok_or_else(|| AugmentError::ground_truth("document has no root element"))
    }

    /// Reads and parses a descriptor file.
    pub fn from_file(path: &Path) -> AugmentResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|err| match err {
            AugmentError::GroundTruth { message } => AugmentError::GroundTruth {
                message: format!("{}: {message}", path.display()),
            },
            other => other,
        })
    }

    /// Serializes the element as an indented standalone document.
    pub fn to_pretty_string(&self) -> AugmentResult<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', XML_INDENT);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))
            .map_err(AugmentError::ground_truth)?;
        write_element(&mut writer, self)?;

        let mut xml =
            String::from_utf8(writer.into_inner()).map_err(AugmentError::ground_truth)?;
        xml.push('\n');
        Ok(xml)
    }

    /// Writes the element as a standalone document.
    pub fn write_to_file(&self, path: &Path) -> AugmentResult<()> {
        let xml = self.to_pretty_string()?;
        std::fs::write(path, xml).map_err(|e| AugmentError::output(path, e))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> AugmentResult<XmlElement> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(AugmentError::ground_truth)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(AugmentError::ground_truth)?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> AugmentResult<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(AugmentError::ground_truth("multiple root elements")),
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> AugmentResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(AugmentError::ground_truth);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(AugmentError::ground_truth)?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(AugmentError::ground_truth)?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(AugmentError::ground_truth)
}
