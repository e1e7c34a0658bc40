//! A small owned XML tree on top of `quick-xml`.
//!
//! The tree keeps text, comments and start tags exactly as they were read, so
//! writing back a document that was not modified reproduces the input,
//! including a leading byte order mark. Only nodes created or changed through
//! this API are re-encoded.
//!
//! `quick-xml` does not validate, so [`Document::parse`] checks the XML 1.0
//! well-formedness rules itself: names, attribute syntax, characters, comment
//! content, prolog order and element nesting. General entities declared in
//! the internal DTD subset are resolved when text is read.

use std::{borrow::Cow, io::Write, str};

use lazy_static::lazy_static;
use quick_xml::{
    Reader, Writer,
    escape::{partial_escape, resolve_predefined_entity, unescape_with},
    events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event},
};
use regex::Regex;

use crate::error::Error;

const BOM: char = '\u{FEFF}';

const NAME_START_CHARS: &str = r":A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}";
const NAME_CHARS: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

fn name_pattern() -> String {
    format!("[{s}][{s}{c}]*", s = NAME_START_CHARS, c = NAME_CHARS)
}

lazy_static! {
    static ref NAME: Regex = Regex::new(&format!("^{}$", name_pattern())).unwrap();
    /// Start tag content: a name, then whitespace-separated `key="value"` pairs.
    static ref START_TAG: Regex = Regex::new(&format!(
        r#"^{n}(?:[ \t\r\n]+{n}[ \t\r\n]*=[ \t\r\n]*(?:"[^<"]*"|'[^<']*'))*[ \t\r\n]*$"#,
        n = name_pattern()
    ))
    .unwrap();
    /// Internal general entity declaration with a literal value.
    static ref ENTITY_DECL: Regex = Regex::new(&format!(
        r#"<!ENTITY[ \t\r\n]+({n})[ \t\r\n]+(?:"([^"]*)"|'([^']*)')[ \t\r\n]*>"#,
        n = name_pattern()
    ))
    .unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data. `raw` is written back as is, `value` has every
    /// reference resolved.
    Text { raw: String, value: String },
    CData(String),
    Comment(String),
    Decl(String),
    DocType(String),
    PI(String),
}

impl Node {
    /// A text node holding `text`, escaped for output.
    pub fn text(text: &str) -> Self {
        Node::Text {
            raw: partial_escape(text).into_owned(),
            value: text.to_string(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    /// Unescaped value.
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    /// Start tag content between `<` and `>` as read from the input.
    raw_start: Option<String>,
    self_closing: bool,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            raw_start: None,
            self_closing: false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            key: key.into(),
            value: value.into(),
        });
        self.raw_start = None;
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn push(&mut self, node: Node) {
        self.children.push(node);
        self.self_closing = false;
    }

    pub fn push_element(&mut self, element: Element) {
        self.push(Node::Element(element));
    }

    pub fn push_text(&mut self, text: &str) {
        self.push(Node::text(text));
    }

    /// Direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// First direct child element called `name`.
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|el| el.name == name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.child_elements_mut().find(|el| el.name == name)
    }

    /// Unescaped text of all descendant text and CDATA nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    /// Replaces every child with a single text node. The start tag is kept.
    pub fn set_text(&mut self, text: &str) {
        self.children = vec![Node::text(text)];
        self.self_closing = false;
    }

    fn from_start(
        start: &BytesStart,
        self_closing: bool,
        entities: &Entities,
    ) -> Result<Self, Error> {
        let raw_start = utf8(start)?;
        check_chars(raw_start)?;
        if !START_TAG.is_match(raw_start) {
            return Err(Error::parse_error(format!(
                "malformed start tag <{}>",
                raw_start
            )));
        }
        let name = utf8(start.name().as_ref())?.to_string();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::parse_error(e.to_string()))?;
            let value = attr.unescape_value_with(|entity| entities.resolve(entity))?;
            check_chars(&value)?;
            attributes.push(Attribute {
                key: utf8(attr.key.as_ref())?.to_string(),
                value: value.into_owned(),
            });
        }

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
            raw_start: Some(raw_start.to_string()),
            self_closing,
        })
    }

    fn start_tag(&self) -> BytesStart<'_> {
        match &self.raw_start {
            Some(raw) => BytesStart::from_content(raw.as_str(), self.name.len()),
            None => {
                let mut start = BytesStart::new(self.name.as_str());
                for attr in &self.attributes {
                    start.push_attribute((attr.key.as_str(), attr.value.as_str()));
                }
                start
            }
        }
    }

    fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), Error> {
        if self.self_closing && self.children.is_empty() {
            writer.write_event(Event::Empty(self.start_tag()))?;
            return Ok(());
        }
        writer.write_event(Event::Start(self.start_tag()))?;
        for child in &self.children {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// General entities declared in the internal DTD subset. The first
/// declaration of a name is binding.
#[derive(Debug, Default)]
struct Entities(Vec<(String, String)>);

impl Entities {
    fn declared_in(doctype: &str) -> Result<Self, Error> {
        let mut entities = Entities::default();
        for caps in ENTITY_DECL.captures_iter(doctype) {
            let name = &caps[1];
            if entities.resolve(name).is_some() {
                continue;
            }
            let literal = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            let value = unescape_with(literal, |entity| entities.resolve(entity))
                .map_err(|e| Error::parse_error(format!("entity `{}`: {}", name, e)))?
                .into_owned();
            entities.0.push((name.to_string(), value));
        }
        Ok(entities)
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(value) = resolve_predefined_entity(name) {
            return Some(value);
        }
        self.0
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A parsed XML document: the root element plus everything around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    bom: bool,
    nodes: Vec<Node>,
}

impl Document {
    /// Parses `input`, rejecting anything that is not well-formed.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let (bom, content) = match input.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, input),
        };
        let mut reader = Reader::from_str(content);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_comments = true;

        let mut nodes = Vec::new();
        let mut open: Vec<Element> = Vec::new();
        let mut has_root = false;
        let mut has_doctype = false;
        let mut entities = Entities::default();

        loop {
            let event = reader.read_event().map_err(|e| {
                Error::parse_error(format!("{} (at byte {})", e, reader.buffer_position()))
            })?;
            match event {
                Event::Start(ref e) => {
                    if open.is_empty() {
                        claim_root(&mut has_root)?;
                    }
                    open.push(Element::from_start(e, false, &entities)?);
                }
                Event::Empty(ref e) => {
                    if open.is_empty() {
                        claim_root(&mut has_root)?;
                    }
                    let element = Element::from_start(e, true, &entities)?;
                    attach(&mut open, &mut nodes, Node::Element(element));
                }
                Event::End(ref e) => {
                    let name = utf8(e.name().as_ref())?.to_string();
                    let element = open.pop().ok_or_else(|| {
                        Error::parse_error(format!("unexpected closing tag </{}>", name))
                    })?;
                    if element.name != name {
                        return Err(Error::parse_error(format!(
                            "expected </{}>, found </{}>",
                            element.name, name
                        )));
                    }
                    attach(&mut open, &mut nodes, Node::Element(element));
                }
                Event::Text(ref e) => {
                    let raw = utf8(e)?;
                    if open.is_empty() && !is_xml_whitespace(raw) {
                        return Err(Error::parse_error("text outside of the root element"));
                    }
                    let value = decode_text(raw, &entities)?;
                    let node = Node::Text {
                        raw: raw.to_string(),
                        value,
                    };
                    attach(&mut open, &mut nodes, node);
                }
                Event::CData(ref e) => {
                    if open.is_empty() {
                        return Err(Error::parse_error("CDATA outside of the root element"));
                    }
                    let raw = utf8(e)?;
                    check_chars(raw)?;
                    attach(&mut open, &mut nodes, Node::CData(raw.to_string()));
                }
                Event::Comment(ref e) => {
                    let raw = utf8(e)?;
                    if raw.ends_with('-') {
                        return Err(Error::parse_error("comment must not end with `-`"));
                    }
                    check_chars(raw)?;
                    attach(&mut open, &mut nodes, Node::Comment(raw.to_string()));
                }
                Event::Decl(ref e) => {
                    if !nodes.is_empty() || !open.is_empty() {
                        return Err(Error::parse_error(
                            "XML declaration is only allowed at the start of the document",
                        ));
                    }
                    e.version()?;
                    let raw = utf8(e)?;
                    check_chars(raw)?;
                    attach(&mut open, &mut nodes, Node::Decl(raw.to_string()));
                }
                Event::DocType(ref e) => {
                    if has_root || has_doctype {
                        return Err(Error::parse_error(
                            "DOCTYPE is only allowed once, before the root element",
                        ));
                    }
                    has_doctype = true;
                    let raw = utf8(e)?;
                    check_chars(raw)?;
                    entities = Entities::declared_in(raw)?;
                    attach(&mut open, &mut nodes, Node::DocType(raw.trim_start().to_string()));
                }
                Event::PI(ref e) => {
                    let raw = utf8(e)?;
                    check_chars(raw)?;
                    let target = raw.split([' ', '\t', '\r', '\n']).next().unwrap_or_default();
                    if !NAME.is_match(target) || target.eq_ignore_ascii_case("xml") {
                        return Err(Error::parse_error(format!(
                            "invalid processing instruction target `{}`",
                            target
                        )));
                    }
                    attach(&mut open, &mut nodes, Node::PI(raw.to_string()));
                }
                Event::Eof => break,
            }
        }

        if let Some(element) = open.last() {
            return Err(Error::parse_error(format!(
                "unexpected end of file: <{}> is not closed",
                element.name
            )));
        }
        if !has_root {
            return Err(Error::parse_error("no root element"));
        }
        Ok(Document { bom, nodes })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Whether the input started with a UTF-8 byte order mark.
    pub fn has_bom(&self) -> bool {
        self.bom
    }

    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    /// First element called `name`, in document order.
    pub fn find_first(&self, name: &str) -> Option<&Element> {
        find_in(&self.nodes, name)
    }

    pub fn find_first_mut(&mut self, name: &str) -> Option<&mut Element> {
        find_in_mut(&mut self.nodes, name)
    }

    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        if self.bom {
            let mut buf = [0; 3];
            writer.write_all(BOM.encode_utf8(&mut buf).as_bytes())?;
        }
        let mut xml_writer = Writer::new(writer);
        for node in &self.nodes {
            write_node(&mut xml_writer, node)?;
        }
        Ok(())
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, Error> {
    str::from_utf8(bytes).map_err(|e| Error::parse_error(e.to_string()))
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn is_xml_whitespace(raw: &str) -> bool {
    raw.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn check_chars(raw: &str) -> Result<(), Error> {
    match raw.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(Error::parse_error(format!(
            "invalid character U+{:04X}",
            c as u32
        ))),
        None => Ok(()),
    }
}

fn decode_text(raw: &str, entities: &Entities) -> Result<String, Error> {
    check_chars(raw)?;
    if raw.contains("]]>") {
        return Err(Error::parse_error("`]]>` is not allowed in text"));
    }
    let value: Cow<str> = unescape_with(raw, |entity| entities.resolve(entity))
        .map_err(|e| Error::parse_error(e.to_string()))?;
    check_chars(&value)?;
    Ok(value.into_owned())
}

fn claim_root(has_root: &mut bool) -> Result<(), Error> {
    if *has_root {
        return Err(Error::parse_error("more than one root element"));
    }
    *has_root = true;
    Ok(())
}

fn attach(open: &mut [Element], nodes: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text { value, .. } => out.push_str(value),
            Node::CData(raw) => out.push_str(raw),
            Node::Element(el) => collect_text(&el.children, out),
            _ => {}
        }
    }
}

fn find_in<'a>(nodes: &'a [Node], name: &str) -> Option<&'a Element> {
    for el in nodes.iter().filter_map(Node::as_element) {
        if el.name == name {
            return Some(el);
        }
        if let Some(found) = find_in(&el.children, name) {
            return Some(found);
        }
    }
    None
}

fn find_in_mut<'a>(nodes: &'a mut [Node], name: &str) -> Option<&'a mut Element> {
    for el in nodes.iter_mut().filter_map(Node::as_element_mut) {
        if el.name == name {
            return Some(el);
        }
        if let Some(found) = find_in_mut(&mut el.children, name) {
            return Some(found);
        }
    }
    None
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<(), Error> {
    match node {
        Node::Element(el) => el.write(writer)?,
        Node::Text { raw, .. } => {
            writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?
        }
        Node::CData(raw) => writer.write_event(Event::CData(BytesCData::new(raw.as_str())))?,
        Node::Comment(raw) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(raw.as_str())))?
        }
        Node::Decl(raw) => writer.write_event(Event::Decl(BytesDecl::from_start(
            BytesStart::from_content(raw.as_str(), 3),
        )))?,
        Node::DocType(raw) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(raw.as_str())))?
        }
        Node::PI(raw) => writer.write_event(Event::PI(BytesPI::new(raw.as_str())))?,
    }
    Ok(())
}
