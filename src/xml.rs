// SPDX-License-Identifier: MIT
//!
//! Minimal in-memory XML tree
//!
//! Names are kept in Clark notation, `{namespace}local` when bound to a namespace,
//! plain `local` otherwise, so lookups compare a single string.
//!

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{QName, ResolveResult};
use quick_xml::reader::NsReader;

/// Namespace bound to the reserved `xml:` prefix
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// XML well-formedness error with its location
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct XmlError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl XmlError {
    /// Error at byte offset `pos` of `input`
    fn at<M: Into<String>>(input: &[u8], pos: usize, message: M) -> Self {
        let pos = pos.min(input.len());
        let consumed = &input[..pos];
        let line = consumed.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = consumed
            .iter()
            .rposition(|b| *b == b'\n')
            .map_or(0, |p| p + 1);
        let column = String::from_utf8_lossy(&consumed[line_start..]).chars().count() + 1;

        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Child node of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// XML element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Parse a whole document and return its root element
    pub fn parse(input: &[u8]) -> Result<Element, XmlError> {
        let text = decode(input)?;
        let text = normalize_line_breaks(&text);
        TreeBuilder::new(text.as_bytes()).build()
    }

    /// Element name in Clark notation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if the element name is bound to a namespace
    pub fn is_namespaced(&self) -> bool {
        self.name.starts_with('{')
    }

    /// Attribute value by Clark name, e.g. `{http://www.w3.org/XML/1998/namespace}lang`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(elm) => Some(elm),
            Node::Text(_) => None,
        })
    }

    /// Direct child elements named `name`
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children().filter(move |elm| elm.name == name)
    }

    /// All descendant elements named `name`, in document order.
    /// The element itself is never included.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(name, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, name: &str, found: &mut Vec<&'a Element>) {
        for child in self.children() {
            if child.name == name {
                found.push(child);
            }
            child.collect_descendants(name, found);
        }
    }

    /// Text before the first child element, `None` if there is none
    pub fn text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Node::Text(t)) if !t.is_empty() => Some(t.as_str()),
            _ => None,
        }
    }

    fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(prev)) = self.children.last_mut() {
            prev.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }
}

/// Decode document bytes into UTF-8 text
///
/// Encoding comes from the byte order mark, then from the first bytes of a
/// UTF-16 document without one, then from the XML declaration. Default is UTF-8.
fn decode(input: &[u8]) -> Result<Cow<str>, XmlError> {
    let (encoding, body) = match Encoding::for_bom(input) {
        Some((encoding, bom_len)) => (encoding, &input[bom_len..]),
        None => (sniff_encoding(input)?, input),
    };

    if encoding == UTF_8 {
        return std::str::from_utf8(body)
            .map(Cow::Borrowed)
            .map_err(|e| XmlError::at(body, e.valid_up_to(), e.to_string()));
    }
    log::debug!("Decoding {} document", encoding.name());
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| XmlError {
            line: 1,
            column: 1,
            message: format!("malformed {} input", encoding.name()),
        })
}

fn sniff_encoding(input: &[u8]) -> Result<&'static Encoding, XmlError> {
    if input.starts_with(b"<\0?\0") {
        return Ok(UTF_16LE);
    }
    if input.starts_with(b"\0<\0?") {
        return Ok(UTF_16BE);
    }

    match declared_encoding(input) {
        None => Ok(UTF_8),
        Some(label) => match Encoding::for_label(label) {
            // ASCII compatible bytes, so the declaration is wrong
            Some(encoding) if encoding == UTF_16LE || encoding == UTF_16BE => Ok(UTF_8),
            Some(encoding) => Ok(encoding),
            None => Err(XmlError {
                line: 1,
                column: 1,
                message: format!(
                    "unsupported encoding '{}'",
                    String::from_utf8_lossy(label)
                ),
            }),
        },
    }
}

/// Value of `encoding="..."` in `<?xml ...?>`
fn declared_encoding(input: &[u8]) -> Option<&[u8]> {
    fn skip_ws(bytes: &[u8]) -> &[u8] {
        let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
        &bytes[n..]
    }

    let decl = input.strip_prefix(b"<?xml")?;
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = &decl[..end];
    let pos = decl.windows(8).position(|w| w == b"encoding")?;

    let rest = skip_ws(&decl[pos + 8..]).strip_prefix(b"=")?;
    let (&quote, rest) = skip_ws(rest).split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = rest.iter().position(|b| *b == quote)?;
    Some(&rest[..len])
}

/// End-of-line handling: `\r\n` and lone `\r` become `\n`
fn normalize_line_breaks(text: &str) -> Cow<str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Builds an element tree from quick-xml events
struct TreeBuilder<'i> {
    input: &'i [u8],
    reader: NsReader<&'i [u8]>,
    stack: Vec<Element>,
    root: Option<Element>,
}

impl<'i> TreeBuilder<'i> {
    fn new(input: &'i [u8]) -> Self {
        Self {
            input,
            reader: NsReader::from_reader(input),
            stack: Vec::new(),
            root: None,
        }
    }

    fn build(mut self) -> Result<Element, XmlError> {
        let mut buf = Vec::new();
        loop {
            let event = match self.reader.read_event_into(&mut buf) {
                Ok(event) => event,
                Err(err) => return Err(self.error(err.to_string())),
            };
            match event {
                Event::Start(start) => {
                    let elm = self.element(&start)?;
                    self.stack.push(elm);
                }
                Event::Empty(start) => {
                    let elm = self.element(&start)?;
                    self.attach(elm)?;
                }
                Event::End(_) => {
                    // quick-xml already checked the end name matches
                    match self.stack.pop() {
                        Some(elm) => self.attach(elm)?,
                        None => return Err(self.error("unexpected end tag")),
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| self.error(e.to_string()))?;
                    self.text(&text)?;
                }
                Event::CData(cdata) => {
                    let text = String::from_utf8(cdata.into_inner().into_owned())
                        .map_err(|e| self.error(e.to_string()))?;
                    self.text(&text)?;
                }
                Event::Eof => break,
                // Comment, Decl, PI, DocType
                _ => (),
            }
            buf.clear();
        }

        if let Some(open) = self.stack.last() {
            return Err(self.error(format!("unclosed element <{}>", open.name)));
        }
        match self.root.take() {
            Some(root) => Ok(root),
            None => Err(self.error("no root element")),
        }
    }

    /// New element from a start tag, with names resolved against in-scope namespaces
    fn element(&self, start: &BytesStart) -> Result<Element, XmlError> {
        let (ns, local) = self.reader.resolve_element(start.name());
        let name = self.clark_name(ns, local.as_ref())?;

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.error(e.to_string()))?;
            if attr.key.as_namespace_binding().is_some() {
                // xmlns declarations are not attributes
                continue;
            }
            let key = self.attr_name(attr.key)?;
            let value = attr
                .unescape_value()
                .map_err(|e| self.error(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(Element {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    fn attr_name(&self, key: QName) -> Result<String, XmlError> {
        match key.prefix() {
            Some(prefix) if prefix.as_ref() == b"xml" => {
                let local = self.utf8(key.local_name().as_ref())?;
                Ok(format!("{{{}}}{}", XML_NS, local))
            }
            // Unprefixed attributes are in no namespace
            None => self.utf8(key.local_name().as_ref()),
            Some(_) => {
                let (ns, local) = self.reader.resolve_attribute(key);
                self.clark_name(ns, local.as_ref())
            }
        }
    }

    fn clark_name(&self, ns: ResolveResult, local: &[u8]) -> Result<String, XmlError> {
        let local = self.utf8(local)?;
        match ns {
            ResolveResult::Bound(ns) => Ok(format!("{{{}}}{}", self.utf8(ns.as_ref())?, local)),
            ResolveResult::Unbound => Ok(local),
            ResolveResult::Unknown(prefix) => Err(self.error(format!(
                "unbound namespace prefix '{}'",
                String::from_utf8_lossy(&prefix)
            ))),
        }
    }

    /// Append a completed element to its parent, or make it the root
    fn attach(&mut self, elm: Element) -> Result<(), XmlError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(elm));
            Ok(())
        } else if self.root.is_none() {
            self.root = Some(elm);
            Ok(())
        } else {
            Err(self.error(format!("second root element <{}>", elm.name)))
        }
    }

    fn text(&mut self, text: &str) -> Result<(), XmlError> {
        if let Some(parent) = self.stack.last_mut() {
            parent.push_text(text);
            Ok(())
        } else if text.trim().is_empty() {
            Ok(())
        } else {
            Err(self.error("text outside of the root element"))
        }
    }

    fn utf8(&self, bytes: &[u8]) -> Result<String, XmlError> {
        std::str::from_utf8(bytes)
            .map(|s| s.to_string())
            .map_err(|e| self.error(e.to_string()))
    }

    fn error<M: Into<String>>(&self, message: M) -> XmlError {
        XmlError::at(self.input, self.reader.buffer_position() as usize, message)
    }
}
