//! XML parser that builds mutable XmlDocument trees.

use crate::{Error, Result, XmlAttribute, XmlChild, XmlDocument, XmlElement};
use quick_xml::Reader;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string, producing an XmlDocument tree.
///
/// # Example
///
/// ```rust
/// use citekey_xml::parse;
///
/// let doc = parse("<root><child/></root>").unwrap();
/// assert_eq!(doc.root.name, "root");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed or if parsing fails.
pub fn parse(content: &str) -> Result<XmlDocument> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The source content being parsed.
    source: &'a str,

    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<XmlElement>,

    /// Raw markup seen before the root element started.
    prolog: String,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            stack: Vec::new(),
            prolog: String::new(),
        }
    }

    fn parse(&mut self) -> Result<XmlDocument> {
        let mut root: Option<XmlElement> = None;

        loop {
            // Capture position before reading the event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    if self.stack.is_empty() {
                        Self::check_single_root(&root, &e)?;
                    }
                    let element = self.start_element(&e)?;
                    self.stack.push(element);
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(e)?;
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(XmlChild::Element(element)),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Empty(e)) => {
                    if self.stack.is_empty() {
                        Self::check_single_root(&root, &e)?;
                    }
                    let element = self.start_element(&e)?;
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(XmlChild::Element(element)),
                        None => root = Some(element),
                    }
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(e, event_start, root.is_some())?;
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(e.as_ref()).to_string();
                    if let Some(node) = self.stack.last_mut() {
                        node.children.push(XmlChild::CData(text));
                    }
                }
                Ok(Event::Comment(e)) => {
                    if let Some(node) = self.stack.last_mut() {
                        let text = String::from_utf8_lossy(&e).to_string();
                        node.children.push(XmlChild::Comment(text));
                    } else {
                        self.capture_prolog(root.is_some(), event_start);
                    }
                }
                Ok(Event::PI(e)) => {
                    if let Some(node) = self.stack.last_mut() {
                        let text = String::from_utf8_lossy(&e).to_string();
                        node.children.push(XmlChild::ProcessingInstruction(text));
                    } else {
                        self.capture_prolog(root.is_some(), event_start);
                    }
                }
                Ok(Event::Decl(_) | Event::DocType(_)) => {
                    if self.stack.is_empty() {
                        self.capture_prolog(root.is_some(), event_start);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", node.qualified_name()),
            });
        }

        let root = root.ok_or(Error::EmptyDocument)?;
        Ok(XmlDocument::new(std::mem::take(&mut self.prolog), root))
    }

    fn check_single_root(root: &Option<XmlElement>, e: &BytesStart<'_>) -> Result<()> {
        if root.is_some() {
            return Err(Error::MultipleRoots {
                name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
            });
        }
        Ok(())
    }

    /// Keep raw markup that appears before the root element.
    fn capture_prolog(&mut self, root_seen: bool, event_start: usize) {
        if root_seen {
            return;
        }
        let end_offset = self.reader.buffer_position() as usize;
        if let Some(raw) = self.source.get(event_start..end_offset) {
            self.prolog.push_str(raw);
        }
    }

    fn start_element(&self, e: &BytesStart<'_>) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let mut element = XmlElement::new(name, prefix);
        element.attributes = self.parse_attributes(e)?;
        Ok(element)
    }

    fn handle_end(&mut self, e: BytesEnd<'_>) -> Result<XmlElement> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", end_name),
        })?;

        // Verify tag names match, prefix included
        if node.qualified_name() != end_name {
            return Err(Error::MismatchedEndTag {
                expected: node.qualified_name(),
                found: end_name,
            });
        }

        Ok(node)
    }

    fn handle_text(&mut self, e: BytesText<'_>, event_start: usize, root_seen: bool) -> Result<()> {
        if self.stack.is_empty() {
            if !e.iter().all(u8::is_ascii_whitespace) {
                return Err(Error::InvalidStructure {
                    message: "Text content outside of the root element".to_string(),
                });
            }
            // Whitespace between the declaration and the root
            self.capture_prolog(root_seen, event_start);
            return Ok(());
        }

        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start as u64),
        })?;

        if let Some(node) = self.stack.last_mut() {
            node.children.push(XmlChild::Text(text.into_owned()));
        }
        Ok(())
    }

    fn parse_attributes(&self, e: &BytesStart<'_>) -> Result<Vec<XmlAttribute>> {
        let mut attributes = Vec::new();

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let (name, prefix) = split_name(attr.key.as_ref());

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: None,
            })?;

            attributes.push(XmlAttribute::new(name, prefix, value.into_owned()));
        }

        Ok(attributes)
    }
}

/// Split `prefix:local` into `(local, Some(prefix))`.
fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full_name = String::from_utf8_lossy(raw);

    match full_name.split_once(':') {
        Some((prefix, local)) => (local.to_string(), Some(prefix.to_string())),
        None => (full_name.to_string(), None),
    }
}
