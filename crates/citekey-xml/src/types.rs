//! Core types for mutable XML trees.

/// A parsed XML document.
///
/// Everything before the root element (XML declaration, comments,
/// whitespace) is kept verbatim in `prolog` so that writing the document
/// back out reproduces it exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Raw markup that precedes the root element.
    pub prolog: String,

    /// The root element of the document.
    pub root: XmlElement,
}

/// An XML element.
///
/// Children are kept in document order, including whitespace-only text
/// runs, so that editing one node leaves every other node untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "w" in `<w:t>`).
    pub prefix: Option<String>,

    /// Attributes of this element, in source order.
    pub attributes: Vec<XmlAttribute>,

    /// Child nodes of this element.
    pub children: Vec<XmlChild>,
}

/// An XML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "xml" in `xml:space`).
    pub prefix: Option<String>,

    /// The attribute value (after unescaping XML entities).
    pub value: String,
}

/// A single child node.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    /// A child element.
    Element(XmlElement),

    /// Text content (after unescaping XML entities).
    Text(String),

    /// A CDATA section.
    CData(String),

    /// A comment.
    Comment(String),

    /// A processing instruction, target and content as written between
    /// `<?` and `?>`.
    ProcessingInstruction(String),
}

impl XmlDocument {
    /// Create a new document.
    pub fn new(prolog: String, root: XmlElement) -> Self {
        Self { prolog, root }
    }
}

impl XmlElement {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>, prefix: Option<String>) -> Self {
        Self {
            name: name.into(),
            prefix,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The name as written in the source, e.g. `w:t`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Concatenated text of the direct text and CDATA children.
    ///
    /// Returns an empty string for elements without text.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlChild::Text(t) | XmlChild::CData(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![XmlChild::Text(text.into())];
    }
}

impl XmlAttribute {
    /// Create a new attribute.
    pub fn new(name: String, prefix: Option<String>, value: String) -> Self {
        Self {
            name,
            prefix,
            value,
        }
    }

    /// The name as written in the source, e.g. `xml:space`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }
}
