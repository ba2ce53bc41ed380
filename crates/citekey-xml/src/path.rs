//! ElementTree-style element paths.
//!
//! Supported syntax is the small subset needed to address nodes inside
//! word-processing markup:
//!
//! | Path              | Selects                                               |
//! |-------------------|-------------------------------------------------------|
//! | `//sdt`           | every `sdt` at or below the context element           |
//! | `.//instrText`    | every `instrText` strictly below the context element  |
//! | `./sdtContent//t` | `t` anywhere below a direct `sdtContent` child        |
//! | `r/t`             | `t` children of direct `r` children                   |
//! | `*`               | any element name                                      |
//!
//! Names are matched against the local name. A step written as
//! `prefix:name` also requires the namespace prefix to match.

use crate::{Error, Result, XmlChild, XmlElement};

/// A compiled element path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlPath {
    source: String,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    axis: Axis,
    test: NameTest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// `a/b`
    Child,
    /// `a//b`
    Descendant,
    /// Leading `//b`: the context element itself is a candidate too.
    DescendantOrSelf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Local(String),
    Qualified { prefix: String, name: String },
}

/// Location of an element relative to a context element.
///
/// Each index addresses a slot in the parent's `children` vector. The empty
/// position is the context element itself. Positions order the same way the
/// elements appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementPosition(Vec<usize>);

impl ElementPosition {
    /// The position of the context element.
    pub fn context() -> Self {
        Self(Vec::new())
    }

    /// The position of the `index`-th child slot below this position.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Append a position that is relative to this one.
    pub fn join(&self, relative: &ElementPosition) -> Self {
        let mut indices = self.0.clone();
        indices.extend_from_slice(&relative.0);
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }
}

impl XmlPath {
    /// Compile a path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for empty paths, empty steps
    /// (`a///b`, trailing `/`) and absolute paths starting with a single `/`.
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidPath {
            path: path.to_string(),
            message: message.to_string(),
        };

        let trimmed = path.trim();
        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }

        let (mut axis, mut rest) = if let Some(rest) = trimmed.strip_prefix(".//") {
            (Axis::Descendant, rest)
        } else if let Some(rest) = trimmed.strip_prefix("./") {
            (Axis::Child, rest)
        } else if let Some(rest) = trimmed.strip_prefix("//") {
            (Axis::DescendantOrSelf, rest)
        } else if trimmed == "." {
            return Ok(Self {
                source: path.to_string(),
                steps: Vec::new(),
            });
        } else if trimmed.starts_with('/') {
            return Err(invalid("absolute paths are not supported"));
        } else {
            (Axis::Child, trimmed)
        };

        let mut steps = Vec::new();
        loop {
            let (name, remainder) = match rest.find('/') {
                Some(pos) => (&rest[..pos], Some(&rest[pos..])),
                None => (rest, None),
            };
            if name.is_empty() {
                return Err(invalid("empty step"));
            }
            steps.push(Step {
                axis,
                test: NameTest::parse(name),
            });

            match remainder {
                None => break,
                Some(r) => {
                    if let Some(next) = r.strip_prefix("//") {
                        axis = Axis::Descendant;
                        rest = next;
                    } else {
                        axis = Axis::Child;
                        rest = &r[1..];
                    }
                }
            }
        }

        Ok(Self {
            source: path.to_string(),
            steps,
        })
    }

    /// The path as it was written.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn evaluate(&self, context: &XmlElement) -> Vec<ElementPosition> {
        let mut current = vec![ElementPosition::context()];

        for step in &self.steps {
            let mut next = Vec::new();
            for position in &current {
                let Some(node) = context.element_at(position) else {
                    continue;
                };
                match step.axis {
                    Axis::Child => collect_children(node, position, &step.test, &mut next),
                    Axis::Descendant => collect_descendants(node, position, &step.test, &mut next),
                    Axis::DescendantOrSelf => {
                        if step.test.matches(node) {
                            next.push(position.clone());
                        }
                        collect_descendants(node, position, &step.test, &mut next);
                    }
                }
            }
            // Overlapping descendant searches can reach the same node twice
            next.sort();
            next.dedup();
            current = next;
        }

        current
    }
}

impl std::fmt::Display for XmlPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl NameTest {
    fn parse(step: &str) -> Self {
        if step == "*" {
            return NameTest::Any;
        }
        match step.split_once(':') {
            Some((prefix, name)) => NameTest::Qualified {
                prefix: prefix.to_string(),
                name: name.to_string(),
            },
            None => NameTest::Local(step.to_string()),
        }
    }

    fn matches(&self, element: &XmlElement) -> bool {
        match self {
            NameTest::Any => true,
            NameTest::Local(name) => element.name == *name,
            NameTest::Qualified { prefix, name } => {
                element.name == *name && element.prefix.as_deref() == Some(prefix.as_str())
            }
        }
    }
}

fn collect_children(
    node: &XmlElement,
    position: &ElementPosition,
    test: &NameTest,
    out: &mut Vec<ElementPosition>,
) {
    for (index, child) in node.children.iter().enumerate() {
        if let XmlChild::Element(element) = child {
            if test.matches(element) {
                out.push(position.child(index));
            }
        }
    }
}

fn collect_descendants(
    node: &XmlElement,
    position: &ElementPosition,
    test: &NameTest,
    out: &mut Vec<ElementPosition>,
) {
    for (index, child) in node.children.iter().enumerate() {
        if let XmlChild::Element(element) = child {
            let child_position = position.child(index);
            if test.matches(element) {
                out.push(child_position.clone());
            }
            collect_descendants(element, &child_position, test, out);
        }
    }
}

impl XmlElement {
    /// All elements matching `path`, in document order.
    pub fn find_all(&self, path: &XmlPath) -> Vec<&XmlElement> {
        path.evaluate(self)
            .iter()
            .filter_map(|position| self.element_at(position))
            .collect()
    }

    /// Positions of all elements matching `path`, in document order.
    ///
    /// Use [`XmlElement::element_at_mut`] to edit a located element.
    pub fn locate_all(&self, path: &XmlPath) -> Vec<ElementPosition> {
        path.evaluate(self)
    }

    /// Position of the first element matching `path`.
    pub fn locate(&self, path: &XmlPath) -> Option<ElementPosition> {
        path.evaluate(self).into_iter().next()
    }

    /// Resolve a position produced by a search from this element.
    pub fn element_at(&self, position: &ElementPosition) -> Option<&XmlElement> {
        let mut node = self;
        for &index in position.indices() {
            node = match node.children.get(index) {
                Some(XmlChild::Element(element)) => element,
                _ => return None,
            };
        }
        Some(node)
    }

    /// Mutable counterpart of [`XmlElement::element_at`].
    pub fn element_at_mut(&mut self, position: &ElementPosition) -> Option<&mut XmlElement> {
        let mut node = self;
        for &index in position.indices() {
            node = match node.children.get_mut(index) {
                Some(XmlChild::Element(element)) => element,
                _ => return None,
            };
        }
        Some(node)
    }
}
