//! Parsed document tree

use std::rc::Rc;

/// One element of a skin document
///
/// Trees are immutable once parsed; fragments are shared by `Rc`, never
/// copied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Rc<Element>>,
    /// Character data directly inside this element
    pub text: Option<String>,
    /// 1-based source line of the start tag
    pub line: usize,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Builder used when assembling trees in code
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Direct children with the given tag
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Rc<Element>> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
