//! The parsed-element seam
//!
//! The external parser hands the model builder a tree of elements; all any
//! reader ever needs from one is its tag, its ordered attributes, its
//! ordered children and its inner text. `ParsedElement` captures exactly
//! that, and `Element` is the owned implementation the writer produces and
//! tests build fixtures with.

use serde::{Deserialize, Serialize};

/// Read access to one parsed markup element.
///
/// Attribute and child order is the markup order; both must be stable for
/// round-trips to hold.
pub trait ParsedElement: Sized {
    /// The element's tag name.
    fn tag(&self) -> &str;

    /// Look up an attribute by name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// All attributes, in markup order.
    fn attributes(&self) -> &[(String, String)];

    /// Child elements, in markup order.
    fn children(&self) -> &[Self];

    /// Inner text, if the element has any.
    fn text(&self) -> Option<&str>;
}

/// An owned markup element tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name.
    pub tag: String,

    /// Attributes in markup order.
    pub attributes: Vec<(String, String)>,

    /// Child elements in markup order.
    pub children: Vec<Element>,

    /// Inner text.
    pub text: Option<String>,
}

impl Element {
    /// Create an element with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Append an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append an attribute only when `value` is set.
    pub fn with_optional_attribute(
        mut self,
        name: impl Into<String>,
        value: Option<&str>,
    ) -> Self {
        if let Some(value) = value {
            self.attributes.push((name.into(), value.to_string()));
        }
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set the inner text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element in place.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

impl ParsedElement for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn children(&self) -> &[Self] {
        &self.children
    }

    fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_lookup() {
        let el = Element::new("property")
            .with_attribute("name", "Lang")
            .with_attribute("value", "en");

        assert_eq!(el.attribute("name"), Some("Lang"));
        assert_eq!(el.attribute("missing"), None);
    }

    #[test]
    fn children_keep_markup_order() {
        let el = Element::new("labels")
            .with_child(Element::new("text").with_text("first"))
            .with_child(Element::new("text").with_text("second"));

        let texts: Vec<_> = el.children().iter().filter_map(|c| c.text()).collect();
        assert_eq!(texts, ["first", "second"]);
    }

    #[test]
    fn duplicate_attributes_first_wins_on_lookup() {
        let el = Element::new("x")
            .with_attribute("a", "1")
            .with_attribute("a", "2");

        assert_eq!(el.attribute("a"), Some("1"));
        assert_eq!(el.attributes().len(), 2);
    }
}
