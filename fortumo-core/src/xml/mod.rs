//! Generic XML tree.
//!
//! The service description is digested into a schema-less tree where each
//! element keeps its attributes, its children grouped by tag name, and its
//! character data. A tag seen once under a parent is stored as
//! [`Children::Single`]; the second sibling with the same tag promotes the
//! group to [`Children::Many`]. Consumers that do not care about the shape use
//! [`Children::as_slice`], which always yields a sequence view.
//!
//! Leaf elements with neither attributes nor child elements collapse to
//! [`XmlValue::Text`].

mod builder;

pub use builder::{XmlError, parse};

use fortumo_sdk::objects::Attributes;
use std::collections::BTreeMap;

/// Parsed content of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlValue {
    /// A leaf element that carried only character data.
    Text(String),
    Element(XmlElement),
}

/// One or more sibling elements sharing a tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    Single(XmlValue),
    Many(Vec<XmlValue>),
}

/// An element that kept its structure after parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    attributes: Attributes,
    children: BTreeMap<String, Children>,
    text: Option<String>,
}

impl XmlValue {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Element(element) => Some(element),
            XmlValue::Text(_) => None,
        }
    }

    /// Character data, whether the element collapsed to text or kept its
    /// attributes alongside it.
    pub fn text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            XmlValue::Element(element) => element.text(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_element().and_then(|element| element.attr(name))
    }

    /// Attributes of the element; empty for collapsed text leaves.
    pub fn attributes(&self) -> Attributes {
        self.as_element()
            .map(|element| element.attributes().clone())
            .unwrap_or_default()
    }

    /// First child with the given tag.
    pub fn first(&self, tag: &str) -> Option<&XmlValue> {
        self.as_element().and_then(|element| element.first(tag))
    }

    /// Every child with the given tag, in document order.
    pub fn all(&self, tag: &str) -> &[XmlValue] {
        self.as_element()
            .map(|element| element.all(tag))
            .unwrap_or_default()
    }

    /// Follow `path` through the first child at every step.
    pub fn at(&self, path: &[&str]) -> Option<&XmlValue> {
        let (head, rest) = path.split_first()?;
        let child = self.first(head)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.at(rest)
        }
    }
}

impl Children {
    /// Sequence view regardless of how many siblings were seen.
    pub fn as_slice(&self) -> &[XmlValue] {
        match self {
            Children::Single(value) => std::slice::from_ref(value),
            Children::Many(values) => values,
        }
    }

    pub fn first(&self) -> &XmlValue {
        match self {
            Children::Single(value) => value,
            // `Many` is only ever created with at least two entries.
            Children::Many(values) => &values[0],
        }
    }

    fn push(&mut self, value: XmlValue) {
        match self {
            Children::Many(values) => values.push(value),
            Children::Single(existing) => {
                let existing = std::mem::replace(existing, XmlValue::Text(String::new()));
                *self = Children::Many(vec![existing, value]);
            }
        }
    }
}

impl XmlElement {
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Character data; only present when the element has no child elements.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn child(&self, tag: &str) -> Option<&Children> {
        self.children.get(tag)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Children)> {
        self.children.iter().map(|(tag, group)| (tag.as_str(), group))
    }

    pub fn first(&self, tag: &str) -> Option<&XmlValue> {
        self.child(tag).map(Children::first)
    }

    pub fn all(&self, tag: &str) -> &[XmlValue] {
        self.child(tag).map(Children::as_slice).unwrap_or_default()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Append `value` under `tag`, promoting to a sequence on the second
    /// sibling.
    fn insert_child(&mut self, tag: String, value: XmlValue) {
        match self.children.get_mut(&tag) {
            Some(group) => group.push(value),
            None => {
                self.children.insert(tag, Children::Single(value));
            }
        }
    }
}
