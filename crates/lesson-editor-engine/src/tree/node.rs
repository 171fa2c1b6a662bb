use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A node in a lesson's composite content tree.
///
/// Trees are treated as values: walkers return rebuilt trees instead of
/// mutating nodes in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentNode {
    /// Literal text.
    Text { text: String },
    /// Any structural node: sections, blocks, inline wrappers, widgets.
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    /// Own identifier, if this node is addressable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text { text: text.into() }
    }

    pub fn element(tag: impl Into<String>) -> Self {
        ContentNode::Element(Element {
            tag: tag.into(),
            ..Element::default()
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        if let ContentNode::Element(el) = &mut self {
            el.id = Some(id.into());
        }
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let ContentNode::Element(el) = &mut self {
            el.attrs.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_children(mut self, children: Vec<ContentNode>) -> Self {
        if let ContentNode::Element(el) = &mut self {
            el.children = children;
        }
        self
    }

    /// The node's own identifier; empty ids count as absent.
    pub fn own_id(&self) -> Option<&str> {
        match self {
            ContentNode::Element(el) => el.id.as_deref().filter(|id| !id.is_empty()),
            ContentNode::Text { .. } => None,
        }
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            ContentNode::Element(el) => el.attrs.get(key).map(String::as_str),
            ContentNode::Text { .. } => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            ContentNode::Element(el) => Some(&el.tag),
            ContentNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Element(el) => &el.children,
            ContentNode::Text { .. } => &[],
        }
    }
}
