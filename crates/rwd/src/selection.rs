//! Node selections
//!
//! jQuery-style collections: `Selection::select(doc, "picture").picture(...)`.

use std::slice;

use rwd_dom::{Document, ElementData, NodeId};

use crate::error::Result;
use crate::host::Host;
use crate::picture::PictureOptions;
use crate::Rwd;

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

impl SimpleSelector {
    /// Parse a simple selector string
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if s == "*" {
            Some(Self::Universal)
        } else if let Some(id) = s.strip_prefix('#') {
            Some(Self::Id(id.to_string()))
        } else if let Some(class) = s.strip_prefix('.') {
            Some(Self::Class(class.to_string()))
        } else {
            Some(Self::Tag(s.to_ascii_lowercase()))
        }
    }

    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Universal => true,
            Self::Tag(tag) => element.is(tag),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Class(class) => element.classes().any(|c| c == class.as_str()),
        }
    }
}

/// Ordered collection of nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<NodeId>,
}

impl Selection {
    /// Every element of `document` matching `selector`, in document order
    ///
    /// An unparseable selector selects nothing.
    pub fn select(document: &Document, selector: &str) -> Self {
        let Some(selector) = SimpleSelector::parse(selector) else {
            return Self::default();
        };
        let tree = document.tree();
        let nodes = tree
            .descendants(tree.root())
            .filter(|(_, node)| node.as_element().is_some_and(|e| selector.matches(e)))
            .map(|(id, _)| id)
            .collect();
        Self { nodes }
    }

    pub fn from_nodes(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, NodeId> {
        self.nodes.iter()
    }

    /// Call `f` for each node, then return the selection
    pub fn each<F: FnMut(NodeId)>(self, mut f: F) -> Self {
        self.nodes.iter().copied().for_each(&mut f);
        self
    }

    /// Register every node as a picture, one call per node
    pub fn picture<H: Host>(self, rwd: &mut Rwd<H>, options: &PictureOptions) -> Result<Self> {
        for &node in &self.nodes {
            rwd.picture(&[node], options.clone())?;
        }
        Ok(self)
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a NodeId;
    type IntoIter = slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
