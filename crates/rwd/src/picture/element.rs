//! Validated picture container handle

use rwd_dom::{Document, NodeId};

use crate::capability::is_picture_element;
use crate::error::{Result, RwdError};

/// A node known to be a picture container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PictureElement(NodeId);

impl PictureElement {
    /// Wrap `node`, rejecting anything that is not a `tag` element
    pub fn new(document: &Document, node: NodeId, tag: &str) -> Result<Self> {
        if is_picture_element(document, node, tag) {
            Ok(Self(node))
        } else {
            Err(RwdError::NotAPicture(node))
        }
    }

    pub fn node(self) -> NodeId {
        self.0
    }

    /// `<source>` descendants in document order
    pub fn sources(self, document: &Document) -> Vec<NodeId> {
        document.tree().get_elements_by_tag_name(self.0, "source")
    }

    /// The `<img>` the helper renders into, once it exists
    pub fn rendered_image(self, document: &Document) -> Option<NodeId> {
        document.tree().get_elements_by_tag_name(self.0, "img").first().copied()
    }

    /// `src` currently shown; empty before the first render
    pub fn current_src(self, document: &Document) -> &str {
        self.rendered_image(document)
            .and_then(|img| document.get_attribute(img, "src"))
            .unwrap_or("")
    }

    /// Accessible text copied onto the rendered image
    pub fn alt(self, document: &Document) -> Option<&str> {
        document.get_attribute(self.0, "alt")
    }
}
