//! Capability tests

use rwd_dom::{Document, NodeId};

use crate::host::Host;

/// Whether the host renders `<picture>` natively
pub fn native_picture<H: Host + ?Sized>(host: &H) -> bool {
    host.supports_native_picture()
}

/// Whether `node` is an element with the picture container tag
pub fn is_picture_element(document: &Document, node: NodeId, tag: &str) -> bool {
    document
        .tree()
        .element(node)
        .is_some_and(|e| e.is(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_picture_element() {
        let mut doc = Document::default();
        let picture = doc.create_element("PICTURE");
        let div = doc.create_element("div");
        let text = doc.tree_mut().create_text("picture");

        assert!(is_picture_element(&doc, picture, "picture"));
        assert!(!is_picture_element(&doc, div, "picture"));
        assert!(!is_picture_element(&doc, text, "picture"));
        assert!(!is_picture_element(&doc, NodeId::NONE, "picture"));
    }
}
