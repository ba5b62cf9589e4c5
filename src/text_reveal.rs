use crate::dom::{Document, NodeId};
use crate::event::ClickEvent;

/// Click on the truncated text: swap it for the full text next to it.
pub fn reveal(doc: &mut Document, toggle: NodeId) {
    let full = doc.next_sibling(toggle);
    doc.hide(toggle);
    if let Some(full) = full {
        doc.show(full);
    }
}

/// Click inside the full text: collapse back, unless the user is selecting
/// text to copy.
pub fn collapse(doc: &mut Document, container: NodeId, event: &ClickEvent) {
    if event.has_selection() {
        return;
    }
    let toggle = doc.prev_sibling(container);
    doc.hide(container);
    if let Some(toggle) = toggle {
        doc.show(toggle);
    }
}
