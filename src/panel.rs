use crate::dom::{Document, NodeId};
use crate::event::ClickEvent;
use crate::ui::{ENTRY_CONTAINER, ENTRY_EXPAND};

/// Click on an entry title: flip the detail regions of that entry only.
pub fn toggle_panel(doc: &mut Document, title: NodeId, event: &mut ClickEvent) {
    if let Some(container) = doc.closest_ancestor(title, ENTRY_CONTAINER) {
        for expand in doc.find(container, ENTRY_EXPAND) {
            doc.toggle(expand);
        }
    }
    event.prevent_default();
}
