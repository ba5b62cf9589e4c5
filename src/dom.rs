//! Arena-backed element tree holding the page's server-rendered structure.
//!
//! Only the parts of a browser DOM the page behaviors touch are modelled:
//! tag, id, class list, `data-*` values (keyed by their camelCase names),
//! the `title` attribute, text and the inline shown/hidden state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub data: BTreeMap<String, String>,
    pub title: Option<String>,
    pub text: String,
    pub hidden: bool,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Element,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    id_index: HashMap<String, NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                element: Element::new("body"),
            }],
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn append(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(key) = element.id.as_ref().filter(|key| !key.is_empty()) {
            // first element wins, like getElementById
            self.id_index.entry(key.clone()).or_insert(id);
        }
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            element,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(node.0).map(|n| &n.element)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(node.0).map(|n| &mut n.element)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.get(node)
            .map(|element| element.classes.contains(class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.get_mut(node) {
            element.classes.remove(class);
        }
    }

    /// Removes `from` and adds `to`, the usual way visual state is swapped.
    pub fn swap_class(&mut self, node: NodeId, from: &str, to: &str) {
        self.remove_class(node, from);
        self.add_class(node, to);
    }

    pub fn data(&self, node: NodeId, key: &str) -> Option<&str> {
        self.get(node)
            .and_then(|element| element.data.get(key))
            .map(String::as_str)
    }

    pub fn set_data(&mut self, node: NodeId, key: &str, value: impl Into<String>) {
        if let Some(element) = self.get_mut(node) {
            element.data.insert(key.to_string(), value.into());
        }
    }

    pub fn title(&self, node: NodeId) -> Option<&str> {
        self.get(node).and_then(|element| element.title.as_deref())
    }

    pub fn set_title(&mut self, node: NodeId, title: &str) {
        if let Some(element) = self.get_mut(node) {
            element.title = Some(title.to_string());
        }
    }

    pub fn is_visible(&self, node: NodeId) -> bool {
        self.get(node).map(|element| !element.hidden).unwrap_or(false)
    }

    pub fn show(&mut self, node: NodeId) {
        if let Some(element) = self.get_mut(node) {
            element.hidden = false;
        }
    }

    pub fn hide(&mut self, node: NodeId) {
        if let Some(element) = self.get_mut(node) {
            element.hidden = true;
        }
    }

    pub fn toggle(&mut self, node: NodeId) {
        if let Some(element) = self.get_mut(node) {
            element.hidden = !element.hidden;
        }
    }

    /// Nearest ancestor (excluding `node`) carrying `class`.
    pub fn closest_ancestor(&self, node: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    /// Descendants of `node` carrying `class`, in document order.
    pub fn find(&self, node: NodeId, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self.has_class(current, class) {
                found.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        found
    }

    pub fn find_first(&self, node: NodeId, class: &str) -> Option<NodeId> {
        self.find(node, class).into_iter().next()
    }

    pub fn find_by_tag(&self, node: NodeId, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            if self
                .get(current)
                .map(|element| element.tag.eq_ignore_ascii_case(tag))
                .unwrap_or(false)
            {
                found.push(current);
            }
            stack.extend(self.children(current).iter().rev().copied());
        }
        found
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(node)?);
        let pos = siblings.iter().position(|id| *id == node)?;
        siblings.get(pos + 1).copied()
    }

    pub fn prev_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(node)?);
        let pos = siblings.iter().position(|id| *id == node)?;
        pos.checked_sub(1).and_then(|prev| siblings.get(prev).copied())
    }

    /// `node` followed by its ancestors up to the root, the path a click bubbles along.
    pub fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut cursor = self.get(node).map(|_| node);
        while let Some(current) = cursor {
            path.push(current);
            cursor = self.parent(current);
        }
        path
    }
}
