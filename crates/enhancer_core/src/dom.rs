//! Arena-backed document tree.
//!
//! A removed subtree stays in the arena, detached, so ids held by stale handlers resolve to
//! a detached node instead of dangling. Only the owner of a detached subtree that no one
//! else refers to hands its slots back with [`Document::release`].

use std::fmt::Write as _;

use crate::fragment::{Fragment, FragmentNode};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    attrs: Vec<(String, String)>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype(String),
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
    live: bool,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            kind,
            live: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document)],
            free: Vec::new(),
        }
    }

    /// Builds a document whose root holds the fragment's top-level nodes.
    pub fn from_fragment(fragment: &Fragment) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        doc.append_fragment(root, fragment);
        doc
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Live nodes, the root included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Allocated slots, live or free.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id.0] = Node::new(kind);
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).filter(|n| n.live)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).filter(|n| n.live)
    }

    /// Frees the slots of a detached subtree for reuse. Ids into it must not be used
    /// afterwards: a later node may take their place. Attached nodes are left alone.
    pub fn release(&mut self, id: NodeId) -> usize {
        if id == self.root() || self.node(id).is_none() || self.parent(id).is_some() {
            return 0;
        }
        let subtree = self.subtree(id);
        for node in &subtree {
            if let Some(slot) = self.nodes.get_mut(node.0) {
                *slot = Node {
                    live: false,
                    ..Node::new(NodeKind::Comment(String::new()))
                };
                self.free.push(*node);
            }
        }
        subtree.len()
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element(Element::new(tag)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.node_mut(id).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Pre-order descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// `id` followed by its pre-order descendants.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = vec![id];
        out.extend(self.descendants(id));
        out
    }

    /// Element descendants of `scope` (scope included) satisfying `pred`.
    pub fn select<F>(&self, scope: NodeId, pred: F) -> Vec<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.subtree(scope)
            .into_iter()
            .filter(|id| self.is_element(*id) && pred(self, *id))
            .collect()
    }

    pub fn select_first<F>(&self, scope: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Document, NodeId) -> bool,
    {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.is_element(*id) && pred(self, *id))
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.select_first(self.root(), |doc, node| doc.attr(node, "id") == Some(id))
    }

    pub fn first_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        self.select_first(scope, |doc, node| doc.tag(node) == Some(tag))
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == root {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Position of `id` among its parent's element children.
    pub fn element_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.element_children(parent).iter().position(|c| *c == id)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(el) = self.element_mut(id) {
            match el.attrs.iter_mut().find(|(k, _)| k == name) {
                Some(slot) => slot.1 = value,
                None => el.attrs.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Option<String> {
        let el = self.element_mut(id)?;
        let pos = el.attrs.iter().position(|(k, _)| k == name)?;
        Some(el.attrs.remove(pos).1)
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map(|list| list.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) || !self.is_element(id) {
            return;
        }
        let next = match self.attr(id, "class") {
            Some(list) if !list.trim().is_empty() => format!("{} {class}", list.trim()),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", next);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(list) = self.attr(id, "class") else {
            return;
        };
        let next = list
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        if next.is_empty() {
            self.remove_attr(id, "class");
        } else {
            self.set_attr(id, "class", next);
        }
    }

    fn style_entries(&self, id: NodeId) -> Vec<(String, String)> {
        self.attr(id, "style")
            .unwrap_or("")
            .split(';')
            .filter_map(|decl| {
                let (prop, value) = decl.split_once(':')?;
                let prop = prop.trim();
                if prop.is_empty() {
                    return None;
                }
                Some((prop.to_ascii_lowercase(), value.trim().to_string()))
            })
            .collect()
    }

    pub fn style(&self, id: NodeId, prop: &str) -> Option<String> {
        self.style_entries(id)
            .into_iter()
            .find(|(p, _)| p == prop)
            .map(|(_, v)| v)
    }

    pub fn set_style(&mut self, id: NodeId, prop: &str, value: impl Into<String>) {
        let value = value.into();
        let mut entries = self.style_entries(id);
        match entries.iter_mut().find(|(p, _)| p == prop) {
            Some(slot) => slot.1 = value,
            None => entries.push((prop.to_string(), value)),
        }
        self.write_style(id, &entries);
    }

    pub fn remove_style(&mut self, id: NodeId, prop: &str) {
        let mut entries = self.style_entries(id);
        entries.retain(|(p, _)| p != prop);
        self.write_style(id, &entries);
    }

    fn write_style(&mut self, id: NodeId, entries: &[(String, String)]) {
        if entries.is_empty() {
            self.remove_attr(id, "style");
            return;
        }
        let text = entries
            .iter()
            .map(|(p, v)| format!("{p}: {v};"))
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attr(id, "style", text);
    }

    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.subtree(id) {
            if let Some(NodeKind::Text(text)) = self.kind(node) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replaces all children with a single text node; returns the removed nodes.
    pub fn set_text_content(&mut self, id: NodeId, text: impl Into<String>) -> Vec<NodeId> {
        let removed = self.clear_children(id);
        let text = self.create_text(text);
        self.append_child(id, text);
        removed
    }

    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.node_mut(id) {
            n.parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Inserts `child` under `parent` before `reference`, or last when `reference` is `None`
    /// or not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        self.detach(child);
        let pos = reference.and_then(|r| self.children(parent).iter().position(|c| *c == r));
        if let Some(p) = self.node_mut(parent) {
            match pos {
                Some(pos) => p.children.insert(pos, child),
                None => p.children.push(child),
            }
        }
        if let Some(n) = self.node_mut(child) {
            n.parent = Some(parent);
        }
    }

    pub fn insert_after(&mut self, reference: NodeId, node: NodeId) {
        let Some(parent) = self.parent(reference) else {
            return;
        };
        let next = {
            let siblings = self.children(parent);
            siblings
                .iter()
                .position(|c| *c == reference)
                .and_then(|pos| siblings.get(pos + 1).copied())
        };
        self.insert_before(parent, node, next);
    }

    /// Detaches `id` and returns its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Vec<NodeId> {
        if self.parent(id).is_none() {
            return Vec::new();
        }
        self.detach(id);
        self.subtree(id)
    }

    /// Puts `replacement` where `old` was and returns `old`'s subtree.
    pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(old) else {
            return Vec::new();
        };
        self.insert_before(parent, replacement, Some(old));
        self.remove(old)
    }

    pub fn clear_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children = self.children(id).to_vec();
        let mut removed = Vec::new();
        for child in children {
            removed.extend(self.remove(child));
        }
        removed
    }

    /// Copies the subtree rooted at `id` into new detached nodes.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let kind = match self.kind(id) {
            Some(NodeKind::Document) | None => NodeKind::Comment(String::new()),
            Some(kind) => kind.clone(),
        };
        let copy = self.push(kind);
        for child in self.children(id).to_vec() {
            let child_copy = self.deep_clone(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Appends the fragment's nodes under `parent` and returns the new top-level ids.
    pub fn append_fragment(&mut self, parent: NodeId, fragment: &Fragment) -> Vec<NodeId> {
        fragment
            .nodes
            .iter()
            .map(|node| {
                let id = self.build(node);
                self.append_child(parent, id);
                id
            })
            .collect()
    }

    fn build(&mut self, node: &FragmentNode) -> NodeId {
        match node {
            FragmentNode::Doctype(name) => self.push(NodeKind::Doctype(name.clone())),
            FragmentNode::Text(text) => self.create_text(text.clone()),
            FragmentNode::Comment(text) => self.push(NodeKind::Comment(text.clone())),
            FragmentNode::Element {
                tag,
                attrs,
                children,
            } => {
                let id = self.create_element(tag);
                for (k, v) in attrs {
                    self.set_attr(id, k, v.clone());
                }
                for child in children {
                    let child_id = self.build(child);
                    self.append_child(id, child_id);
                }
                id
            }
        }
    }

    pub fn to_html(&self) -> String {
        self.inner_html(self.root())
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        let raw = self
            .tag(id)
            .map(|t| RAW_TEXT_ELEMENTS.contains(&t))
            .unwrap_or(false);
        for child in self.children(id) {
            self.write_node(&mut out, *child, raw);
        }
        out
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(&mut out, id, false);
        out
    }

    fn write_node(&self, out: &mut String, id: NodeId, raw_text: bool) {
        match self.kind(id) {
            None => {}
            Some(NodeKind::Document) => out.push_str(&self.inner_html(id)),
            Some(NodeKind::Doctype(name)) => {
                let _ = write!(out, "<!DOCTYPE {name}>");
            }
            Some(NodeKind::Text(text)) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            Some(NodeKind::Comment(text)) => {
                let _ = write!(out, "<!--{text}-->");
            }
            Some(NodeKind::Element(el)) => {
                out.push('<');
                out.push_str(&el.tag);
                for (k, v) in &el.attrs {
                    if v.is_empty() {
                        let _ = write!(out, " {k}");
                    } else {
                        let _ = write!(out, " {k}=\"{}\"", escape_attr(v));
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag.as_str()) {
                    return;
                }
                out.push_str(&self.inner_html(id));
                let _ = write!(out, "</{}>", el.tag);
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}
