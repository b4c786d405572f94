/// Owned, parser-independent markup tree handed to the core by whoever parsed it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragment {
    pub nodes: Vec<FragmentNode>,
}

impl Fragment {
    pub fn new(nodes: Vec<FragmentNode>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentNode {
    Doctype(String),
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<FragmentNode>,
    },
    Text(String),
    Comment(String),
}

impl FragmentNode {
    pub fn element(tag: impl Into<String>) -> Self {
        FragmentNode::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        FragmentNode::Text(text.into())
    }

    /// Builder: adds an attribute. No-op on non-element nodes.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let FragmentNode::Element { attrs, .. } = &mut self {
            attrs.push((name.into(), value.into()));
        }
        self
    }

    pub fn child(mut self, node: FragmentNode) -> Self {
        if let FragmentNode::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = FragmentNode>) -> Self {
        if let FragmentNode::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    /// Shorthand for `.child(FragmentNode::text(..))`.
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.child(FragmentNode::text(text))
    }
}
