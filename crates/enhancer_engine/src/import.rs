use ego_tree::NodeRef;
use enhancer_core::{Document, Fragment, FragmentNode, FragmentScope};
use enhancer_logging::{enhancer_debug, enhancer_trace};
use scraper::node::Node;
use scraper::Html;

/// Parses a full page into a core [`Document`], doctype included.
pub fn parse_document(source: &str) -> Document {
    let html = Html::parse_document(source);
    if !html.errors.is_empty() {
        enhancer_trace!("page parsed with {} recoverable errors", html.errors.len());
    }
    let nodes = html.tree.root().children().filter_map(convert).collect();
    Document::from_fragment(&Fragment::new(nodes))
}

/// Parses a fetched response and keeps the part selected by `scope`.
///
/// Responses that look like whole pages are parsed as documents and narrowed to their body;
/// anything else is parsed as a body fragment. An id that matches nothing falls back to the body.
pub fn import_fragment(source: &str, scope: &FragmentScope) -> Fragment {
    let html = if looks_like_document(source) {
        Html::parse_document(source)
    } else {
        Html::parse_fragment(source)
    };

    let target = match scope {
        FragmentScope::Body => None,
        FragmentScope::ElementById(id) => {
            let found = find_by_id(&html, id);
            if found.is_none() {
                enhancer_debug!("response has no #{}; using its body", id);
            }
            found
        }
    };
    let container = target.unwrap_or_else(|| body_of(&html));
    Fragment::new(container.children().filter_map(convert).collect())
}

fn looks_like_document(source: &str) -> bool {
    let head: String = source
        .trim_start()
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn find_by_id<'a>(html: &'a Html, id: &str) -> Option<NodeRef<'a, Node>> {
    html.tree
        .root()
        .descendants()
        .find(|node| matches!(node.value(), Node::Element(element) if element.id() == Some(id)))
}

fn body_of(html: &Html) -> NodeRef<'_, Node> {
    let root = html.root_element();
    root.children()
        .find(|child| matches!(child.value(), Node::Element(element) if element.name() == "body"))
        .unwrap_or(*root)
}

fn convert(node: NodeRef<'_, Node>) -> Option<FragmentNode> {
    match node.value() {
        Node::Element(element) => Some(FragmentNode::Element {
            tag: element.name().to_string(),
            attrs: element
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children: node.children().filter_map(convert).collect(),
        }),
        Node::Text(text) => Some(FragmentNode::Text(String::from(&**text))),
        Node::Comment(comment) => Some(FragmentNode::Comment(String::from(&**comment))),
        Node::Doctype(doctype) => Some(FragmentNode::Doctype(doctype.name().to_string())),
        _ => None,
    }
}
