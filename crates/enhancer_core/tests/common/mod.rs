#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use enhancer_core::{
    update, Document, Effect, EnhancerConfig, EnhancerState, Fragment, FragmentNode,
    FragmentScope, Msg, NodeId, RequestId, TimerId,
};

pub const BASE_URL: &str = "https://example.com/catalog/index.html";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(enhancer_logging::initialize_for_tests);
}

pub fn el(tag: &str) -> FragmentNode {
    FragmentNode::element(tag)
}

/// `<html><head></head><body>..</body></html>` around `body`.
pub fn page(body: Vec<FragmentNode>) -> Document {
    Document::from_fragment(&Fragment::new(vec![el("html")
        .child(el("head").child(el("title").with_text("Test")))
        .child(el("body").children(body))]))
}

pub fn config() -> EnhancerConfig {
    EnhancerConfig {
        base_url: Some(BASE_URL.to_string()),
        ..EnhancerConfig::default()
    }
}

pub fn start(doc: Document) -> (EnhancerState, Vec<Effect>) {
    init_logging();
    update(EnhancerState::new(doc, config()), Msg::Initialize)
}

pub fn by_id(state: &EnhancerState, id: &str) -> NodeId {
    state
        .document()
        .element_by_id(id)
        .unwrap_or_else(|| panic!("no element #{id}"))
}

pub fn started_timers(effects: &[Effect]) -> Vec<(TimerId, Duration)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::StartTimer { timer_id, delay } => Some((*timer_id, *delay)),
            _ => None,
        })
        .collect()
}

pub fn fetches(effects: &[Effect]) -> Vec<(RequestId, String, FragmentScope)> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Fetch {
                request_id,
                url,
                scope,
            } => Some((*request_id, url.clone(), scope.clone())),
            _ => None,
        })
        .collect()
}

pub fn observed(effects: &[Effect]) -> Vec<NodeId> {
    effects
        .iter()
        .filter_map(|e| match e {
            Effect::Observe { node, .. } => Some(*node),
            _ => None,
        })
        .collect()
}

/// Element sibling right after `node`.
pub fn next_element(doc: &Document, node: NodeId) -> Option<NodeId> {
    let parent = doc.parent(node)?;
    let siblings = doc.element_children(parent);
    let pos = siblings.iter().position(|s| *s == node)?;
    siblings.get(pos + 1).copied()
}
