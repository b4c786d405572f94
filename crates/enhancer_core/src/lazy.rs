//! Deferred image sources and content blocks, applied on first viewport intersection.

use enhancer_logging::{enhancer_debug, enhancer_trace, enhancer_warn};

use crate::state::RequestPurpose;
use crate::{urls, EnhancerState, Effect, FetchFailure, Fragment, FragmentScope, NodeId};

pub(crate) const ATTR_SRC: &str = "data-src";
pub(crate) const ATTR_SRCSET: &str = "data-srcset";
pub(crate) const ATTR_CONTENT: &str = "data-lazy-content";

pub(crate) const CLASS_LOADED: &str = "loaded";
pub(crate) const CLASS_LOADING: &str = "loading";
pub(crate) const CLASS_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LazyKind {
    Source,
    Content,
}

/// Registers every pending element under `scope` that is not observed yet.
pub(crate) fn arm(state: &mut EnhancerState, scope: NodeId, effects: &mut Vec<Effect>) {
    let margin = state.config.lazy_root_margin_px;
    let targets = state.doc.select(scope, |doc, node| {
        doc.has_attr(node, ATTR_SRC) || doc.has_attr(node, ATTR_CONTENT)
    });
    for node in targets {
        let kind = if state.doc.has_attr(node, ATTR_CONTENT) {
            LazyKind::Content
        } else {
            LazyKind::Source
        };
        if state.observed.insert(node, kind).is_none() {
            effects.push(Effect::Observe {
                node,
                root_margin_px: margin,
            });
        }
    }
}

pub(crate) fn on_intersection(
    state: &mut EnhancerState,
    node: NodeId,
    is_intersecting: bool,
    effects: &mut Vec<Effect>,
) {
    if !is_intersecting {
        return;
    }
    let Some(kind) = state.observed.remove(&node) else {
        enhancer_trace!("intersection for unobserved node {:?}", node);
        return;
    };
    effects.push(Effect::Unobserve { node });

    match kind {
        LazyKind::Source => {
            if let Some(src) = state.doc.remove_attr(node, ATTR_SRC) {
                state.doc.set_attr(node, "src", src);
            }
            if let Some(srcset) = state.doc.remove_attr(node, ATTR_SRCSET) {
                state.doc.set_attr(node, "srcset", srcset);
            }
            state.doc.add_class(node, CLASS_LOADED);
            state.mark_dirty();
        }
        LazyKind::Content => {
            let Some(raw) = state.doc.remove_attr(node, ATTR_CONTENT) else {
                return;
            };
            let url = urls::resolve(state.config.base_url.as_deref(), &raw);
            state.doc.add_class(node, CLASS_LOADING);
            state.mark_dirty();
            let request_id = state.begin_request(RequestPurpose::LazyContent { node });
            enhancer_debug!("lazy content {:?} requested from {}", node, url);
            effects.push(Effect::Fetch {
                request_id,
                url,
                scope: FragmentScope::Body,
            });
        }
    }
}

pub(crate) fn on_content_loaded(
    state: &mut EnhancerState,
    node: NodeId,
    result: Result<Fragment, FetchFailure>,
    effects: &mut Vec<Effect>,
) {
    if !state.doc.is_attached(node) {
        enhancer_debug!("lazy content for detached node {:?} dropped", node);
        return;
    }
    state.doc.remove_class(node, CLASS_LOADING);
    match result {
        Ok(fragment) => {
            let removed = state.doc.clear_children(node);
            crate::sweep::on_removed(state, &removed, effects);
            crate::pager::release(state, node, effects);
            state.doc.append_fragment(node, &fragment);
            state.doc.add_class(node, CLASS_LOADED);
            crate::rearm(state, node, effects);
        }
        Err(failure) => {
            enhancer_warn!("lazy content for {:?} failed: {}", node, failure.reason);
            state.doc.add_class(node, CLASS_ERROR);
        }
    }
    state.mark_dirty();
}
