use enhancer_logging::enhancer_debug;

use crate::config::parse_positive;
use crate::{EnhancerState, Effect, NodeId};

pub(crate) const ATTR_PROGRESSIVE: &str = "data-progressive-load";
pub(crate) const ATTR_PER_PAGE: &str = "data-items-per-page";
pub(crate) const CLASS_HIDDEN: &str = "progressive-hidden";
pub(crate) const CLASS_BUTTON: &str = "load-more-btn";

/// Reveal cursor over a container's items. `visible` only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pager {
    pub container: NodeId,
    pub items: Vec<NodeId>,
    pub visible: usize,
    pub page_size: usize,
}

impl Pager {
    pub fn remaining(&self) -> usize {
        self.items.len() - self.visible
    }
}

pub(crate) fn remaining_label(remaining: usize) -> String {
    format!("Load more ({remaining} remaining)")
}

pub(crate) fn arm(state: &mut EnhancerState, scope: NodeId) {
    let containers = state
        .doc
        .select(scope, |doc, node| doc.has_attr(node, ATTR_PROGRESSIVE));
    for container in containers {
        if !state.progressive_containers.insert(container) {
            continue;
        }
        let page_size = parse_positive(state.doc.attr(container, ATTR_PER_PAGE))
            .unwrap_or(state.config.items_per_page);
        let items = state.doc.element_children(container);
        if items.len() <= page_size {
            continue;
        }
        if state.doc.parent(container).is_none() {
            enhancer_debug!("progressive container {:?} is detached", container);
            continue;
        }
        for item in &items[page_size..] {
            state.doc.add_class(*item, CLASS_HIDDEN);
        }

        let pager = Pager {
            container,
            items,
            visible: page_size,
            page_size,
        };
        let button = state.doc.create_element("button");
        state.doc.set_attr(button, "type", "button");
        state.doc.add_class(button, CLASS_BUTTON);
        state
            .doc
            .set_text_content(button, remaining_label(pager.remaining()));
        state.doc.insert_after(container, button);
        state.pagers.insert(button, pager);
        state.mark_dirty();
    }
}

/// Forgets the pager of a container whose children were replaced, taking its button
/// with it, so the next [`arm`] pages the new children.
pub(crate) fn release(state: &mut EnhancerState, container: NodeId, effects: &mut Vec<Effect>) {
    state.progressive_containers.remove(&container);
    let buttons: Vec<NodeId> = state
        .pagers
        .iter()
        .filter(|(_, pager)| pager.container == container)
        .map(|(button, _)| *button)
        .collect();
    for button in buttons {
        enhancer_debug!("dropping stale pager {:?} of {:?}", button, container);
        let removed = state.doc.remove(button);
        state.pagers.remove(&button);
        crate::sweep::on_removed(state, &removed, effects);
    }
}

pub(crate) fn on_click(state: &mut EnhancerState, button: NodeId, effects: &mut Vec<Effect>) {
    let Some(pager) = state.pagers.get_mut(&button) else {
        return;
    };
    let next = (pager.visible + pager.page_size).min(pager.items.len());
    let revealed = pager.items[pager.visible..next].to_vec();
    pager.visible = next;
    let remaining = pager.remaining();

    for item in revealed {
        state.doc.remove_class(item, CLASS_HIDDEN);
    }
    if remaining == 0 {
        let removed = state.doc.remove(button);
        crate::sweep::on_removed(state, &removed, effects);
    } else {
        state.doc.set_text_content(button, remaining_label(remaining));
    }
    state.mark_dirty();
}
