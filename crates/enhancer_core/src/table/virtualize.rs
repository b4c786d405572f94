use std::ops::Range;

use enhancer_logging::enhancer_info;

use super::{data_rows, ATTR_THRESHOLD};
use crate::config::parse_positive;
use crate::{EnhancerState, Effect, NodeId};

const CLASS_CONTAINER: &str = "virtual-scroll-container";
const CLASS_SPACER: &str = "virtual-spacer";

/// A large table replaced by a scroll container that renders clones of a row window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VirtualTable {
    /// Table copy without data rows, rendered inside the container.
    pub shell: NodeId,
    pub body: NodeId,
    pub top_spacer: NodeId,
    pub bottom_spacer: NodeId,
    /// Detached original rows, in display order.
    pub rows: Vec<NodeId>,
    pub scroll_top: u32,
    pub window: Range<usize>,
}

/// Rows to render for a scroll offset: the rows under the viewport plus `overscan` on
/// each side, clamped to `total`.
pub fn visible_window(
    scroll_top: u32,
    viewport_height: u32,
    row_height: u32,
    overscan: usize,
    total: usize,
) -> Range<usize> {
    let row_height = row_height.max(1);
    let first = (scroll_top / row_height) as usize;
    let in_view = viewport_height.div_ceil(row_height) as usize;
    let end = (first + in_view + overscan).min(total);
    let start = first.saturating_sub(overscan).min(end);
    start..end
}

pub(super) fn arm(state: &mut EnhancerState, table: NodeId, effects: &mut Vec<Effect>) {
    if state.doc.parent(table).is_none() {
        return;
    }
    let threshold = parse_positive(state.doc.attr(table, ATTR_THRESHOLD))
        .unwrap_or(state.config.virtual_threshold);
    let rows = data_rows(&state.doc, table);
    if rows.len() <= threshold {
        return;
    }

    for row in &rows {
        state.doc.detach(*row);
    }
    let shell = state.doc.deep_clone(table);
    let existing = state
        .doc
        .element_children(shell)
        .into_iter()
        .find(|child| state.doc.tag(*child) == Some("tbody"));
    let body = match existing {
        Some(body) => body,
        None => {
            let body = state.doc.create_element("tbody");
            state.doc.append_child(shell, body);
            body
        }
    };
    // A header row left inside the body would be wiped by the first render.
    let leftovers = state.doc.element_children(body);
    if !leftovers.is_empty() {
        let thead = state.doc.create_element("thead");
        state.doc.insert_before(shell, thead, Some(body));
        for row in leftovers {
            state.doc.append_child(thead, row);
        }
    }

    let height = state.config.virtual_viewport_height_px;
    let container = state.doc.create_element("div");
    state.doc.add_class(container, CLASS_CONTAINER);
    state.doc.set_style(container, "height", format!("{height}px"));
    state.doc.set_style(container, "overflow-y", "auto");
    state
        .doc
        .set_attr(container, "data-total-rows", rows.len().to_string());
    let top_spacer = spacer(state);
    let bottom_spacer = spacer(state);
    state.doc.append_child(container, top_spacer);
    state.doc.append_child(container, shell);
    state.doc.append_child(container, bottom_spacer);

    enhancer_info!(
        "virtualizing table {:?} with {} rows (threshold {})",
        table,
        rows.len(),
        threshold
    );
    let removed = state.doc.replace_with(table, container);
    crate::sweep::on_removed(state, &removed, effects);

    state.virtual_tables.insert(
        container,
        VirtualTable {
            shell,
            body,
            top_spacer,
            bottom_spacer,
            rows,
            scroll_top: 0,
            window: 0..0,
        },
    );
    render(state, container, effects);
}

fn spacer(state: &mut EnhancerState) -> NodeId {
    let node = state.doc.create_element("div");
    state.doc.add_class(node, CLASS_SPACER);
    node
}

/// Returns `false` when `node` is not a virtual scroll container.
pub(crate) fn on_scroll(
    state: &mut EnhancerState,
    node: NodeId,
    scroll_top: u32,
    effects: &mut Vec<Effect>,
) -> bool {
    let Some(vt) = state.virtual_tables.get_mut(&node) else {
        return false;
    };
    vt.scroll_top = scroll_top;
    render(state, node, effects);
    true
}

/// Re-clones the current window into the shell body and resizes the spacers.
/// Slots of the previous clones are recycled, so the arena stays bounded while scrolling.
pub(crate) fn render(state: &mut EnhancerState, container: NodeId, effects: &mut Vec<Effect>) {
    let Some(vt) = state.virtual_tables.get(&container) else {
        return;
    };
    let row_height = state.config.virtual_row_height_px;
    let window = visible_window(
        vt.scroll_top,
        state.config.virtual_viewport_height_px,
        row_height,
        state.config.virtual_overscan_rows,
        vt.rows.len(),
    );
    let (body, top, bottom, total) = (vt.body, vt.top_spacer, vt.bottom_spacer, vt.rows.len());
    let originals = vt.rows[window.clone()].to_vec();

    let stale = state.doc.children(body).to_vec();
    let removed = state.doc.clear_children(body);
    crate::sweep::on_removed(state, &removed, effects);
    // The previous clones belong to this table alone.
    for node in stale {
        state.doc.release(node);
    }
    for row in originals {
        let copy = state.doc.deep_clone(row);
        state.doc.append_child(body, copy);
    }
    let above = window.start as u64 * u64::from(row_height);
    let below = (total - window.end) as u64 * u64::from(row_height);
    state.doc.set_style(top, "height", format!("{above}px"));
    state.doc.set_style(bottom, "height", format!("{below}px"));

    if let Some(vt) = state.virtual_tables.get_mut(&container) {
        vt.window = window;
    }
    state.mark_dirty();
}
