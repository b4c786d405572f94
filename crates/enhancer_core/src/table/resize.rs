use super::header_cells;
use crate::{Document, EnhancerState, NodeId};

const CLASS_HANDLE: &str = "column-resizer";
const CLASS_ACTIVE: &str = "resizing";

/// An in-progress header drag. Width follows the pointer with no clamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnDrag {
    pub handle: NodeId,
    pub header: NodeId,
    pub start_x: i64,
    pub start_width: i64,
}

/// Adds a handle to every header except the last one.
pub(super) fn arm(state: &mut EnhancerState, table: NodeId) {
    let headers = header_cells(&state.doc, table);
    let Some((_, resizable)) = headers.split_last() else {
        return;
    };
    for header in resizable {
        if state.resizers.values().any(|h| h == header) {
            continue;
        }
        let handle = state.doc.create_element("span");
        state.doc.add_class(handle, CLASS_HANDLE);
        state.doc.set_attr(handle, "aria-hidden", "true");
        state.doc.append_child(*header, handle);
        state.resizers.insert(handle, *header);
        state.mark_dirty();
    }
}

pub(crate) fn on_pointer_down(state: &mut EnhancerState, node: NodeId, x: i64) {
    let Some(header) = state.resizers.get(&node).copied() else {
        return;
    };
    let start_width = state
        .measured_widths
        .get(&header)
        .map(|w| i64::from(*w))
        .or_else(|| declared_width(&state.doc, header))
        .unwrap_or(state.config.default_column_width_px);
    state.doc.add_class(node, CLASS_ACTIVE);
    state.drag = Some(ColumnDrag {
        handle: node,
        header,
        start_x: x,
        start_width,
    });
}

pub(crate) fn on_pointer_moved(state: &mut EnhancerState, x: i64) {
    let Some(drag) = state.drag.as_ref() else {
        return;
    };
    let width = drag.start_width + (x - drag.start_x);
    let header = drag.header;
    state.doc.set_style(header, "width", format!("{width}px"));
    state.mark_dirty();
}

pub(crate) fn on_pointer_released(state: &mut EnhancerState) {
    if let Some(drag) = state.drag.take() {
        state.doc.remove_class(drag.handle, CLASS_ACTIVE);
        state.mark_dirty();
    }
}

/// Width from an inline `width` style or attribute, in whole pixels.
pub(crate) fn declared_width(doc: &Document, node: NodeId) -> Option<i64> {
    let raw = doc
        .style(node, "width")
        .or_else(|| doc.attr(node, "width").map(str::to_string))?;
    let number = raw.trim().trim_end_matches("px").trim();
    number.parse::<f64>().ok().map(|w| w.round() as i64)
}
