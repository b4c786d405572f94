//! Table enhancements: click-to-sort headers, windowed rendering of very large tables and
//! drag handles for column widths.

mod resize;
mod sort;
mod virtualize;

pub(crate) use resize::{
    declared_width, on_pointer_down, on_pointer_moved, on_pointer_released, ColumnDrag,
};
pub(crate) use sort::{on_header_click, SortHeader};
pub use sort::SortDirection;
pub(crate) use virtualize::{on_scroll, VirtualTable};
pub use virtualize::visible_window;

use crate::{Document, EnhancerState, Effect, NodeId};

pub(crate) const ATTR_SORTABLE: &str = "data-sortable";
pub(crate) const ATTR_SORT_TYPE: &str = "data-sort-type";
pub(crate) const ATTR_LARGE: &str = "data-large-table";
pub(crate) const ATTR_THRESHOLD: &str = "data-virtual-threshold";

pub(crate) fn arm(state: &mut EnhancerState, scope: NodeId, effects: &mut Vec<Effect>) {
    let large = state.doc.select(scope, |doc, node| {
        doc.tag(node) == Some("table") && doc.has_attr(node, ATTR_LARGE)
    });
    for table in large {
        virtualize::arm(state, table, effects);
    }

    let tables = state.doc.select(scope, |doc, node| {
        doc.tag(node) == Some("table")
            && (doc.has_attr(node, ATTR_SORTABLE) || doc.has_attr(node, ATTR_LARGE))
    });
    for table in tables {
        if state.doc.has_attr(table, ATTR_SORTABLE) {
            sort::arm(state, table);
        }
        resize::arm(state, table);
    }
}

/// `tbody` holding the data rows, or the table itself when rows sit directly under it.
pub(crate) fn row_container(doc: &Document, table: NodeId) -> NodeId {
    doc.element_children(table)
        .into_iter()
        .find(|child| doc.tag(*child) == Some("tbody"))
        .unwrap_or(table)
}

pub(crate) fn header_row(doc: &Document, table: NodeId) -> Option<NodeId> {
    let thead = doc
        .element_children(table)
        .into_iter()
        .find(|child| doc.tag(*child) == Some("thead"));
    if let Some(thead) = thead {
        return doc
            .element_children(thead)
            .into_iter()
            .find(|row| doc.tag(*row) == Some("tr"));
    }
    doc.element_children(row_container(doc, table))
        .into_iter()
        .find(|row| {
            doc.tag(*row) == Some("tr")
                && doc
                    .element_children(*row)
                    .iter()
                    .any(|cell| doc.tag(*cell) == Some("th"))
        })
}

pub(crate) fn header_cells(doc: &Document, table: NodeId) -> Vec<NodeId> {
    header_row(doc, table)
        .map(|row| {
            doc.element_children(row)
                .into_iter()
                .filter(|cell| doc.tag(*cell) == Some("th"))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn data_rows(doc: &Document, table: NodeId) -> Vec<NodeId> {
    let header = header_row(doc, table);
    doc.element_children(row_container(doc, table))
        .into_iter()
        .filter(|row| doc.tag(*row) == Some("tr") && Some(*row) != header)
        .collect()
}

/// Enclosing table of a header cell.
pub(crate) fn owning_table(doc: &Document, node: NodeId) -> Option<NodeId> {
    let mut current = doc.parent(node);
    while let Some(candidate) = current {
        if doc.tag(candidate) == Some("table") {
            return Some(candidate);
        }
        current = doc.parent(candidate);
    }
    None
}
