mod common;

use common::{by_id, el, page, start};
use enhancer_core::{update, Document, EnhancerState, FragmentNode, Msg, NodeId, SortDirection};
use pretty_assertions::assert_eq;

fn header(id: &str, label: &str, numeric: bool) -> FragmentNode {
    let th = el("th").attr("id", id);
    let th = if numeric {
        th.attr("data-sort-type", "number")
    } else {
        th
    };
    th.with_text(label)
}

fn row(name: &str, qty: &str) -> FragmentNode {
    el("tr")
        .child(el("td").with_text(name))
        .child(el("td").with_text(qty))
}

fn inventory_page() -> Document {
    page(vec![el("table")
        .attr("id", "inventory")
        .attr("data-sortable", "")
        .child(el("thead").child(
            el("tr")
                .child(header("name", "Name", false))
                .child(header("qty", "Qty", true)),
        ))
        .child(el("tbody").attr("id", "rows").children([
            row("banana", "10"),
            row("Apple", "2"),
            row("cherry", "33"),
        ]))])
}

fn column(state: &EnhancerState, body: NodeId, index: usize) -> Vec<String> {
    let doc = state.document();
    doc.element_children(body)
        .into_iter()
        .map(|row| doc.text_content(doc.element_children(row)[index]))
        .collect()
}

fn click(state: EnhancerState, id: &str) -> EnhancerState {
    let node = by_id(&state, id);
    update(state, Msg::Clicked { node }).0
}

#[test]
fn numeric_column_sorts_by_value_not_text() {
    let (state, _) = start(inventory_page());
    let rows = by_id(&state, "rows");
    let state = click(state, "qty");
    assert_eq!(column(&state, rows, 1), vec!["2", "10", "33"]);

    let qty = by_id(&state, "qty");
    assert!(state.document().has_class(qty, "sorted-asc"));
    assert_eq!(state.document().attr(qty, "aria-sort"), Some("ascending"));
}

#[test]
fn sorting_twice_reverses_the_first_order() {
    let (state, _) = start(inventory_page());
    let rows = by_id(&state, "rows");
    let state = click(state, "name");
    let first = column(&state, rows, 0);
    assert_eq!(first, vec!["Apple", "banana", "cherry"]);

    let state = click(state, "name");
    let mut reversed = first.clone();
    reversed.reverse();
    assert_eq!(column(&state, rows, 0), reversed);
    let name = by_id(&state, "name");
    assert_eq!(state.sort_direction(name), Some(SortDirection::Descending));
    assert!(state.document().has_class(name, "sorted-desc"));
    assert!(!state.document().has_class(name, "sorted-asc"));
}

#[test]
fn only_the_last_sorted_header_is_marked() {
    let (state, _) = start(inventory_page());
    let state = click(state, "qty");
    let state = click(state, "name");
    let doc = state.document();
    let qty = by_id(&state, "qty");
    let name = by_id(&state, "name");

    assert_eq!(state.sort_direction(qty), None);
    assert!(!doc.has_class(qty, "sorted-asc"));
    assert!(!doc.has_attr(qty, "aria-sort"));
    assert!(doc.has_class(name, "sorted-asc"));

    // Direction memory was reset: qty starts ascending again.
    let state = click(state, "qty");
    let qty = by_id(&state, "qty");
    assert_eq!(state.sort_direction(qty), Some(SortDirection::Ascending));
}

#[test]
fn resize_handle_follows_pointer_without_clamp() {
    let (state, _) = start(inventory_page());
    let name = by_id(&state, "name");
    let qty = by_id(&state, "qty");
    let doc = state.document();
    assert_eq!(state.view().column_resizers, 1);
    assert!(doc.select(qty, |d, n| d.has_class(n, "column-resizer")).is_empty());
    let handle = doc
        .select_first(name, |d, n| d.has_class(n, "column-resizer"))
        .unwrap();

    let (state, _) = update(state, Msg::ElementMeasured { node: name, width: 120 });
    let (state, _) = update(state, Msg::PointerDown { node: handle, x: 300 });
    assert!(state.document().has_class(handle, "resizing"));
    let (state, _) = update(state, Msg::PointerMoved { x: 345 });
    assert_eq!(state.document().style(name, "width").as_deref(), Some("165px"));
    let (state, _) = update(state, Msg::PointerMoved { x: 100 });
    assert_eq!(state.document().style(name, "width").as_deref(), Some("-80px"));
    let (state, _) = update(state, Msg::PointerReleased);
    assert!(!state.document().has_class(handle, "resizing"));

    // Moves after release change nothing.
    let (state, _) = update(state, Msg::PointerMoved { x: 500 });
    assert_eq!(state.document().style(name, "width").as_deref(), Some("-80px"));
}

fn large_page(rows: usize, threshold: &str) -> Document {
    page(vec![el("table")
        .attr("id", "big")
        .attr("data-large-table", "")
        .attr("data-sortable", "")
        .attr("data-virtual-threshold", threshold)
        .child(el("thead").child(el("tr").child(header("num", "#", true))))
        .child(el("tbody").children(
            (0..rows).map(|i| el("tr").child(el("td").with_text(format!("{i}")))),
        ))])
}

fn rendered(state: &EnhancerState) -> Vec<String> {
    let doc = state.document();
    let shell = by_id(state, "big");
    let body = doc.first_by_tag(shell, "tbody").unwrap();
    doc.element_children(body)
        .into_iter()
        .map(|row| doc.text_content(row))
        .collect()
}

fn spacer_heights(state: &EnhancerState, container: NodeId) -> (String, String) {
    let doc = state.document();
    let children = doc.element_children(container);
    (
        doc.style(children[0], "height").unwrap(),
        doc.style(children[2], "height").unwrap(),
    )
}

#[test]
fn large_table_is_replaced_by_scroll_window() {
    let (state, _) = start(large_page(200, "50"));
    let shell = by_id(&state, "big");
    let container = state.document().parent(shell).unwrap();
    assert!(state
        .document()
        .has_class(container, "virtual-scroll-container"));
    assert_eq!(
        state.document().style(container, "height").as_deref(),
        Some("400px")
    );
    assert_eq!(state.virtual_window(container), Some(0..15));
    assert_eq!(rendered(&state).len(), 15);
    assert_eq!(
        spacer_heights(&state, container),
        ("0px".to_string(), "7400px".to_string())
    );

    let (state, _) = update(
        state,
        Msg::Scrolled {
            node: container,
            scroll_top: 4000,
        },
    );
    assert_eq!(state.virtual_window(container), Some(95..115));
    let rows = rendered(&state);
    assert_eq!(rows.first().map(String::as_str), Some("95"));
    assert_eq!(rows.last().map(String::as_str), Some("114"));
    assert_eq!(
        spacer_heights(&state, container),
        ("3800px".to_string(), "3400px".to_string())
    );
}

#[test]
fn table_at_threshold_is_left_alone() {
    let (state, _) = start(large_page(50, "50"));
    let table = by_id(&state, "big");
    assert_eq!(state.document().tag(state.document().parent(table).unwrap()), Some("body"));
    assert_eq!(state.view().virtual_tables, 0);
    assert_eq!(rendered(&state).len(), 50);
}

#[test]
fn sorting_a_virtual_table_reorders_the_full_row_set() {
    let (state, _) = start(large_page(200, "50"));
    let state = click(state, "num");
    let state = click(state, "num");
    let rows = rendered(&state);
    assert_eq!(rows.first().map(String::as_str), Some("199"));
    assert_eq!(rows.len(), 15);
}

#[test]
fn scrolling_a_virtual_table_does_not_grow_the_document() {
    let (state, _) = start(large_page(200, "50"));
    let container = state.document().parent(by_id(&state, "big")).unwrap();
    let scroll = |state: EnhancerState, scroll_top: u32| {
        update(
            state,
            Msg::Scrolled {
                node: container,
                scroll_top,
            },
        )
        .0
    };

    let mut state = scroll(state, 400);
    let slots = state.document().capacity();
    for i in 0..1000u32 {
        state = scroll(state, 400 + (i * 37) % 3600);
    }
    assert_eq!(state.document().capacity(), slots);

    let state = scroll(state, 4000);
    let rows = rendered(&state);
    assert_eq!(rows.first().map(String::as_str), Some("95"));
    assert_eq!(rows.len(), 20);
}
