mod common;

use common::{by_id, el, fetches, next_element, page, start, started_timers};
use enhancer_core::{update, EnhancerState, Fragment, Msg, NodeId};
use pretty_assertions::assert_eq;

fn list_page(items: usize, per_page: Option<&str>) -> enhancer_core::Document {
    let mut list = el("ul").attr("id", "list").attr("data-progressive-load", "");
    if let Some(per_page) = per_page {
        list = list.attr("data-items-per-page", per_page);
    }
    page(vec![
        list.children((0..items).map(|i| el("li").with_text(format!("Item {i}")))),
        el("footer").attr("id", "footer"),
    ])
}

fn visible_items(state: &EnhancerState) -> usize {
    let doc = state.document();
    doc.element_children(by_id(state, "list"))
        .into_iter()
        .filter(|item| !doc.has_class(*item, "progressive-hidden"))
        .count()
}

fn control(state: &EnhancerState) -> NodeId {
    next_element(state.document(), by_id(state, "list")).unwrap()
}

#[test]
fn forty_five_items_in_pages_of_twenty() {
    let (state, _) = start(list_page(45, Some("20")));
    let button = control(&state);
    assert!(state.document().has_class(button, "load-more-btn"));
    assert_eq!(visible_items(&state), 20);
    assert_eq!(
        state.document().text_content(button),
        "Load more (25 remaining)"
    );

    let (state, effects) = update(state, Msg::Clicked { node: button });
    assert!(effects.is_empty());
    assert_eq!(visible_items(&state), 40);
    assert_eq!(
        state.document().text_content(button),
        "Load more (5 remaining)"
    );

    let (state, _) = update(state, Msg::Clicked { node: button });
    assert_eq!(visible_items(&state), 45);
    assert!(!state.document().is_attached(button));
    assert_eq!(control(&state), by_id(&state, "footer"));
    assert_eq!(state.view().pagers, 0);

    // The detached control does nothing further.
    let (state, _) = update(state, Msg::Clicked { node: button });
    assert_eq!(visible_items(&state), 45);
}

#[test]
fn activations_needed_is_ceiling_of_pages_minus_one() {
    for (items, per_page) in [(10usize, 3usize), (12, 4), (21, 20), (100, 7)] {
        let (mut state, _) = start(list_page(items, Some(&per_page.to_string())));
        let button = control(&state);
        let clicks = items.div_ceil(per_page) - 1;
        for i in 0..clicks {
            assert_eq!(visible_items(&state), per_page * (i + 1));
            let (next, _) = update(state, Msg::Clicked { node: button });
            state = next;
        }
        assert_eq!(visible_items(&state), items);
        assert!(!state.document().is_attached(button));
    }
}

#[test]
fn short_list_gets_no_control_and_default_page_size_applies() {
    let (state, _) = start(list_page(20, None));
    assert_eq!(visible_items(&state), 20);
    assert_eq!(control(&state), by_id(&state, "footer"));

    let (state, _) = start(list_page(21, Some("zero")));
    assert_eq!(visible_items(&state), 20);
    assert_eq!(state.view().pagers, 1);
}

fn items(count: usize) -> Vec<enhancer_core::FragmentNode> {
    (0..count)
        .map(|i| el("li").with_text(format!("Result {i}")))
        .collect()
}

#[test]
fn search_results_replacing_a_paged_list_are_paged_again() {
    let (state, _) = start(page(vec![
        el("form")
            .attr("id", "search")
            .attr("action", "/search")
            .attr("data-search-debounce", "300")
            .attr("data-ajax-search", "")
            .attr("data-results-target", "#list")
            .child(el("input").attr("id", "q").attr("name", "q")),
        el("ul")
            .attr("id", "list")
            .attr("data-progressive-load", "")
            .attr("data-items-per-page", "2")
            .children(items(5)),
    ]));
    let old_button = control(&state);
    assert_eq!(
        state.document().text_content(old_button),
        "Load more (3 remaining)"
    );

    let q = by_id(&state, "q");
    let (state, effects) = update(
        state,
        Msg::InputChanged {
            node: q,
            value: "tea".to_string(),
        },
    );
    let timer_id = started_timers(&effects)[0].0;
    let (state, effects) = update(state, Msg::TimerFired { timer_id });
    let request_id = fetches(&effects)[0].0;
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: Ok(Fragment::new(items(7))),
        },
    );

    assert!(!state.document().is_attached(old_button));
    assert_eq!(state.view().pagers, 1);
    assert_eq!(visible_items(&state), 2);
    let button = control(&state);
    assert_ne!(button, old_button);
    assert_eq!(
        state.document().text_content(button),
        "Load more (5 remaining)"
    );

    // The stale control is gone for good; the new one pages the new results.
    let (state, _) = update(state, Msg::Clicked { node: old_button });
    assert_eq!(visible_items(&state), 2);
    let (state, _) = update(state, Msg::Clicked { node: button });
    assert_eq!(visible_items(&state), 4);
}

#[test]
fn lazy_content_replacing_a_paged_block_is_paged_again() {
    let (state, effects) = start(page(vec![el("ul")
        .attr("id", "list")
        .attr("data-lazy-content", "/more.html")
        .attr("data-progressive-load", "")
        .attr("data-items-per-page", "2")
        .children(items(3))]));
    let old_button = control(&state);
    assert!(common::observed(&effects).contains(&by_id(&state, "list")));

    let list = by_id(&state, "list");
    let (state, effects) = update(
        state,
        Msg::Intersection {
            node: list,
            is_intersecting: true,
        },
    );
    let request_id = fetches(&effects)[0].0;
    let (state, _) = update(
        state,
        Msg::FetchCompleted {
            request_id,
            result: Ok(Fragment::new(items(6))),
        },
    );

    assert!(!state.document().is_attached(old_button));
    assert_eq!(state.view().pagers, 1);
    assert_eq!(visible_items(&state), 2);
    assert_eq!(
        state.document().text_content(control(&state)),
        "Load more (4 remaining)"
    );
}
