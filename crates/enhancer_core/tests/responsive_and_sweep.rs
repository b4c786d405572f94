mod common;

use std::time::Duration;

use common::{by_id, el, page, start, started_timers};
use enhancer_core::{update, Effect, EnhancerState, Key, Msg, TimerId};
use pretty_assertions::assert_eq;

fn mixed_page() -> enhancer_core::Document {
    page(vec![
        el("img")
            .attr("id", "banner")
            .attr("data-responsive-src", "/img/banner-{size}.jpg"),
        el("img")
            .attr("id", "thumb")
            .attr("width", "240")
            .attr("data-responsive-src", "/img/thumb-{size}.jpg"),
        el("section").attr("id", "gallery").child(
            el("img")
                .attr("id", "lazy")
                .attr("data-src", "/img/lazy.jpg"),
        ),
        el("form")
            .attr("id", "search")
            .attr("data-search-debounce", "")
            .child(el("input").attr("id", "q").attr("name", "q")),
    ])
}

fn sweep_timer(effects: &[Effect]) -> TimerId {
    started_timers(effects)
        .into_iter()
        .find(|(_, delay)| *delay == Duration::from_secs(300))
        .map(|(id, _)| id)
        .expect("sweep timer")
}

fn src(state: &EnhancerState, id: &str) -> String {
    state
        .document()
        .attr(by_id(state, id), "src")
        .unwrap_or_default()
        .to_string()
}

#[test]
fn initial_tier_uses_declared_width_then_window_width() {
    let (state, _) = start(mixed_page());
    assert_eq!(src(&state, "banner"), "/img/banner-large.jpg");
    assert_eq!(src(&state, "thumb"), "/img/thumb-small.jpg");
    assert_eq!(state.view().responsive_images, 2);
}

#[test]
fn window_resize_is_debounced_before_re_evaluating() {
    let (state, _) = start(mixed_page());

    let (state, effects) = update(state, Msg::WindowResized { width: 700 });
    let first = started_timers(&effects);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].1, Duration::from_millis(250));
    assert_eq!(src(&state, "banner"), "/img/banner-large.jpg");

    let (state, effects) = update(state, Msg::WindowResized { width: 360 });
    assert_eq!(effects[0], Effect::CancelTimer { timer_id: first[0].0 });
    let settled = started_timers(&effects)[0].0;

    let (state, _) = update(state, Msg::TimerFired { timer_id: first[0].0 });
    assert_eq!(src(&state, "banner"), "/img/banner-large.jpg");

    let (state, _) = update(state, Msg::TimerFired { timer_id: settled });
    assert_eq!(src(&state, "banner"), "/img/banner-small.jpg");
    assert_eq!(state.view().viewport_width, 360);
    let banner = by_id(&state, "banner");
    assert_eq!(
        state.document().attr(banner, "data-responsive-size"),
        Some("small")
    );
}

#[test]
fn measured_width_takes_precedence() {
    let (state, _) = start(mixed_page());
    let thumb = by_id(&state, "thumb");
    let (state, _) = update(state, Msg::ElementMeasured { node: thumb, width: 640 });
    assert_eq!(src(&state, "thumb"), "/img/thumb-medium.jpg");
}

#[test]
fn sweep_runs_on_interval_and_rearms() {
    let (state, effects) = start(mixed_page());
    let timer = sweep_timer(&effects);

    let (state, effects) = update(state, Msg::TimerFired { timer_id: timer });
    let next = sweep_timer(&effects);
    assert_ne!(next, timer);
    assert_eq!(state.view().sweep_runs, 1);

    let (state, _) = update(state, Msg::TimerFired { timer_id: next });
    assert_eq!(state.view().sweep_runs, 2);
}

#[test]
fn removing_an_element_disconnects_its_observers() {
    let (state, _) = start(mixed_page());
    let gallery = by_id(&state, "gallery");
    let lazy = by_id(&state, "lazy");
    assert_eq!(state.view().observed, 1);

    let (state, effects) = update(state, Msg::ElementRemoved { node: gallery });
    assert_eq!(effects, vec![Effect::Unobserve { node: lazy }]);
    assert_eq!(state.view().observed, 0);

    let (state, effects) = update(
        state,
        Msg::Intersection {
            node: lazy,
            is_intersecting: true,
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.document().attr(lazy, "src"), None);
}

#[test]
fn removing_a_search_form_cancels_its_pending_timer() {
    let (state, _) = start(mixed_page());
    let q = by_id(&state, "q");
    let form = by_id(&state, "search");
    let (state, effects) = update(
        state,
        Msg::InputChanged {
            node: q,
            value: "socks".to_string(),
        },
    );
    let (pending, delay) = started_timers(&effects)[0];
    assert_eq!(delay, Duration::from_millis(300));

    let (state, effects) = update(state, Msg::ElementRemoved { node: form });
    assert_eq!(effects, vec![Effect::CancelTimer { timer_id: pending }]);
    assert_eq!(state.view().search_forms, 0);

    let (_, effects) = update(
        state,
        Msg::KeyPressed {
            node: q,
            key: Key::Enter,
        },
    );
    assert!(effects.is_empty());
}

#[test]
fn initialize_only_runs_once() {
    let (state, _) = start(mixed_page());
    let before = state.document().clone();
    let (state, effects) = update(state, Msg::Initialize);
    assert!(effects.is_empty());
    assert_eq!(state.document(), &before);
    assert_eq!(
        state
            .document()
            .select(state.document().root(), |d, n| d.tag(n) == Some("style"))
            .len(),
        1
    );
}
