//! Debounced search forms.
//!
//! Each form owns one [`SearchControl`]. Keystrokes replace the pending debounce timer, so
//! only the last value within the delay window fires. Enter fires at once.

use std::time::Duration;

use enhancer_logging::{enhancer_debug, enhancer_info, enhancer_warn};

use crate::state::{RequestPurpose, TimerPurpose};
use crate::{
    urls, Document, EnhancerState, Effect, FetchFailure, Fragment, FragmentScope, Key, NodeId,
    TimerId,
};

pub(crate) const ATTR_DEBOUNCE: &str = "data-search-debounce";
pub(crate) const ATTR_AJAX: &str = "data-ajax-search";
pub(crate) const ATTR_RESULTS_TARGET: &str = "data-results-target";

const SEARCHING_LABEL: &str = "Searching...";
const ERROR_CLASS: &str = "search-error";
const ERROR_MESSAGE: &str = "Search failed. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchControl {
    pub form: NodeId,
    pub input: NodeId,
    pub submit: Option<NodeId>,
    pub delay: Duration,
    pub ajax: bool,
    pub results_target: String,
    pub pending: Option<TimerId>,
    pub feedback: Option<SubmitFeedback>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmitFeedback {
    pub timer: TimerId,
    pub original_label: String,
}

pub(crate) fn arm(state: &mut EnhancerState, scope: NodeId) {
    let forms = state.doc.select(scope, |doc, node| {
        doc.tag(node) == Some("form") && doc.has_attr(node, ATTR_DEBOUNCE)
    });
    for form in forms {
        if state.searches.contains_key(&form) {
            continue;
        }
        let Some(input) = state.doc.select_first(form, is_query_input) else {
            enhancer_debug!("search form {:?} has no text input", form);
            continue;
        };
        let delay = state
            .doc
            .attr(form, ATTR_DEBOUNCE)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(state.config.search_debounce);
        let ajax = state
            .doc
            .attr(form, ATTR_AJAX)
            .map(|v| !v.eq_ignore_ascii_case("false"))
            .unwrap_or(false);
        let results_target = state
            .doc
            .attr(form, ATTR_RESULTS_TARGET)
            .map(|v| v.trim().trim_start_matches('#').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| state.config.default_results_target.clone());
        let submit = state.doc.select_first(form, is_submit_control);

        state.search_inputs.insert(input, form);
        state.searches.insert(
            form,
            SearchControl {
                form,
                input,
                submit,
                delay,
                ajax,
                results_target,
                pending: None,
                feedback: None,
            },
        );
    }
}

fn is_query_input(doc: &Document, node: NodeId) -> bool {
    doc.tag(node) == Some("input")
        && matches!(
            doc.attr(node, "type").map(str::to_ascii_lowercase).as_deref(),
            None | Some("search") | Some("text")
        )
}

fn is_submit_control(doc: &Document, node: NodeId) -> bool {
    let kind = doc.attr(node, "type").map(str::to_ascii_lowercase);
    match doc.tag(node) {
        Some("button") => matches!(kind.as_deref(), None | Some("submit")),
        Some("input") => kind.as_deref() == Some("submit"),
        _ => false,
    }
}

pub(crate) fn on_input(
    state: &mut EnhancerState,
    node: NodeId,
    value: String,
    effects: &mut Vec<Effect>,
) {
    state.doc.set_attr(node, "value", value);
    state.mark_dirty();
    let Some(form) = state.search_inputs.get(&node).copied() else {
        return;
    };
    cancel_pending(state, form, effects);
    let Some(delay) = state.searches.get(&form).map(|c| c.delay) else {
        return;
    };
    let timer_id = state.schedule(TimerPurpose::SearchDebounce { form });
    if let Some(control) = state.searches.get_mut(&form) {
        control.pending = Some(timer_id);
    }
    effects.push(Effect::StartTimer { timer_id, delay });
}

pub(crate) fn on_key(state: &mut EnhancerState, node: NodeId, key: Key, effects: &mut Vec<Effect>) {
    if key != Key::Enter {
        return;
    }
    let Some(form) = state.search_inputs.get(&node).copied() else {
        return;
    };
    cancel_pending(state, form, effects);
    fire(state, form, effects);
}

fn cancel_pending(state: &mut EnhancerState, form: NodeId, effects: &mut Vec<Effect>) {
    let pending = state
        .searches
        .get_mut(&form)
        .and_then(|control| control.pending.take());
    if let Some(timer_id) = pending {
        state.timers.remove(&timer_id);
        effects.push(Effect::CancelTimer { timer_id });
    }
}

pub(crate) fn on_debounce_elapsed(
    state: &mut EnhancerState,
    form: NodeId,
    timer_id: TimerId,
    effects: &mut Vec<Effect>,
) {
    let Some(control) = state.searches.get_mut(&form) else {
        return;
    };
    if control.pending != Some(timer_id) {
        return;
    }
    control.pending = None;
    let input = control.input;
    let query_len = state
        .doc
        .attr(input, "value")
        .map(|v| v.trim().chars().count())
        .unwrap_or(0);
    if query_len == 0 || query_len >= state.config.search_min_query_len {
        fire(state, form, effects);
    } else {
        enhancer_debug!("search query of length {} ignored", query_len);
    }
}

fn fire(state: &mut EnhancerState, form: NodeId, effects: &mut Vec<Effect>) {
    let Some(control) = state.searches.get(&form).cloned() else {
        return;
    };
    let action = state.doc.attr(form, "action").unwrap_or("").to_string();
    let target = urls::resolve(state.config.base_url.as_deref(), &action);
    let url = urls::with_query(&target, &serialize_form(&state.doc, form));

    start_feedback(state, &control, effects);

    let container = if control.ajax {
        let found = state.doc.element_by_id(&control.results_target);
        if found.is_none() {
            enhancer_warn!(
                "results target #{} missing; submitting form normally",
                control.results_target
            );
        }
        found
    } else {
        None
    };

    match container {
        Some(container) => {
            state.doc.add_class(container, crate::lazy::CLASS_LOADING);
            state.mark_dirty();
            let request_id = state.begin_request(RequestPurpose::SearchResults { container });
            enhancer_info!("search fetch {}", url);
            effects.push(Effect::Fetch {
                request_id,
                url,
                scope: FragmentScope::ElementById(control.results_target.clone()),
            });
        }
        None => {
            enhancer_info!("search submit {}", url);
            effects.push(Effect::SubmitForm { form, url });
        }
    }
}

fn start_feedback(state: &mut EnhancerState, control: &SearchControl, effects: &mut Vec<Effect>) {
    let Some(submit) = control.submit else {
        return;
    };
    if control.feedback.is_some() {
        return;
    }
    let original_label = control_label(&state.doc, submit);
    state.doc.set_attr(submit, "disabled", "");
    set_control_label(&mut state.doc, submit, SEARCHING_LABEL);
    state.mark_dirty();

    let timer_id = state.schedule(TimerPurpose::RestoreSubmit { form: control.form });
    if let Some(stored) = state.searches.get_mut(&control.form) {
        stored.feedback = Some(SubmitFeedback {
            timer: timer_id,
            original_label,
        });
    }
    effects.push(Effect::StartTimer {
        timer_id,
        delay: state.config.submit_feedback,
    });
}

pub(crate) fn restore_submit(state: &mut EnhancerState, form: NodeId) {
    let Some(control) = state.searches.get_mut(&form) else {
        return;
    };
    let (Some(submit), Some(feedback)) = (control.submit, control.feedback.take()) else {
        return;
    };
    state.doc.remove_attr(submit, "disabled");
    set_control_label(&mut state.doc, submit, &feedback.original_label);
    state.mark_dirty();
}

fn control_label(doc: &Document, node: NodeId) -> String {
    if doc.tag(node) == Some("input") {
        doc.attr(node, "value").unwrap_or("").to_string()
    } else {
        doc.text_content(node)
    }
}

fn set_control_label(doc: &mut Document, node: NodeId, label: &str) {
    if doc.tag(node) == Some("input") {
        doc.set_attr(node, "value", label);
    } else {
        doc.set_text_content(node, label);
    }
}

/// Name/value pairs a GET submission of `form` would send, in document order.
pub(crate) fn serialize_form(doc: &Document, form: NodeId) -> Vec<(String, String)> {
    let fields = doc.select(form, |doc, node| {
        matches!(doc.tag(node), Some("input" | "select" | "textarea"))
            && doc.has_attr(node, "name")
            && !doc.has_attr(node, "disabled")
    });
    let mut pairs = Vec::new();
    for field in fields {
        let Some(name) = doc.attr(field, "name") else {
            continue;
        };
        let value = match doc.tag(field) {
            Some("select") => selected_option(doc, field),
            Some("textarea") => Some(
                doc.attr(field, "value")
                    .map(str::to_string)
                    .unwrap_or_else(|| doc.text_content(field)),
            ),
            _ => input_value(doc, field),
        };
        if let Some(value) = value {
            pairs.push((name.to_string(), value));
        }
    }
    pairs
}

fn input_value(doc: &Document, node: NodeId) -> Option<String> {
    let kind = doc
        .attr(node, "type")
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| "text".to_string());
    match kind.as_str() {
        "submit" | "button" | "reset" | "file" | "image" => None,
        "checkbox" | "radio" => doc
            .has_attr(node, "checked")
            .then(|| doc.attr(node, "value").unwrap_or("on").to_string()),
        _ => Some(doc.attr(node, "value").unwrap_or("").to_string()),
    }
}

fn selected_option(doc: &Document, select: NodeId) -> Option<String> {
    let options = doc.select(select, |doc, node| doc.tag(node) == Some("option"));
    let chosen = options
        .iter()
        .copied()
        .find(|o| doc.has_attr(*o, "selected"))
        .or_else(|| options.first().copied())?;
    Some(
        doc.attr(chosen, "value")
            .map(str::to_string)
            .unwrap_or_else(|| doc.text_content(chosen).trim().to_string()),
    )
}

pub(crate) fn on_results(
    state: &mut EnhancerState,
    container: NodeId,
    result: Result<Fragment, FetchFailure>,
    effects: &mut Vec<Effect>,
) {
    if !state.doc.is_attached(container) {
        enhancer_debug!("search results for detached container {:?} dropped", container);
        return;
    }
    state.doc.remove_class(container, crate::lazy::CLASS_LOADING);
    let removed = state.doc.clear_children(container);
    crate::sweep::on_removed(state, &removed, effects);
    crate::pager::release(state, container, effects);
    match result {
        Ok(fragment) => {
            state.doc.append_fragment(container, &fragment);
            crate::rearm(state, container, effects);
        }
        Err(failure) => {
            enhancer_warn!("search request failed: {}", failure.reason);
            let message = state.doc.create_element("div");
            state.doc.add_class(message, ERROR_CLASS);
            state.doc.set_text_content(message, ERROR_MESSAGE);
            state.doc.append_child(container, message);
        }
    }
    state.mark_dirty();
}
