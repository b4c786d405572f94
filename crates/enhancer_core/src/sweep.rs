//! Periodic cleanup and removal bookkeeping.
//!
//! Every structural removal, whether done by the enhancer itself or reported by the page,
//! goes through [`on_removed`] so no observer or control outlives its node.

use std::collections::HashSet;

use enhancer_logging::{enhancer_debug, enhancer_info};

use crate::state::TimerPurpose;
use crate::{EnhancerState, Effect, NodeId};

pub(crate) fn start(state: &mut EnhancerState, effects: &mut Vec<Effect>) {
    let timer_id = state.schedule(TimerPurpose::Sweep);
    effects.push(Effect::StartTimer {
        timer_id,
        delay: state.config.sweep_interval,
    });
}

/// Runs the cleanup pass and re-arms the interval.
pub(crate) fn on_tick(state: &mut EnhancerState, effects: &mut Vec<Effect>) {
    state.sweep_runs += 1;
    // Nothing is cached, so the pass only reports.
    enhancer_info!(
        "periodic sweep #{}: {} observed, {} pending requests",
        state.sweep_runs,
        state.observed.len(),
        state.requests.len()
    );
    start(state, effects);
}

pub(crate) fn on_element_removed(state: &mut EnhancerState, node: NodeId, effects: &mut Vec<Effect>) {
    let removed = state.doc.remove(node);
    if removed.is_empty() {
        return;
    }
    on_removed(state, &removed, effects);
    state.mark_dirty();
}

/// Disconnects observers and drops per-control state for every node in `removed`.
pub(crate) fn on_removed(state: &mut EnhancerState, removed: &[NodeId], effects: &mut Vec<Effect>) {
    if removed.is_empty() {
        return;
    }
    let gone: HashSet<NodeId> = removed.iter().copied().collect();

    for node in removed {
        if state.observed.remove(node).is_some() {
            enhancer_debug!("disconnecting observer for removed node {:?}", node);
            effects.push(Effect::Unobserve { node: *node });
        }
    }

    let dead_forms: Vec<NodeId> = state
        .searches
        .values()
        .filter(|c| gone.contains(&c.form) || gone.contains(&c.input))
        .map(|c| c.form)
        .collect();
    for form in dead_forms {
        if let Some(control) = state.searches.remove(&form) {
            state.search_inputs.remove(&control.input);
            let timers = control
                .pending
                .into_iter()
                .chain(control.feedback.map(|f| f.timer));
            for timer_id in timers {
                state.timers.remove(&timer_id);
                effects.push(Effect::CancelTimer { timer_id });
            }
        }
    }

    state
        .pagers
        .retain(|button, pager| !gone.contains(button) && !gone.contains(&pager.container));
    state.progressive_containers.retain(|c| !gone.contains(c));
    state
        .sort_headers
        .retain(|header, entry| !gone.contains(header) && !gone.contains(&entry.table));
    state
        .virtual_tables
        .retain(|container, _| !gone.contains(container));
    state
        .resizers
        .retain(|handle, header| !gone.contains(handle) && !gone.contains(header));
    if state
        .drag
        .as_ref()
        .is_some_and(|d| gone.contains(&d.handle) || gone.contains(&d.header))
    {
        state.drag = None;
    }
    state.responsive.retain(|image| !gone.contains(image));
    state.measured_widths.retain(|node, _| !gone.contains(node));
}
