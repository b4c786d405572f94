use enhancer_logging::{enhancer_debug, enhancer_info, enhancer_trace};

use crate::state::{RequestPurpose, TimerPurpose};
use crate::{lazy, pager, responsive, search, styles, sweep, table};
use crate::{EnhancerState, Effect, Msg, NodeId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: EnhancerState, msg: Msg) -> (EnhancerState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::Initialize => initialize(&mut state, &mut effects),
        Msg::Intersection {
            node,
            is_intersecting,
        } => lazy::on_intersection(&mut state, node, is_intersecting, &mut effects),
        Msg::InputChanged { node, value } => search::on_input(&mut state, node, value, &mut effects),
        Msg::KeyPressed { node, key } => search::on_key(&mut state, node, key, &mut effects),
        Msg::Clicked { node } => {
            if state.pagers.contains_key(&node) {
                pager::on_click(&mut state, node, &mut effects);
            } else if !table::on_header_click(&mut state, node, &mut effects) {
                enhancer_trace!("click on {:?} ignored", node);
            }
        }
        Msg::Scrolled { node, scroll_top } => {
            table::on_scroll(&mut state, node, scroll_top, &mut effects);
        }
        Msg::ElementMeasured { node, width } => responsive::on_measured(&mut state, node, width),
        Msg::WindowResized { width } => {
            responsive::on_window_resized(&mut state, width, &mut effects)
        }
        Msg::PointerDown { node, x } => table::on_pointer_down(&mut state, node, x),
        Msg::PointerMoved { x } => table::on_pointer_moved(&mut state, x),
        Msg::PointerReleased => table::on_pointer_released(&mut state),
        Msg::ElementRemoved { node } => sweep::on_element_removed(&mut state, node, &mut effects),
        Msg::TimerFired { timer_id } => match state.timers.remove(&timer_id) {
            Some(TimerPurpose::SearchDebounce { form }) => {
                search::on_debounce_elapsed(&mut state, form, timer_id, &mut effects)
            }
            Some(TimerPurpose::RestoreSubmit { form }) => search::restore_submit(&mut state, form),
            Some(TimerPurpose::ResizeDebounce) => {
                if state.resize_timer == Some(timer_id) {
                    responsive::on_resize_settled(&mut state);
                }
            }
            Some(TimerPurpose::Sweep) => sweep::on_tick(&mut state, &mut effects),
            None => enhancer_debug!("stale timer {:?} ignored", timer_id),
        },
        Msg::FetchCompleted { request_id, result } => match state.requests.remove(&request_id) {
            Some(RequestPurpose::LazyContent { node }) => {
                lazy::on_content_loaded(&mut state, node, result, &mut effects)
            }
            Some(RequestPurpose::SearchResults { container }) => {
                search::on_results(&mut state, container, result, &mut effects)
            }
            None => enhancer_debug!("unknown request {:?} ignored", request_id),
        },
        Msg::NoOp => {}
    }

    (state, effects)
}

fn initialize(state: &mut EnhancerState, effects: &mut Vec<Effect>) {
    if state.initialized {
        return;
    }
    state.initialized = true;
    let root = state.doc.root();

    styles::inject(state);
    lazy::arm(state, root, effects);
    search::arm(state, root);
    pager::arm(state, root);
    table::arm(state, root, effects);
    responsive::arm(state, root);
    sweep::start(state, effects);

    let view = state.view();
    enhancer_info!(
        "page enhancer ready: {} lazy, {} search forms, {} pagers, {} sortable headers, {} virtual tables, {} responsive images",
        view.observed,
        view.search_forms,
        view.pagers,
        view.sortable_headers,
        view.virtual_tables,
        view.responsive_images
    );
}

/// Re-arms lazy loading and progressive paging on freshly inserted content.
pub(crate) fn rearm(state: &mut EnhancerState, scope: NodeId, effects: &mut Vec<Effect>) {
    lazy::arm(state, scope, effects);
    pager::arm(state, scope);
}
