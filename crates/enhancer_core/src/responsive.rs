use crate::state::TimerPurpose;
use crate::table::declared_width;
use crate::{EnhancerConfig, EnhancerState, Effect, NodeId};

pub(crate) const ATTR_TEMPLATE: &str = "data-responsive-src";
const SIZE_TOKEN: &str = "{size}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub fn for_width(width: u32, config: &EnhancerConfig) -> Self {
        if width <= config.responsive_small_max_px {
            SizeTier::Small
        } else if width <= config.responsive_medium_max_px {
            SizeTier::Medium
        } else {
            SizeTier::Large
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
        }
    }
}

pub(crate) fn arm(state: &mut EnhancerState, scope: NodeId) {
    let images = state.doc.select(scope, |doc, node| {
        doc.tag(node) == Some("img") && doc.has_attr(node, ATTR_TEMPLATE)
    });
    for image in images {
        if !state.responsive.contains(&image) {
            state.responsive.push(image);
        }
        evaluate(state, image);
    }
}

/// Width the image is laid out at: host measurement, then declared width, then the window.
fn rendered_width(state: &EnhancerState, image: NodeId) -> u32 {
    state
        .measured_widths
        .get(&image)
        .copied()
        .or_else(|| {
            declared_width(&state.doc, image).map(|w| u32::try_from(w.max(0)).unwrap_or(0))
        })
        .unwrap_or(state.viewport_width)
}

pub(crate) fn evaluate(state: &mut EnhancerState, image: NodeId) {
    let Some(template) = state.doc.attr(image, ATTR_TEMPLATE) else {
        return;
    };
    let tier = SizeTier::for_width(rendered_width(state, image), &state.config);
    let src = template.replace(SIZE_TOKEN, tier.as_str());
    if state.doc.attr(image, "src") == Some(src.as_str()) {
        return;
    }
    state.doc.set_attr(image, "src", src);
    state.doc.set_attr(image, "data-responsive-size", tier.as_str());
    state.mark_dirty();
}

pub(crate) fn on_measured(state: &mut EnhancerState, node: NodeId, width: u32) {
    state.measured_widths.insert(node, width);
    if state.responsive.contains(&node) {
        evaluate(state, node);
    }
}

pub(crate) fn on_window_resized(state: &mut EnhancerState, width: u32, effects: &mut Vec<Effect>) {
    state.viewport_width = width;
    if let Some(timer_id) = state.resize_timer.take() {
        state.timers.remove(&timer_id);
        effects.push(Effect::CancelTimer { timer_id });
    }
    let timer_id = state.schedule(TimerPurpose::ResizeDebounce);
    state.resize_timer = Some(timer_id);
    effects.push(Effect::StartTimer {
        timer_id,
        delay: state.config.resize_debounce,
    });
}

pub(crate) fn on_resize_settled(state: &mut EnhancerState) {
    state.resize_timer = None;
    let images: Vec<NodeId> = state
        .responsive
        .iter()
        .copied()
        .filter(|image| state.doc.is_attached(*image))
        .collect();
    for image in images {
        evaluate(state, image);
    }
}

#[cfg(test)]
mod tests {
    use super::SizeTier;
    use crate::EnhancerConfig;

    #[test]
    fn tiers_follow_breakpoints() {
        let config = EnhancerConfig::default();
        assert_eq!(SizeTier::for_width(320, &config), SizeTier::Small);
        assert_eq!(SizeTier::for_width(400, &config), SizeTier::Small);
        assert_eq!(SizeTier::for_width(401, &config), SizeTier::Medium);
        assert_eq!(SizeTier::for_width(800, &config), SizeTier::Medium);
        assert_eq!(SizeTier::for_width(1200, &config), SizeTier::Large);
    }
}
