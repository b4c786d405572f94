//! JSON transcript of a driver run.

use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use enhancer_core::{Effect, EnhancerViewModel};
use serde::Serialize;

use crate::scenario::Step;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub generated_at: String,
    pub page: String,
    pub clock_ms: u64,
    pub steps: Vec<StepRecord>,
    pub submissions: Vec<Submission>,
    pub summary: Summary,
}

impl Transcript {
    pub fn new(
        page: impl Into<String>,
        generated_at: DateTime<Utc>,
        clock_ms: u64,
        steps: Vec<StepRecord>,
        submissions: Vec<Submission>,
        view: &EnhancerViewModel,
    ) -> Self {
        Self {
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            page: page.into(),
            clock_ms,
            steps,
            submissions,
            summary: Summary::from(view),
        }
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self).context("serializing transcript")
    }
}

/// One scenario step (or the initial page load, which has no step) and what it caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub index: u64,
    pub step: Option<Step>,
    pub at_ms: u64,
    pub changed_document: bool,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventRecord {
    Observe { node: usize, root_margin_px: u32 },
    Unobserve { node: usize },
    Fetch { request_id: u64, url: String },
    FetchSettled { request_id: u64, error: Option<String> },
    StartTimer { timer_id: u64, delay_ms: u64 },
    CancelTimer { timer_id: u64 },
    TimerFired { timer_id: u64 },
    SubmitForm { form: usize, url: String },
}

impl From<&Effect> for EventRecord {
    fn from(effect: &Effect) -> Self {
        match effect {
            Effect::Observe {
                node,
                root_margin_px,
            } => EventRecord::Observe {
                node: node.index(),
                root_margin_px: *root_margin_px,
            },
            Effect::Unobserve { node } => EventRecord::Unobserve { node: node.index() },
            Effect::Fetch {
                request_id, url, ..
            } => EventRecord::Fetch {
                request_id: request_id.0,
                url: url.clone(),
            },
            Effect::StartTimer { timer_id, delay } => EventRecord::StartTimer {
                timer_id: timer_id.0,
                delay_ms: u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            },
            Effect::CancelTimer { timer_id } => EventRecord::CancelTimer {
                timer_id: timer_id.0,
            },
            Effect::SubmitForm { form, url } => EventRecord::SubmitForm {
                form: form.index(),
                url: url.clone(),
            },
        }
    }
}

/// A regular form submission the page would have navigated to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub at_ms: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub observed: usize,
    pub search_forms: usize,
    pub pending_searches: usize,
    pub pagers: usize,
    pub sortable_headers: usize,
    pub virtual_tables: usize,
    pub column_resizers: usize,
    pub responsive_images: usize,
    pub active_timers: usize,
    pub pending_requests: usize,
    pub sweep_runs: u64,
    pub viewport_width: u32,
}

impl From<&EnhancerViewModel> for Summary {
    fn from(view: &EnhancerViewModel) -> Self {
        Self {
            observed: view.observed,
            search_forms: view.search_forms,
            pending_searches: view.pending_searches,
            pagers: view.pagers,
            sortable_headers: view.sortable_headers,
            virtual_tables: view.virtual_tables,
            column_resizers: view.column_resizers,
            responsive_images: view.responsive_images,
            active_timers: view.active_timers,
            pending_requests: view.pending_requests,
            sweep_runs: view.sweep_runs,
            viewport_width: view.viewport_width,
        }
    }
}
