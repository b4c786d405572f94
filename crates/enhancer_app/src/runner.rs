//! Plays scenario steps through the enhancer and carries out the effects it asks for.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use enhancer_core::{
    update, Document, Effect, EnhancerConfig, EnhancerState, FetchFailure, Msg, NodeId, RequestId,
};
use enhancer_engine::{EngineEvent, EngineHandle, ManualClock};
use enhancer_logging::{enhancer_debug, enhancer_info, enhancer_warn};

use crate::report::{EventRecord, StepRecord, Submission, Transcript};
use crate::scenario::{resolve, Step};

const SCROLL_CONTAINER_CLASS: &str = "virtual-scroll-container";

pub struct Driver {
    state: EnhancerState,
    clock: ManualClock,
    engine: EngineHandle,
    settle_timeout: Duration,
    observed: BTreeMap<NodeId, u32>,
    in_flight: BTreeSet<RequestId>,
    submissions: Vec<Submission>,
    steps: Vec<StepRecord>,
}

impl Driver {
    pub fn new(
        doc: Document,
        config: EnhancerConfig,
        engine: EngineHandle,
        settle_timeout: Duration,
    ) -> Self {
        Self {
            state: EnhancerState::new(doc, config),
            clock: ManualClock::new(),
            engine,
            settle_timeout,
            observed: BTreeMap::new(),
            in_flight: BTreeSet::new(),
            submissions: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn state(&self) -> &EnhancerState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        self.state.document()
    }

    pub fn is_observed(&self, node: NodeId) -> bool {
        self.observed.contains_key(&node)
    }

    pub fn pending_timers(&self) -> usize {
        self.clock.pending()
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.clock.now().as_millis()).unwrap_or(u64::MAX)
    }

    /// Arms the enhancer on the loaded page.
    pub fn initialize(&mut self) {
        self.begin(None);
        self.dispatch(Msg::Initialize);
        self.settle_fetches();
        self.finish_step();
    }

    pub fn play(&mut self, step: &Step) -> anyhow::Result<()> {
        self.begin(Some(step.clone()));
        match step {
            Step::Intersect { target, visible } => {
                let node = self.target(target)?;
                if self.observed.contains_key(&node) {
                    self.dispatch(Msg::Intersection {
                        node,
                        is_intersecting: *visible,
                    });
                } else {
                    enhancer_warn!("'{}' is not observed; intersection dropped", target);
                }
            }
            Step::Input { target, value } => {
                let node = self.target(target)?;
                self.dispatch(Msg::InputChanged {
                    node,
                    value: value.clone(),
                });
            }
            Step::Key { target, .. } => {
                let node = self.target(target)?;
                if let Some(key) = step.key() {
                    self.dispatch(Msg::KeyPressed { node, key });
                }
            }
            Step::Click { target } => {
                let node = self.target(target)?;
                self.dispatch(Msg::Clicked { node });
            }
            Step::Scroll { target, top } => {
                let node = self.target(target)?;
                let node = self.scroll_container(node);
                self.dispatch(Msg::Scrolled {
                    node,
                    scroll_top: *top,
                });
            }
            Step::Measure { target, width } => {
                let node = self.target(target)?;
                self.dispatch(Msg::ElementMeasured {
                    node,
                    width: *width,
                });
            }
            Step::Resize { width } => self.dispatch(Msg::WindowResized { width: *width }),
            Step::Drag { target, from, to } => {
                let node = self.target(target)?;
                self.dispatch(Msg::PointerDown { node, x: *from });
                self.dispatch(Msg::PointerMoved { x: *to });
                self.dispatch(Msg::PointerReleased);
            }
            Step::Remove { target } => {
                let node = self.target(target)?;
                self.dispatch(Msg::ElementRemoved { node });
            }
            Step::Advance(ms) => self.advance(Duration::from_millis(*ms)),
        }
        self.settle_fetches();
        self.finish_step();
        Ok(())
    }

    /// Final page markup and the run transcript.
    pub fn finish(self, page: &str, generated_at: DateTime<Utc>) -> (String, Transcript) {
        enhancer_logging::clear_step();
        let html = self.state.document().to_html();
        let clock_ms = self.now_ms();
        let transcript = Transcript::new(
            page,
            generated_at,
            clock_ms,
            self.steps,
            self.submissions,
            &self.state.view(),
        );
        (html, transcript)
    }

    fn target(&self, target: &str) -> anyhow::Result<NodeId> {
        resolve(self.state.document(), target)
    }

    /// Scroll events land on the nearest scroll container around the target.
    fn scroll_container(&self, node: NodeId) -> NodeId {
        let doc = self.state.document();
        let mut current = Some(node);
        while let Some(id) = current {
            if doc.has_class(id, SCROLL_CONTAINER_CLASS) {
                return id;
            }
            current = doc.parent(id);
        }
        node
    }

    fn advance(&mut self, by: Duration) {
        let deadline = self.clock.now() + by;
        while let Some(timer_id) = self.clock.pop_due(deadline) {
            self.record(EventRecord::TimerFired {
                timer_id: timer_id.0,
            });
            self.dispatch(Msg::TimerFired { timer_id });
            self.settle_fetches();
        }
        self.clock.settle(deadline);
    }

    fn begin(&mut self, step: Option<Step>) {
        let index = self.steps.len() as u64;
        enhancer_logging::set_step(index);
        if let Some(step) = &step {
            enhancer_debug!("{:?}", step);
        }
        let at_ms = self.now_ms();
        self.steps.push(StepRecord {
            index,
            step,
            at_ms,
            changed_document: false,
            events: Vec::new(),
        });
    }

    fn finish_step(&mut self) {
        let changed = self.state.consume_dirty();
        if let Some(record) = self.steps.last_mut() {
            record.changed_document = changed;
        }
    }

    fn record(&mut self, event: EventRecord) {
        if let Some(record) = self.steps.last_mut() {
            record.events.push(event);
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        self.record(EventRecord::from(&effect));
        match effect {
            Effect::Observe {
                node,
                root_margin_px,
            } => {
                self.observed.insert(node, root_margin_px);
            }
            Effect::Unobserve { node } => {
                self.observed.remove(&node);
            }
            Effect::Fetch {
                request_id,
                url,
                scope,
            } => {
                self.in_flight.insert(request_id);
                self.engine.fetch(request_id, url, scope);
            }
            Effect::StartTimer { timer_id, delay } => self.clock.schedule(timer_id, delay),
            Effect::CancelTimer { timer_id } => {
                self.clock.cancel(timer_id);
            }
            Effect::SubmitForm { form, url } => {
                enhancer_info!("form {:?} navigates to {}", form, url);
                let at_ms = self.now_ms();
                self.submissions.push(Submission { at_ms, url });
            }
        }
    }

    /// Waits for every outstanding fetch and feeds the completions back in.
    fn settle_fetches(&mut self) {
        while !self.in_flight.is_empty() {
            match self.engine.recv_timeout(self.settle_timeout) {
                Some(EngineEvent::FetchCompleted { request_id, result }) => {
                    if !self.in_flight.remove(&request_id) {
                        continue;
                    }
                    self.record(EventRecord::FetchSettled {
                        request_id: request_id.0,
                        error: result.as_ref().err().map(ToString::to_string),
                    });
                    self.dispatch(Msg::FetchCompleted {
                        request_id,
                        result: result.map_err(FetchFailure::from),
                    });
                }
                None => {
                    for request_id in std::mem::take(&mut self.in_flight) {
                        enhancer_warn!("request {:?} did not settle in time", request_id);
                        let failure = FetchFailure::new("no response before the settle timeout");
                        self.record(EventRecord::FetchSettled {
                            request_id: request_id.0,
                            error: Some(failure.reason.clone()),
                        });
                        self.dispatch(Msg::FetchCompleted {
                            request_id,
                            result: Err(failure),
                        });
                    }
                }
            }
        }
    }
}
