use crate::{Fragment, NodeId, RequestId, TimerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page finished loading; arm every component once.
    Initialize,
    /// Observer report for a node registered through `Effect::Observe`.
    Intersection { node: NodeId, is_intersecting: bool },
    /// Text field value changed.
    InputChanged { node: NodeId, value: String },
    KeyPressed { node: NodeId, key: Key },
    /// Element activated (click or keyboard activation).
    Clicked { node: NodeId },
    Scrolled { node: NodeId, scroll_top: u32 },
    /// Host layout reported the rendered width of an element.
    ElementMeasured { node: NodeId, width: u32 },
    WindowResized { width: u32 },
    PointerDown { node: NodeId, x: i64 },
    PointerMoved { x: i64 },
    PointerReleased,
    /// Page script removed an element from the document.
    ElementRemoved { node: NodeId },
    TimerFired { timer_id: TimerId },
    FetchCompleted {
        request_id: RequestId,
        result: Result<Fragment, FetchFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Other(String),
}

/// Transport-level failure reported by the host for a fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub reason: String,
}

impl FetchFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
