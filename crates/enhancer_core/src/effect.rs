use std::time::Duration;

use crate::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

/// Work the host must perform on behalf of the enhancer. Results come back as [`crate::Msg`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start reporting viewport intersections for `node`, expanded by `root_margin_px`.
    Observe { node: NodeId, root_margin_px: u32 },
    Unobserve { node: NodeId },
    /// Plain GET; the response is parsed and narrowed by `scope` before it comes back.
    Fetch {
        request_id: RequestId,
        url: String,
        scope: FragmentScope,
    },
    StartTimer { timer_id: TimerId, delay: Duration },
    CancelTimer { timer_id: TimerId },
    /// Regular (navigating) form submission.
    SubmitForm { form: NodeId, url: String },
}

/// Which part of a fetched document should be handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentScope {
    /// Body content of a full page, or the whole fragment.
    Body,
    /// Children of the element with this id, falling back to [`FragmentScope::Body`].
    ElementById(String),
}
