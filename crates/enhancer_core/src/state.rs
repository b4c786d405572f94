use std::collections::{HashMap, HashSet};
use std::ops::Range;

use crate::lazy::LazyKind;
use crate::pager::Pager;
use crate::search::SearchControl;
use crate::table::{ColumnDrag, SortDirection, SortHeader, VirtualTable};
use crate::view_model::EnhancerViewModel;
use crate::{Document, EnhancerConfig, NodeId, RequestId, TimerId};

/// What a scheduled timer is for. Fired timers without an entry are stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerPurpose {
    SearchDebounce { form: NodeId },
    RestoreSubmit { form: NodeId },
    ResizeDebounce,
    Sweep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RequestPurpose {
    LazyContent { node: NodeId },
    SearchResults { container: NodeId },
}

/// Everything the enhancer knows about the page. Owned by a single writer: [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerState {
    pub(crate) doc: Document,
    pub(crate) config: EnhancerConfig,
    pub(crate) initialized: bool,
    pub(crate) observed: HashMap<NodeId, LazyKind>,
    pub(crate) searches: HashMap<NodeId, SearchControl>,
    pub(crate) search_inputs: HashMap<NodeId, NodeId>,
    pub(crate) pagers: HashMap<NodeId, Pager>,
    pub(crate) progressive_containers: HashSet<NodeId>,
    pub(crate) sort_headers: HashMap<NodeId, SortHeader>,
    pub(crate) virtual_tables: HashMap<NodeId, VirtualTable>,
    pub(crate) resizers: HashMap<NodeId, NodeId>,
    pub(crate) drag: Option<ColumnDrag>,
    pub(crate) responsive: Vec<NodeId>,
    pub(crate) measured_widths: HashMap<NodeId, u32>,
    pub(crate) viewport_width: u32,
    pub(crate) resize_timer: Option<TimerId>,
    pub(crate) timers: HashMap<TimerId, TimerPurpose>,
    pub(crate) requests: HashMap<RequestId, RequestPurpose>,
    pub(crate) sweep_runs: u64,
    next_timer: u64,
    next_request: u64,
    dirty: bool,
}

impl Default for EnhancerState {
    fn default() -> Self {
        Self::new(Document::new(), EnhancerConfig::default())
    }
}

impl EnhancerState {
    pub fn new(doc: Document, config: EnhancerConfig) -> Self {
        let viewport_width = config.viewport_width;
        Self {
            doc,
            config,
            initialized: false,
            observed: HashMap::new(),
            searches: HashMap::new(),
            search_inputs: HashMap::new(),
            pagers: HashMap::new(),
            progressive_containers: HashSet::new(),
            sort_headers: HashMap::new(),
            virtual_tables: HashMap::new(),
            resizers: HashMap::new(),
            drag: None,
            responsive: Vec::new(),
            measured_widths: HashMap::new(),
            viewport_width,
            resize_timer: None,
            timers: HashMap::new(),
            requests: HashMap::new(),
            sweep_runs: 0,
            next_timer: 0,
            next_request: 0,
            dirty: false,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &EnhancerConfig {
        &self.config
    }

    /// Row range currently rendered by the virtual scroll container `container`.
    pub fn virtual_window(&self, container: NodeId) -> Option<Range<usize>> {
        self.virtual_tables.get(&container).map(|vt| vt.window.clone())
    }

    pub fn sort_direction(&self, header: NodeId) -> Option<SortDirection> {
        self.sort_headers.get(&header).and_then(|h| h.direction)
    }

    pub fn view(&self) -> EnhancerViewModel {
        EnhancerViewModel {
            initialized: self.initialized,
            observed: self.observed.len(),
            search_forms: self.searches.len(),
            pending_searches: self
                .searches
                .values()
                .filter(|control| control.pending.is_some())
                .count(),
            pagers: self.pagers.len(),
            sortable_headers: self.sort_headers.len(),
            virtual_tables: self.virtual_tables.len(),
            column_resizers: self.resizers.len(),
            responsive_images: self.responsive.len(),
            active_timers: self.timers.len(),
            pending_requests: self.requests.len(),
            sweep_runs: self.sweep_runs,
            viewport_width: self.viewport_width,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether the document changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn schedule(&mut self, purpose: TimerPurpose) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.insert(id, purpose);
        id
    }

    pub(crate) fn begin_request(&mut self, purpose: RequestPurpose) -> RequestId {
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.requests.insert(id, purpose);
        id
    }
}
