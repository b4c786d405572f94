/// Counters describing what the enhancer currently manages.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnhancerViewModel {
    pub initialized: bool,
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
    pub dirty: bool,
}
