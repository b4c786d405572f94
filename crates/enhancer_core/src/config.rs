use std::time::Duration;

/// Tunables for every enhancer component. Per-element attributes override the matching
/// field where one exists (`data-items-per-page`, `data-virtual-threshold`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerConfig {
    /// Document URL used to resolve relative fetch and form targets.
    pub base_url: Option<String>,
    /// Initial window width in CSS pixels.
    pub viewport_width: u32,
    pub lazy_root_margin_px: u32,
    pub search_debounce: Duration,
    pub search_min_query_len: usize,
    pub submit_feedback: Duration,
    pub default_results_target: String,
    pub items_per_page: usize,
    pub virtual_threshold: usize,
    pub virtual_row_height_px: u32,
    pub virtual_viewport_height_px: u32,
    pub virtual_overscan_rows: usize,
    pub default_column_width_px: i64,
    pub responsive_small_max_px: u32,
    pub responsive_medium_max_px: u32,
    pub resize_debounce: Duration,
    pub sweep_interval: Duration,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            viewport_width: 1024,
            lazy_root_margin_px: 50,
            search_debounce: Duration::from_millis(300),
            search_min_query_len: 2,
            submit_feedback: Duration::from_millis(2000),
            default_results_target: "search-results".to_string(),
            items_per_page: 20,
            virtual_threshold: 1000,
            virtual_row_height_px: 40,
            virtual_viewport_height_px: 400,
            virtual_overscan_rows: 5,
            default_column_width_px: 100,
            responsive_small_max_px: 400,
            responsive_medium_max_px: 800,
            resize_debounce: Duration::from_millis(250),
            sweep_interval: Duration::from_secs(300),
        }
    }
}

/// Parses a positive integer attribute value, ignoring surrounding whitespace.
pub(crate) fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
}
