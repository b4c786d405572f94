//! RON configuration file. Every field is optional; missing ones keep the built-in defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use enhancer_core::EnhancerConfig;
use enhancer_engine::FetchSettings;
use enhancer_logging::enhancer_info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub base_url: Option<String>,
    pub viewport_width: u32,
    pub lazy_root_margin_px: u32,
    pub search_debounce_ms: u64,
    pub search_min_query_len: usize,
    pub submit_feedback_ms: u64,
    pub default_results_target: String,
    pub items_per_page: usize,
    pub virtual_threshold: usize,
    pub virtual_row_height_px: u32,
    pub virtual_viewport_height_px: u32,
    pub virtual_overscan_rows: usize,
    pub default_column_width_px: i64,
    pub responsive_small_max_px: u32,
    pub responsive_medium_max_px: u32,
    pub resize_debounce_ms: u64,
    pub sweep_interval_secs: u64,
    pub fetch: FetchSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Empty accepts any content type.
    pub allowed_content_types: Vec<String>,
    pub fail_on_http_status: bool,
    /// How long the driver waits for outstanding fetches after each step.
    pub settle_timeout_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        let c = EnhancerConfig::default();
        Self {
            base_url: c.base_url,
            viewport_width: c.viewport_width,
            lazy_root_margin_px: c.lazy_root_margin_px,
            search_debounce_ms: millis(c.search_debounce),
            search_min_query_len: c.search_min_query_len,
            submit_feedback_ms: millis(c.submit_feedback),
            default_results_target: c.default_results_target,
            items_per_page: c.items_per_page,
            virtual_threshold: c.virtual_threshold,
            virtual_row_height_px: c.virtual_row_height_px,
            virtual_viewport_height_px: c.virtual_viewport_height_px,
            virtual_overscan_rows: c.virtual_overscan_rows,
            default_column_width_px: c.default_column_width_px,
            responsive_small_max_px: c.responsive_small_max_px,
            responsive_medium_max_px: c.responsive_medium_max_px,
            resize_debounce_ms: millis(c.resize_debounce),
            sweep_interval_secs: c.sweep_interval.as_secs(),
            fetch: FetchSection::default(),
        }
    }
}

impl Default for FetchSection {
    fn default() -> Self {
        let f = FetchSettings::default();
        Self {
            connect_timeout_ms: millis(f.connect_timeout),
            request_timeout_ms: millis(f.request_timeout),
            redirect_limit: f.redirect_limit,
            max_bytes: f.max_bytes,
            allowed_content_types: f.allowed_content_types,
            fail_on_http_status: f.fail_on_http_status,
            settle_timeout_ms: 35_000,
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl AppSettings {
    pub fn enhancer_config(&self) -> EnhancerConfig {
        EnhancerConfig {
            base_url: self.base_url.clone(),
            viewport_width: self.viewport_width,
            lazy_root_margin_px: self.lazy_root_margin_px,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            search_min_query_len: self.search_min_query_len,
            submit_feedback: Duration::from_millis(self.submit_feedback_ms),
            default_results_target: self.default_results_target.clone(),
            items_per_page: self.items_per_page.max(1),
            virtual_threshold: self.virtual_threshold,
            virtual_row_height_px: self.virtual_row_height_px.max(1),
            virtual_viewport_height_px: self.virtual_viewport_height_px,
            virtual_overscan_rows: self.virtual_overscan_rows,
            default_column_width_px: self.default_column_width_px,
            responsive_small_max_px: self.responsive_small_max_px,
            responsive_medium_max_px: self.responsive_medium_max_px,
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            sweep_interval: Duration::from_secs(self.sweep_interval_secs.max(1)),
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_millis(self.fetch.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.fetch.request_timeout_ms),
            redirect_limit: self.fetch.redirect_limit,
            max_bytes: self.fetch.max_bytes,
            allowed_content_types: self.fetch.allowed_content_types.clone(),
            fail_on_http_status: self.fetch.fail_on_http_status,
        }
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch.settle_timeout_ms)
    }

    pub fn from_ron(text: &str) -> anyhow::Result<Self> {
        ron::from_str(text).context("invalid settings")
    }

    /// Reads `path` when given; otherwise returns the defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings =
            Self::from_ron(&text).with_context(|| format!("parsing {}", path.display()))?;
        enhancer_info!("loaded settings from {}", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use enhancer_core::EnhancerConfig;
    use pretty_assertions::assert_eq;

    use super::AppSettings;

    #[test]
    fn defaults_round_trip_to_core_config() {
        assert_eq!(AppSettings::default().enhancer_config(), EnhancerConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let settings = AppSettings::from_ron(
            r#"(
                base_url: Some("https://shop.example/list"),
                items_per_page: 5,
                fetch: (fail_on_http_status: true),
            )"#,
        )
        .unwrap();
        let config = settings.enhancer_config();
        assert_eq!(config.base_url.as_deref(), Some("https://shop.example/list"));
        assert_eq!(config.items_per_page, 5);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert!(settings.fetch_settings().fail_on_http_status);
        assert_eq!(settings.fetch.redirect_limit, 5);
    }

    #[test]
    fn content_type_allow_list_is_opt_in() {
        assert!(AppSettings::default()
            .fetch_settings()
            .allowed_content_types
            .is_empty());
        let settings =
            AppSettings::from_ron(r#"(fetch: (allowed_content_types: ["text/html"]))"#).unwrap();
        assert_eq!(
            settings.fetch_settings().allowed_content_types,
            vec!["text/html".to_string()]
        );
    }

    #[test]
    fn unknown_syntax_is_an_error() {
        assert!(AppSettings::from_ron("(items_per_page: \"many\")").is_err());
    }
}
