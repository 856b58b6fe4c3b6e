//! Core configuration type for scrape sessions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::extraction::ReportVocabulary;
use crate::utils::{
    DEFAULT_CLICK_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MAX_SECTIONS, DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_TARGET_URL,
};

/// Settings for one scrape session.
///
/// Build it with [`ScrapeConfig::builder`]; the builder validates the target
/// URL and fills `api_host` from it when not set explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub(crate) target_url: String,
    pub(crate) output_dir: PathBuf,
    pub(crate) headless: bool,
    pub(crate) page_load_timeout_secs: u64,
    pub(crate) click_timeout_secs: u64,
    pub(crate) idle_timeout_secs: u64,
    pub(crate) settle_delay_ms: u64,
    pub(crate) max_attempts: u32,
    pub(crate) retry_delay_ms: u64,
    pub(crate) max_sections: usize,
    /// Host whose responses the interceptor keeps
    pub(crate) api_host: Option<String>,
    pub(crate) save_screenshots: bool,
    /// Write the persisted layout after the run
    pub(crate) persist: bool,
    /// Chrome profile directory; a fresh temp dir per session when unset
    pub(crate) chrome_data_dir: Option<PathBuf>,
    pub(crate) vocabulary: ReportVocabulary,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            headless: true,
            page_load_timeout_secs: DEFAULT_PAGE_LOAD_TIMEOUT_SECS,
            click_timeout_secs: DEFAULT_CLICK_TIMEOUT_SECS,
            idle_timeout_secs: DEFAULT_IDLE_TIMEOUT_SECS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_sections: DEFAULT_MAX_SECTIONS,
            api_host: None,
            save_screenshots: true,
            persist: true,
            chrome_data_dir: None,
            vocabulary: ReportVocabulary::default(),
        }
    }
}
