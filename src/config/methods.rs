//! Builder methods available for all states

use std::path::PathBuf;

use super::builder::ScrapeConfigBuilder;
use crate::extraction::ReportVocabulary;

impl<State> ScrapeConfigBuilder<State> {
    /// Run Chrome without a window (the default).
    ///
    /// Headed mode needs a display server; use it for debugging only.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.draft.headless = headless;
        self
    }

    #[must_use]
    pub fn page_load_timeout_secs(mut self, secs: u64) -> Self {
        self.draft.page_load_timeout_secs = secs;
        self
    }

    /// How long a click may take to open a detail page
    #[must_use]
    pub fn click_timeout_secs(mut self, secs: u64) -> Self {
        self.draft.click_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn idle_timeout_secs(mut self, secs: u64) -> Self {
        self.draft.idle_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.draft.settle_delay_ms = ms;
        self
    }

    /// Attempts per step, clamped to at least 1 at build time
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.draft.max_attempts = attempts;
        self
    }

    #[must_use]
    pub fn retry_delay_ms(mut self, ms: u64) -> Self {
        self.draft.retry_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn max_sections(mut self, max: usize) -> Self {
        self.draft.max_sections = max;
        self
    }

    /// Keep responses from this host instead of the target URL's host
    #[must_use]
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.draft.api_host = Some(host.into());
        self
    }

    #[must_use]
    pub fn save_screenshots(mut self, save: bool) -> Self {
        self.draft.save_screenshots = save;
        self
    }

    #[must_use]
    pub fn persist(mut self, persist: bool) -> Self {
        self.draft.persist = persist;
        self
    }

    #[must_use]
    pub fn chrome_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.draft.chrome_data_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn vocabulary(mut self, vocabulary: ReportVocabulary) -> Self {
        self.draft.vocabulary = vocabulary;
        self
    }
}
