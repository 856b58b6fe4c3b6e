//! Progress reporting abstraction for scrape sessions
//!
//! The orchestrator reports lifecycle events through `ProgressReporter`, so the
//! same session logic serves the CLI (which logs them) and tests (which ignore
//! them).

use crate::schema::SessionStatus;

/// Receives lifecycle events of a scrape session
pub trait ProgressReporter: Send + Sync {
    /// Browser is up, the main page is about to load
    fn report_session_started(&self, url: &str);

    /// Navigation to the main page or a detail page started
    fn report_navigation_started(&self, url: &str);

    /// A section was captured and extracted
    fn report_section_captured(&self, index: usize, name: &str);

    /// A step failed for good; the session keeps what it has
    fn report_error(&self, error: &str);

    /// The session reached its final status
    fn report_completed(&self, status: SessionStatus, sections: usize);
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    #[inline(always)]
    fn report_session_started(&self, _url: &str) {}

    #[inline(always)]
    fn report_navigation_started(&self, _url: &str) {}

    #[inline(always)]
    fn report_section_captured(&self, _index: usize, _name: &str) {}

    #[inline(always)]
    fn report_error(&self, _error: &str) {}

    #[inline(always)]
    fn report_completed(&self, _status: SessionStatus, _sections: usize) {}
}

/// Progress reporter that writes every event to the log
#[derive(Debug, Clone, Copy)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report_session_started(&self, url: &str) {
        log::info!("Starting scrape session for {url}");
    }

    fn report_navigation_started(&self, url: &str) {
        log::debug!("Navigating to {url}");
    }

    fn report_section_captured(&self, index: usize, name: &str) {
        log::info!("Captured section {index}: {name}");
    }

    fn report_error(&self, error: &str) {
        log::error!("{error}");
    }

    fn report_completed(&self, status: SessionStatus, sections: usize) {
        log::info!("Scrape session finished: {status:?} with {sections} sections");
    }
}
