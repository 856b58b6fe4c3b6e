//! Section navigator
//!
//! Walks the "view more" buttons of the main page one at a time. Each detail
//! page is opened from the main page, so after every capture the navigator
//! returns there and scans again; clicked buttons are remembered by
//! [`ButtonHandle::key`] so each is opened once.

use std::collections::HashSet;
use std::time::Duration;

use crate::browser::{BrowserSession, ButtonHandle};
use crate::extraction::ReportVocabulary;
use crate::scrape_engine::{ScrapeError, ScrapeResult, with_timeout};
use crate::utils::DETAIL_SECTION_NAME;

const URL_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Where the navigator is in the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    AtMainPage,
    /// Showing the n-th detail page (1-based)
    AtDetailPage(usize),
    Done,
    Failed,
}

/// A detail page still to be opened
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationTarget {
    pub button: ButtonHandle,
    pub section_name: String,
}

/// Per-step deadlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTimeouts {
    pub page_load: Duration,
    pub click: Duration,
}

pub struct SectionNavigator {
    vocabulary: ReportVocabulary,
    max_sections: usize,
    state: NavigatorState,
    clicked: HashSet<String>,
    visited: usize,
}

impl SectionNavigator {
    #[must_use]
    pub fn new(vocabulary: ReportVocabulary, max_sections: usize) -> Self {
        Self {
            vocabulary,
            max_sections,
            state: NavigatorState::AtMainPage,
            clicked: HashSet::new(),
            visited: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> NavigatorState {
        self.state
    }

    #[must_use]
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Name a detail section after the context phrase around its button
    fn section_name(&self, button: &ButtonHandle) -> String {
        button
            .context
            .as_deref()
            .and_then(|phrase| self.vocabulary.section_name_for(phrase))
            .unwrap_or(DETAIL_SECTION_NAME)
            .to_string()
    }

    async fn scan(&self, session: &dyn BrowserSession) -> ScrapeResult<Vec<ButtonHandle>> {
        session
            .find_buttons(&self.vocabulary.button_labels, &self.vocabulary.section_phrases())
            .await
    }

    /// Scan the current (main) page for the next unclicked button.
    ///
    /// Returns `None`, and moves to `Done`, when there is none left, when the
    /// section cap is reached, or when the scan itself fails.
    pub async fn next_target(&mut self, session: &dyn BrowserSession) -> Option<NavigationTarget> {
        if matches!(self.state, NavigatorState::Done | NavigatorState::Failed) {
            return None;
        }
        if self.visited >= self.max_sections {
            log::info!("Reached the limit of {} detail sections", self.max_sections);
            self.state = NavigatorState::Done;
            return None;
        }

        let buttons = match self.scan(session).await {
            Ok(buttons) => buttons,
            Err(e) => {
                log::warn!("Button scan failed, treating as no more sections: {e}");
                self.state = NavigatorState::Done;
                return None;
            }
        };

        match buttons.into_iter().find(|b| !self.clicked.contains(&b.key())) {
            Some(button) => Some(NavigationTarget {
                section_name: self.section_name(&button),
                button,
            }),
            None => {
                log::debug!("No unvisited buttons left");
                self.state = NavigatorState::Done;
                None
            }
        }
    }

    /// One attempt at opening `target` from the main page.
    ///
    /// The button is looked up again by key so a stale handle is never
    /// clicked. Success means the URL moved away from `main_url` within the
    /// click deadline; the new URL is returned.
    pub async fn open(
        &self,
        session: &dyn BrowserSession,
        target: &NavigationTarget,
        main_url: &str,
        timeouts: StepTimeouts,
    ) -> ScrapeResult<String> {
        // a late page change from an earlier attempt leaves us off the main page
        if session.current_url().await? != main_url {
            with_timeout(session.navigate(main_url), timeouts.page_load, "reload main page", main_url)
                .await?;
        }

        let key = target.button.key();
        let button = self
            .scan(session)
            .await?
            .into_iter()
            .find(|b| b.key() == key)
            .ok_or_else(|| {
                ScrapeError::Interaction(format!("button '{}' is no longer on the page", target.button.label))
            })?;

        session.click(&button).await?;
        wait_for_url_change(session, main_url, timeouts.click).await
    }

    /// Record a successful visit
    pub fn mark_visited(&mut self, target: &NavigationTarget) {
        self.clicked.insert(target.button.key());
        self.visited += 1;
        self.state = NavigatorState::AtDetailPage(self.visited);
    }

    pub fn mark_failed(&mut self) {
        self.state = NavigatorState::Failed;
    }

    /// Leave the walk without failure
    pub fn finish(&mut self) {
        self.state = NavigatorState::Done;
    }

    /// One attempt at getting back to the main page.
    ///
    /// Uses history first and falls back to loading `main_url` directly.
    pub async fn return_to_main(
        &self,
        session: &dyn BrowserSession,
        main_url: &str,
        timeouts: StepTimeouts,
    ) -> ScrapeResult<()> {
        let here = session.current_url().await?;
        if here != main_url {
            session.go_back().await?;
            if let Err(e) = wait_for_url_change(session, &here, timeouts.click).await {
                log::debug!("History navigation did not leave the detail page: {e}");
            }
            if session.current_url().await? != main_url {
                log::debug!("Reloading main page at {main_url}");
                with_timeout(session.navigate(main_url), timeouts.page_load, "reload main page", main_url)
                    .await?;
            }
        }
        Ok(())
    }

    /// Record that the main page is showing again
    pub fn mark_at_main(&mut self) {
        if matches!(self.state, NavigatorState::AtDetailPage(_)) {
            self.state = NavigatorState::AtMainPage;
        }
    }
}

/// Poll until the page URL differs from `from`
pub async fn wait_for_url_change(
    session: &dyn BrowserSession,
    from: &str,
    timeout: Duration,
) -> ScrapeResult<String> {
    with_timeout(poll_url_change(session, from), timeout, "page change after click", from).await
}

async fn poll_url_change(session: &dyn BrowserSession, from: &str) -> ScrapeResult<String> {
    loop {
        let url = session.current_url().await?;
        if url != from {
            return Ok(url);
        }
        tokio::time::sleep(URL_POLL_INTERVAL).await;
    }
}
