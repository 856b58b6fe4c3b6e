//! The browser seam
//!
//! The orchestrator and navigator only talk to a `BrowserSession`. The real
//! implementation drives Chrome over CDP; tests script a fake one.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ScrapeConfig;
use crate::interception::ResponseInterceptor;
use crate::scrape_engine::ScrapeResult;

/// A clickable "view more" element found on the current page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ButtonHandle {
    /// Position in the latest scan; only valid until the next scan
    pub ordinal: usize,
    /// The label that matched
    pub label: String,
    /// Visible text of the element
    #[serde(default)]
    pub text: String,
    /// Context phrase found in an ancestor, used for naming the section
    #[serde(default)]
    pub context: Option<String>,
    /// Document coordinates of the element's top-left corner
    pub x: f64,
    pub y: f64,
}

impl ButtonHandle {
    /// Identity that survives page reloads: label plus a 10px position bucket
    #[must_use]
    pub fn key(&self) -> String {
        // truncation to the bucket index is the point here
        #[allow(clippy::cast_possible_truncation)]
        let (bx, by) = ((self.x / 10.0).floor() as i64, (self.y / 10.0).floor() as i64);
        format!("{}@{bx}_{by}", self.label)
    }
}

/// Headless page driven by the scraper
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Load `url` in the current page
    async fn navigate(&self, url: &str) -> ScrapeResult<()>;

    /// Visible elements whose text contains one of `labels`, in document
    /// order, at most one per position bucket. `context_phrases` are searched
    /// in the ancestors of each match.
    async fn find_buttons(
        &self,
        labels: &[String],
        context_phrases: &[String],
    ) -> ScrapeResult<Vec<ButtonHandle>>;

    /// Click a button from the most recent scan
    async fn click(&self, button: &ButtonHandle) -> ScrapeResult<()>;

    /// Wait until the page has stopped loading resources. Returns `Ok` even
    /// when `timeout` is reached.
    async fn wait_for_network_idle(&self, timeout: Duration) -> ScrapeResult<()>;

    /// PNG of the whole scrollable page
    async fn capture_full_page_screenshot(&self) -> ScrapeResult<Vec<u8>>;

    async fn extract_visible_text(&self) -> ScrapeResult<String>;

    async fn extract_html(&self) -> ScrapeResult<String>;

    async fn current_url(&self) -> ScrapeResult<String>;

    /// Step back in history. Does not wait for the previous page to load.
    async fn go_back(&self) -> ScrapeResult<()>;

    /// Start feeding network responses into `interceptor`
    async fn attach_interceptor(&self, interceptor: ResponseInterceptor) -> ScrapeResult<()>;

    /// Shut the browser down. Safe to call once at the end of a session.
    async fn close(&self) -> ScrapeResult<()>;
}

/// Creates one browser session per scrape run
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn launch(&self, config: &ScrapeConfig) -> ScrapeResult<Box<dyn BrowserSession>>;
}
