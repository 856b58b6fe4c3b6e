//! `BrowserSession` backed by Chrome over CDP

use async_trait::async_trait;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use parking_lot::Mutex;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::js_scripts::{BUTTON_ATTRIBUTE, FIND_BUTTONS_FN, HISTORY_BACK, READINESS_PROBE, VISIBLE_TEXT};
use super::session::{BrowserSession, ButtonHandle, SessionLauncher};
use crate::browser_setup::{BrowserWrapper, launch_browser};
use crate::config::ScrapeConfig;
use crate::interception::{ResponseInterceptor, spawn_response_listener};
use crate::scrape_engine::{ScrapeError, ScrapeResult};
use crate::utils::NETWORK_IDLE_WINDOW_MS;

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
struct Readiness {
    ready: String,
    resources: usize,
}

fn browser_err(context: &str, err: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Browser(format!("{context}: {err}"))
}

/// One Chrome instance with a single page
pub struct ChromiumSession {
    page: Page,
    browser: tokio::sync::Mutex<Option<BrowserWrapper>>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
}

impl ChromiumSession {
    /// Open a blank page in `wrapper`'s browser
    pub async fn open(wrapper: BrowserWrapper) -> ScrapeResult<Self> {
        let page = wrapper
            .browser()
            .new_page("about:blank")
            .await
            .map_err(|e| browser_err("Failed to create page", e))?;
        Ok(Self {
            page,
            browser: tokio::sync::Mutex::new(Some(wrapper)),
            listeners: Mutex::new(Vec::new()),
        })
    }

    async fn evaluate<T: serde::de::DeserializeOwned>(&self, script: &str) -> ScrapeResult<T> {
        self.page
            .evaluate(script)
            .await
            .map_err(|e| browser_err("Script evaluation failed", e))?
            .into_value()
            .map_err(|e| browser_err("Unexpected script result", e))
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str) -> ScrapeResult<()> {
        debug!("Navigating to {url}");
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::navigation(url, e.to_string()))?;
        Ok(())
    }

    async fn find_buttons(
        &self,
        labels: &[String],
        context_phrases: &[String],
    ) -> ScrapeResult<Vec<ButtonHandle>> {
        let labels = serde_json::to_string(labels).map_err(|e| ScrapeError::Other(e.to_string()))?;
        let phrases =
            serde_json::to_string(context_phrases).map_err(|e| ScrapeError::Other(e.to_string()))?;
        let script = format!("({FIND_BUTTONS_FN})({labels}, {phrases})");
        let buttons: Vec<ButtonHandle> = self.evaluate(&script).await?;
        debug!("Found {} candidate buttons", buttons.len());
        Ok(buttons)
    }

    async fn click(&self, button: &ButtonHandle) -> ScrapeResult<()> {
        let selector = format!("[{BUTTON_ATTRIBUTE}=\"{}\"]", button.ordinal);
        let element = self.page.find_element(selector).await.map_err(|e| {
            ScrapeError::Interaction(format!("button '{}' not found: {e}", button.label))
        })?;
        element.click().await.map_err(|e| {
            ScrapeError::Interaction(format!("button '{}' not clickable: {e}", button.label))
        })?;
        Ok(())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> ScrapeResult<()> {
        let start = Instant::now();
        let window = Duration::from_millis(NETWORK_IDLE_WINDOW_MS);
        let mut last_count = None;
        let mut stable_since = Instant::now();

        while start.elapsed() < timeout {
            match self.evaluate::<Readiness>(READINESS_PROBE).await {
                Ok(probe) if probe.ready == "complete" => {
                    if last_count == Some(probe.resources) {
                        if stable_since.elapsed() >= window {
                            debug!("Network idle after {:.2}s", start.elapsed().as_secs_f64());
                            return Ok(());
                        }
                    } else {
                        last_count = Some(probe.resources);
                        stable_since = Instant::now();
                    }
                }
                Ok(_) => last_count = None,
                Err(e) => debug!("Readiness probe failed, retrying: {e}"),
            }
            tokio::time::sleep(IDLE_POLL_INTERVAL).await;
        }

        warn!("Network did not settle within {}s, proceeding", timeout.as_secs());
        Ok(())
    }

    async fn capture_full_page_screenshot(&self) -> ScrapeResult<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();
        self.page
            .screenshot(params)
            .await
            .map_err(|e| browser_err("Failed to capture screenshot", e))
    }

    async fn extract_visible_text(&self) -> ScrapeResult<String> {
        self.evaluate(VISIBLE_TEXT).await
    }

    async fn extract_html(&self) -> ScrapeResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| browser_err("Failed to read page HTML", e))
    }

    async fn current_url(&self) -> ScrapeResult<String> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| browser_err("Failed to read page URL", e))?;
        Ok(url.unwrap_or_default())
    }

    async fn go_back(&self) -> ScrapeResult<()> {
        // history.back() evaluates to undefined, so the result is not decoded
        self.page
            .evaluate(HISTORY_BACK)
            .await
            .map_err(|e| browser_err("Failed to go back", e))?;
        Ok(())
    }

    async fn attach_interceptor(&self, interceptor: ResponseInterceptor) -> ScrapeResult<()> {
        let handle = spawn_response_listener(&self.page, interceptor).await?;
        self.listeners.lock().push(handle);
        Ok(())
    }

    async fn close(&self) -> ScrapeResult<()> {
        for listener in self.listeners.lock().drain(..) {
            listener.abort();
        }
        if let Some(wrapper) = self.browser.lock().await.take() {
            wrapper.shutdown().await?;
            info!("Browser closed");
        }
        Ok(())
    }
}

/// Launches a fresh Chrome per session
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

#[async_trait]
impl SessionLauncher for ChromiumLauncher {
    async fn launch(&self, config: &ScrapeConfig) -> ScrapeResult<Box<dyn BrowserSession>> {
        let wrapper = launch_browser(config.headless(), config.chrome_data_dir())
            .await
            .map_err(|e| ScrapeError::Browser(format!("{e:#}")))?;
        let session = ChromiumSession::open(wrapper).await?;
        Ok(Box::new(session))
    }
}
