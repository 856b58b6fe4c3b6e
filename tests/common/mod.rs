//! Scripted browser used by the integration tests
//!
//! A `FakeSession` serves a fixed set of pages keyed by URL. Buttons either
//! lead to another page, fail to click, or do nothing. Each page can emit API
//! responses into the attached interceptor when it is loaded.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use dashboard_scrape::browser::{BrowserSession, ButtonHandle, SessionLauncher};
use dashboard_scrape::config::{Complete, ScrapeConfig, ScrapeConfigBuilder};
use dashboard_scrape::interception::{ResponseInterceptor, ResponseMeta};
use dashboard_scrape::scrape_engine::{ScrapeError, ScrapeResult};

pub const MAIN_URL: &str = "https://dash.example.com/report?id=1";
pub const API_URL: &str = "https://dash.example.com/api/report/1";
pub const VIEW_MORE: &str = "Visualizza di più";

pub const MAIN_TEXT: &str = "\
Rapporto pelle
Versione algoritmo: 3.2.1
Nome cliente: Maria Rossi
Età: 34
Livello di Invecchiamento
Visualizza di più
Analisi della Pelle
Visualizza di più
";

pub const AGING_TEXT: &str = "\
Rughe
45
Moderato
Metriche:
Rughe frontali
Quantità: 12
Possibili cause:
- Invecchiamento
Suggerimenti per la cura:
1. Retinolo
";

pub const SKIN_TEXT: &str = "Pori ... 52 ... Causes: UV exposure; Genetics ... Care: Use sunscreen";

#[derive(Debug, Clone)]
pub enum ButtonAction {
    /// Clicking loads this URL
    Open(String),
    /// The click itself is rejected
    Reject,
    /// The click succeeds but nothing happens
    Inert,
}

#[derive(Debug, Clone)]
pub struct FakeButton {
    pub text: String,
    pub context: Option<String>,
    pub x: f64,
    pub y: f64,
    pub action: ButtonAction,
}

impl FakeButton {
    pub fn opens(context: &str, y: f64, url: &str) -> Self {
        Self {
            text: VIEW_MORE.to_string(),
            context: Some(context.to_string()),
            x: 20.0,
            y,
            action: ButtonAction::Open(url.to_string()),
        }
    }

    pub fn with_action(mut self, action: ButtonAction) -> Self {
        self.action = action;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub text: String,
    pub html: String,
    pub buttons: Vec<FakeButton>,
    /// (url, mime type, body) emitted on every load
    pub responses: Vec<(String, String, String)>,
}

impl FakePage {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            html: format!("<html><body><pre>{text}</pre></body></html>"),
            ..Self::default()
        }
    }

    pub fn button(mut self, button: FakeButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn json_response(mut self, url: &str, body: &str) -> Self {
        self.responses
            .push((url.to_string(), "application/json".to_string(), body.to_string()));
        self
    }

    pub fn response(mut self, url: &str, mime: &str, body: &str) -> Self {
        self.responses.push((url.to_string(), mime.to_string(), body.to_string()));
        self
    }
}

#[derive(Default)]
struct FakeState {
    current: Option<String>,
    history: Vec<String>,
    interceptor: Option<ResponseInterceptor>,
    clicks: Vec<String>,
    closed: bool,
}

/// A browser that serves scripted pages
#[derive(Clone, Default)]
pub struct FakeSession {
    pages: Arc<HashMap<String, FakePage>>,
    /// URLs whose navigation never completes
    hanging: Arc<Vec<String>>,
    state: Arc<Mutex<FakeState>>,
    navigations: Arc<AtomicUsize>,
}

impl FakeSession {
    pub fn new(pages: Vec<(&str, FakePage)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().map(|(u, p)| (u.to_string(), p)).collect()),
            ..Self::default()
        }
    }

    pub fn hanging_on(mut self, url: &str) -> Self {
        Arc::make_mut(&mut self.hanging).push(url.to_string());
        self
    }

    pub fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().clicks.clone()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn load(&self, url: &str) {
        let interceptor = {
            let mut state = self.state.lock();
            if let Some(previous) = state.current.replace(url.to_string()) {
                state.history.push(previous);
            }
            state.interceptor.clone()
        };
        if let (Some(interceptor), Some(page)) = (interceptor, self.pages.get(url)) {
            for (api_url, mime, body) in &page.responses {
                let meta = ResponseMeta {
                    url: api_url.clone(),
                    method: "GET".to_string(),
                    status: 200,
                    mime_type: mime.clone(),
                };
                interceptor.record(meta, body);
            }
        }
    }

    fn current_page(&self) -> Option<FakePage> {
        let state = self.state.lock();
        state.current.as_ref().and_then(|u| self.pages.get(u)).cloned()
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str) -> ScrapeResult<()> {
        self.navigations.fetch_add(1, Ordering::SeqCst);
        if self.hanging.iter().any(|u| u == url) {
            std::future::pending::<()>().await;
        }
        if !self.pages.contains_key(url) {
            return Err(ScrapeError::navigation(url, "net::ERR_NAME_NOT_RESOLVED"));
        }
        self.load(url);
        Ok(())
    }

    async fn find_buttons(
        &self,
        labels: &[String],
        context_phrases: &[String],
    ) -> ScrapeResult<Vec<ButtonHandle>> {
        let Some(page) = self.current_page() else {
            return Ok(Vec::new());
        };
        let handles = page
            .buttons
            .iter()
            .enumerate()
            .filter_map(|(ordinal, button)| {
                let label = labels.iter().find(|l| button.text.contains(l.as_str()))?;
                let context = button
                    .context
                    .as_ref()
                    .and_then(|c| context_phrases.iter().find(|p| c.contains(p.as_str())))
                    .cloned();
                Some(ButtonHandle {
                    ordinal,
                    label: label.clone(),
                    text: button.text.clone(),
                    context,
                    x: button.x,
                    y: button.y,
                })
            })
            .collect();
        Ok(handles)
    }

    async fn click(&self, button: &ButtonHandle) -> ScrapeResult<()> {
        let page = self
            .current_page()
            .ok_or_else(|| ScrapeError::Interaction("no page loaded".to_string()))?;
        let fake = page
            .buttons
            .get(button.ordinal)
            .ok_or_else(|| ScrapeError::Interaction(format!("button {} detached", button.ordinal)))?;
        self.state.lock().clicks.push(button.key());

        match &fake.action {
            ButtonAction::Open(url) => {
                self.load(url);
                Ok(())
            }
            ButtonAction::Reject => Err(ScrapeError::Browser("element is not clickable".to_string())),
            ButtonAction::Inert => Ok(()),
        }
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> ScrapeResult<()> {
        Ok(())
    }

    async fn capture_full_page_screenshot(&self) -> ScrapeResult<Vec<u8>> {
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn extract_visible_text(&self) -> ScrapeResult<String> {
        Ok(self.current_page().map(|p| p.text).unwrap_or_default())
    }

    async fn extract_html(&self) -> ScrapeResult<String> {
        Ok(self.current_page().map(|p| p.html).unwrap_or_default())
    }

    async fn current_url(&self) -> ScrapeResult<String> {
        Ok(self
            .state
            .lock()
            .current
            .clone()
            .unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn go_back(&self) -> ScrapeResult<()> {
        let mut state = self.state.lock();
        if let Some(previous) = state.history.pop() {
            state.current = Some(previous);
        }
        Ok(())
    }

    async fn attach_interceptor(&self, interceptor: ResponseInterceptor) -> ScrapeResult<()> {
        self.state.lock().interceptor = Some(interceptor);
        Ok(())
    }

    async fn close(&self) -> ScrapeResult<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}

/// Hands out clones of one `FakeSession` and counts launches
#[derive(Clone)]
pub struct FakeLauncher {
    pub session: FakeSession,
    launches: Arc<AtomicUsize>,
    /// When set, `launch` parks until notified
    hold: Option<Arc<Notify>>,
    /// Signalled once `launch` has been entered
    pub entered: Arc<Notify>,
}

impl FakeLauncher {
    pub fn new(session: FakeSession) -> Self {
        Self {
            session,
            launches: Arc::new(AtomicUsize::new(0)),
            hold: None,
            entered: Arc::new(Notify::new()),
        }
    }

    pub fn held_by(mut self, release: Arc<Notify>) -> Self {
        self.hold = Some(release);
        self
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn launch(&self, _config: &ScrapeConfig) -> ScrapeResult<Box<dyn BrowserSession>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        if let Some(release) = &self.hold {
            release.notified().await;
        }
        Ok(Box::new(self.session.clone()))
    }
}

/// The two-section dashboard used by most scenarios
pub fn report_pages() -> Vec<(&'static str, FakePage)> {
    vec![
        (
            MAIN_URL,
            FakePage::new(MAIN_TEXT)
                .button(FakeButton::opens("Livello di Invecchiamento", 120.0, "https://dash.example.com/aging"))
                .button(FakeButton::opens("Analisi della Pelle", 480.0, "https://dash.example.com/skin"))
                .json_response(API_URL, r#"{"id": 1, "score": 71}"#)
                .response("https://dash.example.com/static/app.js", "application/javascript", "var x;"),
        ),
        (
            "https://dash.example.com/aging",
            FakePage::new(AGING_TEXT).json_response(
                "https://dash.example.com/api/aging",
                r#"{"wrinkles": 45}"#,
            ),
        ),
        (
            "https://dash.example.com/skin",
            FakePage::new(SKIN_TEXT).json_response("https://dash.example.com/api/skin", "not json"),
        ),
    ]
}

/// Fast config for scripted sessions
pub fn test_config(output_dir: &std::path::Path) -> ScrapeConfig {
    test_config_with(output_dir, |builder| builder)
}

/// Fast config with extra builder settings applied before `build()`
pub fn test_config_with(
    output_dir: &std::path::Path,
    customize: impl FnOnce(ScrapeConfigBuilder<Complete>) -> ScrapeConfigBuilder<Complete>,
) -> ScrapeConfig {
    let builder = ScrapeConfig::builder()
        .output_dir(output_dir)
        .target_url(MAIN_URL)
        .settle_delay_ms(0)
        .retry_delay_ms(10)
        .idle_timeout_secs(1)
        .click_timeout_secs(2)
        .page_load_timeout_secs(5)
        .persist(false);
    customize(builder).build().expect("valid test config")
}
