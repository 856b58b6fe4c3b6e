//! Capture buffer for backend API responses
//!
//! The browser's network listener hands every finished response to
//! `ResponseInterceptor::record_tagged`; the orchestrator moves the "current
//! section" pointer as it navigates. The buffer is append-only and shared by
//! cheap clones, so the listener task never waits on the main flow.

use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::ScrapeConfig;
use crate::schema::ApiCapture;

/// What the network layer knows about a response before its body is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub url: String,
    pub method: String,
    pub status: u16,
    pub mime_type: String,
}

/// Decides which responses count as backend API traffic
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevanceFilter {
    /// Only responses from this host are kept; `None` keeps every host
    api_host: Option<String>,
}

const STATIC_MIME_PREFIXES: &[&str] = &["image/", "font/", "audio/", "video/", "text/css", "text/html"];
const STATIC_MIME_MARKERS: &[&str] = &["javascript", "ecmascript", "wasm", "woff", "octet-stream"];

impl RelevanceFilter {
    #[must_use]
    pub fn new(api_host: Option<String>) -> Self {
        Self { api_host }
    }

    #[must_use]
    pub fn for_config(config: &ScrapeConfig) -> Self {
        Self::new(config.api_host().map(str::to_string))
    }

    /// JSON, or any other non-static content type, from the API host
    #[must_use]
    pub fn is_relevant(&self, url: &str, mime_type: &str) -> bool {
        let mime = mime_type.to_ascii_lowercase();
        if mime.is_empty() {
            return false;
        }
        let is_json = mime.contains("json");
        let is_static = STATIC_MIME_PREFIXES.iter().any(|p| mime.starts_with(p))
            || STATIC_MIME_MARKERS.iter().any(|m| mime.contains(m));
        if !is_json && is_static {
            return false;
        }

        let Ok(parsed) = url::Url::parse(url) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        match &self.api_host {
            Some(host) => parsed.host_str().is_some_and(|h| h.eq_ignore_ascii_case(host)),
            None => true,
        }
    }
}

/// Parse a body as JSON, falling back to the raw text
#[must_use]
pub fn parse_body(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap_or_else(|_| serde_json::Value::String(body.to_string()))
}

struct InterceptorState {
    filter: RelevanceFilter,
    current_section: AtomicUsize,
    captures: Mutex<Vec<ApiCapture>>,
}

/// Shared, append-only store of intercepted API responses
#[derive(Clone)]
pub struct ResponseInterceptor {
    state: Arc<InterceptorState>,
}

impl std::fmt::Debug for ResponseInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseInterceptor")
            .field("current_section", &self.current_section())
            .field("captures", &self.len())
            .finish()
    }
}

impl ResponseInterceptor {
    #[must_use]
    pub fn new(filter: RelevanceFilter) -> Self {
        Self {
            state: Arc::new(InterceptorState {
                filter,
                current_section: AtomicUsize::new(0),
                captures: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Point later captures at `index`
    pub fn set_current_section(&self, index: usize) {
        self.state.current_section.store(index, Ordering::Release);
    }

    #[must_use]
    pub fn current_section(&self) -> usize {
        self.state.current_section.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn is_relevant(&self, meta: &ResponseMeta) -> bool {
        self.state.filter.is_relevant(&meta.url, &meta.mime_type)
    }

    /// Record a response against the current section.
    ///
    /// Irrelevant responses are ignored; returns whether it was kept.
    pub fn record(&self, meta: ResponseMeta, body: &str) -> bool {
        self.record_tagged(meta, body, self.current_section())
    }

    /// Record a response against an explicit section, normally the one that
    /// was current when the response arrived
    pub fn record_tagged(&self, meta: ResponseMeta, body: &str, section_index: usize) -> bool {
        if !self.is_relevant(&meta) {
            return false;
        }
        let capture = ApiCapture {
            url: meta.url,
            method: meta.method,
            status: meta.status,
            response_body: parse_body(body),
            timestamp: Utc::now(),
            owning_section_index: section_index,
        };
        log::debug!(
            "Captured API response {} {} (section {section_index})",
            capture.method,
            capture.url
        );
        self.state.captures.lock().push(capture);
        true
    }

    /// Copy of all captures so far, in arrival order
    #[must_use]
    pub fn snapshot(&self) -> Vec<ApiCapture> {
        self.state.captures.lock().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.captures.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
