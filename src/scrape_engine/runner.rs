//! Gated scrape runs
//!
//! `ScrapeRunner` is the single entry point used by the CLI and the HTTP
//! service: it takes the session gate, launches a browser, runs the
//! orchestrator, closes the browser and writes the persisted layout.

use std::sync::Arc;

use super::orchestrator::run_session;
use super::progress::{LogProgress, ProgressReporter};
use super::scrape_types::{ScrapeError, ScrapeResult};
use crate::browser::SessionLauncher;
use crate::config::ScrapeConfig;
use crate::content_saver::save_session;
use crate::schema::ScrapeSession;
use crate::session_gate::SessionGate;

/// Runs at most one scrape at a time
#[derive(Clone)]
pub struct ScrapeRunner {
    gate: SessionGate,
    launcher: Arc<dyn SessionLauncher>,
}

impl ScrapeRunner {
    pub fn new(launcher: impl SessionLauncher + 'static) -> Self {
        Self::with_gate(launcher, SessionGate::new())
    }

    /// Share an existing gate, e.g. between several runners in one process
    pub fn with_gate(launcher: impl SessionLauncher + 'static, gate: SessionGate) -> Self {
        Self {
            gate,
            launcher: Arc::new(launcher),
        }
    }

    #[must_use]
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// Run one session.
    ///
    /// Returns [`ScrapeError::Busy`] at once, without touching the browser,
    /// when another run holds the gate. The run itself executes on its own
    /// task, so the gate is released on every exit path even if the caller
    /// stops waiting.
    pub async fn run(&self, config: ScrapeConfig) -> ScrapeResult<ScrapeSession> {
        let guard = self.gate.acquire_guard().ok_or(ScrapeError::Busy)?;
        let launcher = Arc::clone(&self.launcher);

        let task = tokio::spawn(async move {
            let _guard = guard;
            run_gated(launcher.as_ref(), &config, &LogProgress).await
        });

        task.await
            .map_err(|e| ScrapeError::Other(format!("Scrape task ended abnormally: {e}")))?
    }
}

async fn run_gated<P: ProgressReporter>(
    launcher: &dyn SessionLauncher,
    config: &ScrapeConfig,
    progress: &P,
) -> ScrapeResult<ScrapeSession> {
    let browser = launcher.launch(config).await?;
    let mut session = run_session(browser.as_ref(), config, progress).await;
    if let Err(e) = browser.close().await {
        log::warn!("Browser did not close cleanly: {e}");
    }

    // save errors are recorded on the session, not returned
    if config.persist() {
        match save_session(&session, config.output_dir()).await {
            Ok(summary) => log::info!(
                "Saved {} sections and {} API captures to {}",
                summary.total_sections,
                summary.total_api_captures,
                config.output_dir().display()
            ),
            Err(e) => {
                let message = format!("Could not save results: {e}");
                progress.report_error(&message);
                session.errors.push(message);
            }
        }
    }
    Ok(session)
}
