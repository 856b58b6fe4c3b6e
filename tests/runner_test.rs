//! Single-flight behaviour of gated runs

mod common;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Notify;

use common::{FakeLauncher, FakeSession, report_pages, test_config};
use dashboard_scrape::browser::{BrowserSession, SessionLauncher};
use dashboard_scrape::config::ScrapeConfig;
use dashboard_scrape::schema::SessionStatus;
use dashboard_scrape::scrape_engine::{ScrapeError, ScrapeResult, ScrapeRunner};
use dashboard_scrape::session_gate::SessionGate;

fn config() -> ScrapeConfig {
    test_config(Path::new("unused"))
}

#[tokio::test]
async fn second_run_is_refused_while_the_first_holds_the_gate() {
    let release = Arc::new(Notify::new());
    let launcher = FakeLauncher::new(FakeSession::new(report_pages())).held_by(Arc::clone(&release));
    let runner = ScrapeRunner::new(launcher.clone());

    let first = tokio::spawn({
        let runner = runner.clone();
        async move { runner.run(config()).await }
    });
    launcher.entered.notified().await;
    assert!(runner.gate().is_held());

    let second = runner.run(config()).await;
    assert_eq!(second.unwrap_err(), ScrapeError::Busy);
    assert_eq!(launcher.launches(), 1);

    release.notify_one();
    let session = first.await.expect("join").expect("first run");
    assert_eq!(session.status, SessionStatus::Succeeded);
    assert!(!runner.gate().is_held());
    assert!(launcher.session.is_closed());

    // the gate is free again once the first run is done
    release.notify_one();
    let third = runner.run(config()).await.expect("third run");
    assert_eq!(third.sections.len(), 3);
    assert_eq!(launcher.launches(), 2);
}

#[tokio::test]
async fn busy_is_reported_without_launching_a_browser() {
    let gate = SessionGate::new();
    let _held = gate.acquire_guard().expect("free gate");
    let launcher = FakeLauncher::new(FakeSession::new(report_pages()));
    let runner = ScrapeRunner::with_gate(launcher.clone(), gate);

    assert_eq!(runner.run(config()).await.unwrap_err(), ScrapeError::Busy);
    assert_eq!(launcher.launches(), 0);
}

#[tokio::test]
async fn failed_session_still_releases_the_gate() {
    let launcher = FakeLauncher::new(FakeSession::new(Vec::new()));
    let runner = ScrapeRunner::new(launcher.clone());

    let session = runner.run(config()).await.expect("run completes");
    assert_eq!(session.status, SessionStatus::Failed);
    assert!(!runner.gate().is_held());
    assert!(launcher.session.is_closed());
}

struct PanickingLauncher;

#[async_trait]
impl SessionLauncher for PanickingLauncher {
    async fn launch(&self, _config: &ScrapeConfig) -> ScrapeResult<Box<dyn BrowserSession>> {
        panic!("browser exploded");
    }
}

#[tokio::test]
async fn panic_inside_a_run_releases_the_gate() {
    let runner = ScrapeRunner::new(PanickingLauncher);

    let err = runner.run(config()).await.unwrap_err();
    assert!(matches!(err, ScrapeError::Other(_)), "{err:?}");
    assert!(!runner.gate().is_held());
}

struct FailingLauncher;

#[async_trait]
impl SessionLauncher for FailingLauncher {
    async fn launch(&self, _config: &ScrapeConfig) -> ScrapeResult<Box<dyn BrowserSession>> {
        Err(ScrapeError::Browser("no Chrome found".to_string()))
    }
}

#[tokio::test]
async fn launch_failure_is_surfaced() {
    let runner = ScrapeRunner::new(FailingLauncher);

    let err = runner.run(config()).await.unwrap_err();
    assert_eq!(err, ScrapeError::Browser("no Chrome found".to_string()));
    assert!(!runner.gate().is_held());
}

#[test]
fn gate_hands_over_between_threads() {
    let gate = SessionGate::new();
    let winners: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let gate = gate.clone();
                scope.spawn(move || usize::from(gate.try_acquire()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().expect("thread")).sum()
    });
    assert_eq!(winners, 1);
    assert!(gate.is_held());
}
