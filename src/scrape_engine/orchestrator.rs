//! Scrape session orchestration
//!
//! Sequence: load the main page, capture it as section 0, then open each
//! detail page in turn, capture it, and return to the main page. Navigation
//! and clicks are retried; a step that keeps failing ends the walk and the
//! session keeps everything captured before it.

use chrono::Utc;
use std::time::Duration;

use super::page_timeout::with_timeout;
use super::progress::ProgressReporter;
use super::retry::RetryPolicy;
use super::scrape_types::ScrapeError;
use crate::browser::BrowserSession;
use crate::config::ScrapeConfig;
use crate::interception::{RelevanceFilter, ResponseInterceptor};
use crate::navigation::{SectionNavigator, StepTimeouts};
use crate::schema::{ExtractedData, ScrapeSession, Section, SessionStatus};
use crate::utils::MAIN_SECTION_NAME;

/// Wait for the page to go quiet, then give client-side rendering a moment
async fn settle(session: &dyn BrowserSession, config: &ScrapeConfig) {
    if let Err(e) = session.wait_for_network_idle(config.idle_timeout()).await {
        log::debug!("Idle wait failed, proceeding: {e}");
    }
    let delay = config.settle_delay();
    if delay > Duration::ZERO {
        tokio::time::sleep(delay).await;
    }
}

/// Capture the page currently shown as section `index`.
///
/// Capture problems degrade the section (empty text, no screenshot) instead
/// of failing it.
async fn capture_section(
    session: &dyn BrowserSession,
    index: usize,
    name: &str,
    config: &ScrapeConfig,
) -> Section {
    let url = session.current_url().await.unwrap_or_else(|e| {
        log::warn!("Could not read URL of section {index}: {e}");
        String::new()
    });
    let text = session.extract_visible_text().await.unwrap_or_else(|e| {
        log::warn!("Could not read text of section {index}: {e}");
        String::new()
    });
    let html = session.extract_html().await.unwrap_or_else(|e| {
        log::warn!("Could not read HTML of section {index}: {e}");
        String::new()
    });
    let screenshot = if config.save_screenshots() {
        match session.capture_full_page_screenshot().await {
            Ok(png) => Some(png),
            Err(e) => {
                log::warn!("Screenshot of section {index} failed: {e}");
                None
            }
        }
    } else {
        None
    };
    log::info!(
        "Section {index} ({name}): {} chars of text from {url}",
        text.chars().count()
    );

    Section {
        index,
        name: name.to_string(),
        url,
        timestamp: Utc::now(),
        raw_text_length: text.chars().count(),
        html_length: html.chars().count(),
        extracted: ExtractedData::extract_for(index, &text, config.vocabulary()),
        raw_text: text,
        screenshot,
    }
}

/// Run one full scrape session on `session`.
///
/// Never fails: the outcome is encoded in the returned session's status and
/// error list. The browser is left open; closing it is the caller's job.
pub async fn run_session<P: ProgressReporter>(
    session: &dyn BrowserSession,
    config: &ScrapeConfig,
    progress: &P,
) -> ScrapeSession {
    let target = config.target_url();
    let mut result = ScrapeSession::new(target);
    progress.report_session_started(target);

    let interceptor = ResponseInterceptor::new(RelevanceFilter::for_config(config));
    interceptor.set_current_section(0);
    if let Err(e) = session.attach_interceptor(interceptor.clone()).await {
        log::warn!("API interception unavailable for this session: {e}");
    }

    let policy = RetryPolicy::from_config(config);
    let timeouts = StepTimeouts {
        page_load: config.page_load_timeout(),
        click: config.click_timeout(),
    };

    progress.report_navigation_started(target);
    let loaded = policy
        .run("load main page", |_| async move {
            with_timeout(session.navigate(target), timeouts.page_load, "page load", target).await
        })
        .await;
    if let Err(e) = loaded {
        let message = format!("Main page failed to load: {e}");
        progress.report_error(&message);
        result.errors.push(message);
        result.finish(SessionStatus::Failed, interceptor.snapshot());
        progress.report_completed(result.status, 0);
        return result;
    }

    settle(session, config).await;
    let main = capture_section(session, 0, MAIN_SECTION_NAME, config).await;
    progress.report_section_captured(0, &main.name);
    result.sections.push(main);

    let main_url = match session.current_url().await {
        Ok(url) if !url.is_empty() => url,
        _ => target.to_string(),
    };
    let main_url = main_url.as_str();

    let mut navigator = SectionNavigator::new(config.vocabulary().clone(), config.max_sections());
    let mut failed = false;

    while let Some(next) = navigator.next_target(session).await {
        let index = result.sections.len();
        interceptor.set_current_section(index);
        progress.report_navigation_started(&next.section_name);

        let nav = &navigator;
        let next_ref = &next;
        let opened = policy
            .run("open detail page", |_| async move {
                nav.open(session, next_ref, main_url, timeouts).await
            })
            .await;

        match opened {
            Ok(url) => {
                log::debug!("Opened {} at {url}", next.section_name);
                settle(session, config).await;
                let section = capture_section(session, index, &next.section_name, config).await;
                progress.report_section_captured(index, &section.name);
                result.sections.push(section);
                navigator.mark_visited(&next);
            }
            Err(ScrapeError::Interaction(reason)) => {
                log::info!("No more sections to open: {reason}");
                navigator.finish();
                break;
            }
            Err(e) => {
                let message = format!("Section {index} ({}) failed: {e}", next.section_name);
                progress.report_error(&message);
                result.errors.push(message);
                let url = session.current_url().await.unwrap_or_default();
                result.sections.push(Section::failed(index, &next.section_name, url));
                navigator.mark_failed();
                failed = true;
                break;
            }
        }

        interceptor.set_current_section(0);
        let nav = &navigator;
        let back = policy
            .run("return to main page", |_| async move {
                nav.return_to_main(session, main_url, timeouts).await
            })
            .await;
        if let Err(e) = back {
            let message = format!("Could not return to the main page: {e}");
            progress.report_error(&message);
            result.errors.push(message);
            navigator.mark_failed();
            failed = true;
            break;
        }
        navigator.mark_at_main();
        settle(session, config).await;
    }

    let status = if failed {
        SessionStatus::PartiallyFailed
    } else {
        SessionStatus::Succeeded
    };
    result.finish(status, interceptor.snapshot());
    progress.report_completed(result.status, result.sections.len());
    result
}
