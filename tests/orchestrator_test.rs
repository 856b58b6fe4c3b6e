//! End-to-end session runs against the scripted browser

mod common;

use std::path::Path;

use common::{
    ButtonAction, FakeButton, FakePage, FakeSession, MAIN_TEXT, MAIN_URL, report_pages, test_config,
};
use dashboard_scrape::schema::{ExtractedData, SessionStatus};
use dashboard_scrape::scrape_engine::{NoOpProgress, run_session};

fn config() -> dashboard_scrape::ScrapeConfig {
    test_config(Path::new("unused"))
}

#[tokio::test(start_paused = true)]
async fn walks_every_detail_page_in_order() {
    let browser = FakeSession::new(report_pages());
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::Succeeded);
    assert!(session.errors.is_empty());
    let names: Vec<_> = session.sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Main_Page", "Aging_Level", "Skin_Analysis"]);
    for (i, section) in session.sections.iter().enumerate() {
        assert_eq!(section.index, i);
        assert!(section.screenshot.is_some());
    }

    match &session.sections[0].extracted {
        ExtractedData::MainPage(data) => {
            assert_eq!(data.fields["algorithm_version"], "3.2.1");
            assert_eq!(data.fields["customer_name"], "Maria Rossi");
        }
        other => panic!("main page extracted as {other:?}"),
    }
    match &session.sections[2].extracted {
        ExtractedData::CategoryReport(data) => {
            assert_eq!(data.categories.len(), 1);
            assert_eq!(data.categories[0].name, "Pori");
            assert_eq!(data.categories[0].score, "52");
        }
        other => panic!("detail page extracted as {other:?}"),
    }

    // the main page is loaded once; history brings it back afterwards
    assert_eq!(browser.navigations(), 1);
    assert_eq!(browser.clicks().len(), 2);
    assert!(session.finished_at.is_some());
}

#[tokio::test(start_paused = true)]
async fn api_responses_belong_to_the_page_that_loaded_them() {
    let browser = FakeSession::new(report_pages());
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    let owners: Vec<_> = session
        .api_captures
        .iter()
        .map(|c| (c.url.as_str(), c.owning_section_index))
        .collect();
    assert_eq!(
        owners,
        [
            (common::API_URL, 0),
            ("https://dash.example.com/api/aging", 1),
            ("https://dash.example.com/api/skin", 2),
        ]
    );
    assert_eq!(session.api_captures[0].response_body["score"], 71);
    // unparsable bodies are kept as text
    assert_eq!(session.api_captures[2].response_body, "not json");
    for capture in &session.api_captures {
        assert!(capture.owning_section_index < session.sections.len());
    }
}

#[tokio::test(start_paused = true)]
async fn main_page_without_buttons_is_a_single_section() {
    let browser = FakeSession::new(vec![(MAIN_URL, FakePage::new("Versione algoritmo: 1.0"))]);
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::Succeeded);
    assert_eq!(session.sections.len(), 1);
    assert_eq!(session.sections[0].index, 0);
    assert!(matches!(session.sections[0].extracted, ExtractedData::MainPage(_)));
}

#[tokio::test(start_paused = true)]
async fn main_page_timeout_fails_the_session() {
    let browser = FakeSession::new(report_pages()).hanging_on(MAIN_URL);
    let config = config();
    let session = run_session(&browser, &config, &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::Failed);
    assert!(session.sections.is_empty());
    assert!(session.api_captures.is_empty());
    assert_eq!(browser.navigations(), config.max_attempts() as usize);
    assert!(session.errors[0].contains("timeout"), "{:?}", session.errors);
}

#[tokio::test(start_paused = true)]
async fn unreachable_main_page_fails_the_session() {
    let browser = FakeSession::new(Vec::new());
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::Failed);
    assert!(session.sections.is_empty());
    assert_eq!(browser.navigations(), 3);
}

#[tokio::test(start_paused = true)]
async fn dead_button_keeps_earlier_sections() {
    let mut pages = report_pages();
    pages[0].1 = FakePage::new(MAIN_TEXT)
        .button(FakeButton::opens("Livello di Invecchiamento", 120.0, "https://dash.example.com/aging"))
        .button(
            FakeButton::opens("Analisi della Pelle", 480.0, "https://dash.example.com/skin")
                .with_action(ButtonAction::Inert),
        );
    let browser = FakeSession::new(pages);
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::PartiallyFailed);
    assert_eq!(session.sections.len(), 3);
    assert_eq!(session.sections[1].name, "Aging_Level");
    let failed = &session.sections[2];
    assert_eq!(failed.index, 2);
    assert!(failed.extracted.is_empty());
    assert!(failed.screenshot.is_none());
    assert_eq!(session.errors.len(), 1);
    assert!(session.errors[0].contains("Skin_Analysis"));
    // one click for the first button, three attempts for the dead one
    assert_eq!(browser.clicks().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn rejected_click_is_retried_then_abandoned() {
    let mut pages = report_pages();
    pages[0].1 = FakePage::new(MAIN_TEXT).button(
        FakeButton::opens("Livello di Invecchiamento", 120.0, "https://dash.example.com/aging")
            .with_action(ButtonAction::Reject),
    );
    let browser = FakeSession::new(pages);
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::PartiallyFailed);
    assert_eq!(session.sections.len(), 2);
    assert_eq!(browser.clicks().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn section_cap_stops_the_walk() {
    let browser = FakeSession::new(report_pages());
    let config = common::test_config_with(Path::new("unused"), |b| b.max_sections(1));
    let session = run_session(&browser, &config, &NoOpProgress).await;

    assert_eq!(session.status, SessionStatus::Succeeded);
    assert_eq!(session.sections.len(), 2);
    // captures of pages never visited cannot appear
    assert!(session.api_captures.iter().all(|c| c.owning_section_index < 2));
}

#[tokio::test(start_paused = true)]
async fn unmatched_context_names_the_section_detail() {
    let browser = FakeSession::new(vec![
        (
            MAIN_URL,
            FakePage::new(MAIN_TEXT).button(FakeButton::opens("Altro", 50.0, "https://dash.example.com/x")),
        ),
        ("https://dash.example.com/x", FakePage::new("Acne\n12")),
    ]);
    let session = run_session(&browser, &config(), &NoOpProgress).await;

    assert_eq!(session.sections[1].name, "Detail");
    assert_eq!(session.sections[1].data_file_name(), "1_Detail.json");
}

#[tokio::test(start_paused = true)]
async fn screenshots_can_be_disabled() {
    let browser = FakeSession::new(report_pages());
    let config = common::test_config_with(Path::new("unused"), |b| b.save_screenshots(false));
    let session = run_session(&browser, &config, &NoOpProgress).await;

    assert!(session.sections.iter().all(|s| s.screenshot.is_none()));
    assert!(session.summary().files.screenshots.is_empty());
}
