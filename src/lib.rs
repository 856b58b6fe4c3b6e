//! Headless-browser scraper for multi-page skin report dashboards
//!
//! A session loads the report, captures the main page, then follows every
//! "view more" button to a detail page and back. Each page becomes a
//! [`Section`] with extracted data and a screenshot, while JSON responses from
//! the dashboard's API are captured and tagged with the section that was
//! active when they arrived.
//!
//! ```no_run
//! use dashboard_scrape::{ChromiumLauncher, ScrapeConfig, ScrapeRunner};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = ScrapeConfig::builder()
//!     .output_dir("./complete_data")
//!     .target_url("https://dashboard.example.com/report?id=42")
//!     .build()?;
//! let session = ScrapeRunner::new(ChromiumLauncher).run(config).await?;
//! println!("{:?}: {} sections", session.status, session.sections.len());
//! # Ok(())
//! # }
//! ```

pub mod browser;
pub mod browser_setup;
pub mod cli;
pub mod config;
pub mod content_saver;
pub mod extraction;
pub mod interception;
pub mod logging;
pub mod navigation;
pub mod schema;
pub mod scrape_engine;
pub mod server;
pub mod session_gate;
pub mod utils;

pub use browser::{BrowserSession, ButtonHandle, ChromiumLauncher, ChromiumSession, SessionLauncher};
pub use browser_setup::{BrowserWrapper, find_browser_executable, launch_browser};
pub use config::ScrapeConfig;
pub use content_saver::save_session;
pub use extraction::{ReportVocabulary, extract_categories, extract_main_page};
pub use interception::{RelevanceFilter, ResponseInterceptor};
pub use navigation::{NavigatorState, SectionNavigator};
pub use schema::{
    ApiCapture, Category, ExtractedData, ScrapeSession, Section, SessionStatus, SessionSummary,
};
pub use scrape_engine::{RetryPolicy, ScrapeError, ScrapeResult, ScrapeRunner, run_session};
pub use session_gate::{SessionGate, SessionGuard};
