//! Scrape engine: session orchestration, retry policy and gated runs

pub mod orchestrator;
pub mod page_timeout;
pub mod progress;
pub mod retry;
pub mod runner;
pub mod scrape_types;

pub use orchestrator::run_session;
pub use page_timeout::with_timeout;
pub use progress::{LogProgress, NoOpProgress, ProgressReporter};
pub use retry::RetryPolicy;
pub use runner::ScrapeRunner;
pub use scrape_types::{ScrapeError, ScrapeResult};
