//! Shared configuration constants for dashboard scraping
//!
//! Default values used by the config builder, the orchestrator and the CLI so
//! that every entry point agrees on the same numbers.

/// Report dashboard scraped when no URL is supplied
pub const DEFAULT_TARGET_URL: &str = "https://eu-meicepro-api.meiquc.cn/meicepro-h5/pages/report/report?id=5111c64f-88bd-49de-81d2-700916ef7750&language=it";

/// Default root of the persisted layout
pub const DEFAULT_OUTPUT_DIR: &str = "./complete_data";

/// Timeout for a single `navigate()` attempt (seconds)
pub const DEFAULT_PAGE_LOAD_TIMEOUT_SECS: u64 = 30;

/// How long a click may take to produce a new page (seconds)
pub const DEFAULT_CLICK_TIMEOUT_SECS: u64 = 15;

/// Upper bound for the network-idle wait after a load (seconds)
///
/// Reaching it is not an error: the wait logs and returns.
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 10;

/// Extra pause after the page reports idle, for late client-side rendering
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Attempts per navigation or click before the step is marked failed
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Base backoff between attempts
pub const DEFAULT_RETRY_DELAY_MS: u64 = 2000;

/// Hard cap on detail sections visited in one session
pub const DEFAULT_MAX_SECTIONS: usize = 50;

/// Window of unchanged resource count treated as "network idle"
pub const NETWORK_IDLE_WINDOW_MS: u64 = 500;

/// Browser viewport
pub const VIEWPORT_WIDTH: u32 = 1920;
pub const VIEWPORT_HEIGHT: u32 = 1080;

/// Name of section 0
pub const MAIN_SECTION_NAME: &str = "Main_Page";

/// Fallback name for a detail page whose button had no recognised context
pub const DETAIL_SECTION_NAME: &str = "Detail";

/// Maximum length of the section-name part of a file name
pub const MAX_FILENAME_LENGTH: usize = 50;

/// Chrome user agent string
///
/// Keep within a few releases of current stable; the dashboard serves a
/// degraded page to unknown agents.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
