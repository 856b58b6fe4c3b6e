//! Writing scrape results to disk

pub mod json_saver;
pub mod session_saver;

pub use json_saver::{save_json, save_serializable};
pub use session_saver::{API_DATA_DIR, DATA_DIR, SCREENSHOTS_DIR, SUMMARY_FILE, save_session};
