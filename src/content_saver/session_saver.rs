//! Persisted layout of a scrape session
//!
//! ```text
//! <output_dir>/
//!   data/<i>_<Name>.json
//!   screenshots/<i>_<Name>.png
//!   api_data/<i>_<Name>_api_<n>.json
//!   summary.json
//! ```
//!
//! File names come from [`Section`](crate::schema::Section), so the summary
//! always lists exactly the files written here.

use anyhow::Context;
use std::path::Path;

use super::json_saver::save_serializable;
use crate::scrape_engine::{ScrapeError, ScrapeResult};
use crate::schema::{ScrapeSession, SessionSummary};

pub const DATA_DIR: &str = "data";
pub const SCREENSHOTS_DIR: &str = "screenshots";
pub const API_DATA_DIR: &str = "api_data";
pub const SUMMARY_FILE: &str = "summary.json";

fn persistence(err: anyhow::Error) -> ScrapeError {
    ScrapeError::Persistence(format!("{err:#}"))
}

/// Write every section, screenshot and API capture of `session` below
/// `output_dir`, then the summary. Returns the summary that was written.
pub async fn save_session(session: &ScrapeSession, output_dir: &Path) -> ScrapeResult<SessionSummary> {
    let data_dir = output_dir.join(DATA_DIR);
    let screenshots_dir = output_dir.join(SCREENSHOTS_DIR);
    let api_dir = output_dir.join(API_DATA_DIR);
    for dir in [&data_dir, &screenshots_dir, &api_dir] {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create {}", dir.display()))
            .map_err(persistence)?;
    }

    for section in &session.sections {
        save_serializable(section, &data_dir.join(section.data_file_name()))
            .await
            .map_err(persistence)?;

        if let Some(png) = &section.screenshot {
            let path = screenshots_dir.join(section.screenshot_file_name());
            tokio::fs::write(&path, png)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))
                .map_err(persistence)?;
        }

        for (n, capture) in session.captures_for(section.index).enumerate() {
            save_serializable(capture, &api_dir.join(section.api_file_name(n + 1)))
                .await
                .map_err(persistence)?;
        }
    }

    let summary = session.summary();
    save_serializable(&summary, &output_dir.join(SUMMARY_FILE))
        .await
        .map_err(persistence)?;
    log::debug!("Wrote persisted layout to {}", output_dir.display());
    Ok(summary)
}
