use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use crate::config::ScrapeConfig;
use crate::extraction::ReportVocabulary;
use crate::utils::{DEFAULT_OUTPUT_DIR, DEFAULT_PAGE_LOAD_TIMEOUT_SECS, DEFAULT_TARGET_URL};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `dashboard_scrape=trace` (overrides RUST_LOG).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one scrape session and write the results to disk.
    Scrape(ScrapeArgs),
    /// Serve the REST API.
    Serve(ServeArgs),
}

/// Options shared by both subcommands.
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Dashboard URL to scrape.
    #[arg(long, default_value = DEFAULT_TARGET_URL)]
    pub url: String,

    /// Directory for data/, screenshots/, api_data/ and summary.json.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Show the browser window.
    #[arg(long)]
    pub headed: bool,

    /// Page load timeout per attempt.
    #[arg(long, default_value_t = DEFAULT_PAGE_LOAD_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// JSON file replacing the built-in report vocabulary.
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Do not capture screenshots.
    #[arg(long)]
    pub no_screenshots: bool,
}

impl SessionArgs {
    /// Build a validated config from the flags
    pub fn to_config(&self) -> anyhow::Result<ScrapeConfig> {
        let mut builder = ScrapeConfig::builder()
            .output_dir(&self.output_dir)
            .target_url(&self.url)
            .headless(!self.headed)
            .page_load_timeout_secs(self.timeout_secs)
            .save_screenshots(!self.no_screenshots);

        if let Some(path) = &self.vocabulary {
            let vocabulary = ReportVocabulary::from_json_file(path)
                .with_context(|| format!("load vocabulary {}", path.display()))?;
            builder = builder.vocabulary(vocabulary);
        }

        builder.build().context("invalid scrape options")
    }
}

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Defaults applied to every request.
    #[command(flatten)]
    pub session: SessionArgs,
}
