//! Type-safe builder for `ScrapeConfig` using the typestate pattern
//!
//! The output directory and the target URL must be supplied, in that order,
//! before `build()` becomes available.

use anyhow::{Result, anyhow, bail};
use std::marker::PhantomData;
use std::path::PathBuf;

use super::types::ScrapeConfig;

// Type states for the builder
pub struct WithOutputDir;
pub struct Complete;

pub struct ScrapeConfigBuilder<State = ()> {
    pub(crate) draft: ScrapeConfig,
    pub(crate) _phantom: PhantomData<State>,
}

impl Default for ScrapeConfigBuilder<()> {
    fn default() -> Self {
        Self {
            draft: ScrapeConfig::default(),
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfig {
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder<()> {
        ScrapeConfigBuilder::default()
    }
}

impl<State> ScrapeConfigBuilder<State> {
    fn transition<Next>(self) -> ScrapeConfigBuilder<Next> {
        ScrapeConfigBuilder {
            draft: self.draft,
            _phantom: PhantomData,
        }
    }
}

impl ScrapeConfigBuilder<()> {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> ScrapeConfigBuilder<WithOutputDir> {
        self.draft.output_dir = dir.into();
        self.transition()
    }
}

impl ScrapeConfigBuilder<WithOutputDir> {
    /// Set the dashboard URL. A missing scheme defaults to `https://`.
    pub fn target_url(mut self, url: impl Into<String>) -> ScrapeConfigBuilder<Complete> {
        let url = url.into();
        let url = url.trim();
        self.draft.target_url = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("https://{url}")
        };
        self.transition()
    }
}

impl ScrapeConfigBuilder<Complete> {
    /// Validate and produce the config
    ///
    /// # Errors
    ///
    /// Fails when the target URL does not parse or has no host, or when the
    /// output directory is empty.
    pub fn build(self) -> Result<ScrapeConfig> {
        let mut config = self.draft;

        let parsed = url::Url::parse(&config.target_url)
            .map_err(|e| anyhow!("Invalid target URL '{}': {e}", config.target_url))?;
        let Some(host) = parsed.host_str() else {
            bail!("Target URL '{}' has no host", config.target_url);
        };
        if config.output_dir.as_os_str().is_empty() {
            bail!("Output directory must not be empty");
        }

        if config.api_host.is_none() {
            config.api_host = Some(host.to_string());
        }
        config.max_attempts = config.max_attempts.max(1);

        Ok(config)
    }
}
