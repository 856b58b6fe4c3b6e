//! Configuration module for scrape sessions
//!
//! This module provides the `ScrapeConfig` struct and its type-safe builder
//! with validation and defaults shared by the CLI and the HTTP service.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, ScrapeConfigBuilder, WithOutputDir};
pub use types::ScrapeConfig;
