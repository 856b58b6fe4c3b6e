//! Data model produced by a scrape run
//!
//! `ScrapeSession` owns everything a run collected: the ordered sections, the
//! intercepted API traffic and the final status. The persisted layout and the
//! REST response are both plain serialisations of these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extraction::{ReportVocabulary, extract_categories, extract_main_page};
use crate::utils::sanitize_section_name;

/// Lifecycle of a session. Frozen once the run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Succeeded,
    PartiallyFailed,
    Failed,
}

/// Key/value metadata scraped from the main page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainPageData {
    pub fields: BTreeMap<String, String>,
}

/// One category block of a detail page.
///
/// `score` is kept as the text the report rendered; no numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub score: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// metric group → sub-metric → value (unit suffix kept verbatim)
    pub metrics: BTreeMap<String, BTreeMap<String, String>>,
    pub causes: Vec<String>,
    pub care_suggestions: Vec<String>,
}

/// All category blocks of a detail page, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryReportData {
    pub categories: Vec<Category>,
}

/// Extraction result of a section.
///
/// The variant is chosen by section index, never by looking at the content:
/// index 0 is the main page, every other index is a category report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractedData {
    MainPage(MainPageData),
    CategoryReport(CategoryReportData),
}

impl ExtractedData {
    /// Empty data of the shape owed to `index`
    #[must_use]
    pub fn empty_for(index: usize) -> Self {
        if index == 0 {
            Self::MainPage(MainPageData::default())
        } else {
            Self::CategoryReport(CategoryReportData::default())
        }
    }

    /// Run the extractor owed to `index` over the page text
    #[must_use]
    pub fn extract_for(index: usize, text: &str, vocabulary: &ReportVocabulary) -> Self {
        if index == 0 {
            Self::MainPage(extract_main_page(text, vocabulary))
        } else {
            Self::CategoryReport(CategoryReportData {
                categories: extract_categories(text, vocabulary),
            })
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::MainPage(data) => data.fields.is_empty(),
            Self::CategoryReport(data) => data.categories.is_empty(),
        }
    }
}

/// One navigated page of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub index: usize,
    pub name: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "text_length")]
    pub raw_text_length: usize,
    pub html_length: usize,
    pub extracted: ExtractedData,
    #[serde(rename = "text_content")]
    pub raw_text: String,
    /// PNG bytes; written to `screenshots/`, never inlined in JSON
    #[serde(skip)]
    pub screenshot: Option<Vec<u8>>,
}

impl Section {
    /// Placeholder for a step that failed: keeps the index occupied
    #[must_use]
    pub fn failed(index: usize, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            url: url.into(),
            timestamp: Utc::now(),
            raw_text_length: 0,
            html_length: 0,
            extracted: ExtractedData::empty_for(index),
            raw_text: String::new(),
            screenshot: None,
        }
    }

    /// `<index>_<SectionName>`, shared by every file of this section
    #[must_use]
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.index, sanitize_section_name(&self.name))
    }

    #[must_use]
    pub fn data_file_name(&self) -> String {
        format!("{}.json", self.file_stem())
    }

    #[must_use]
    pub fn screenshot_file_name(&self) -> String {
        format!("{}.png", self.file_stem())
    }

    /// Name of the `n`-th (1-based) API capture owned by this section
    #[must_use]
    pub fn api_file_name(&self, n: usize) -> String {
        format!("{}_api_{n}.json", self.file_stem())
    }
}

/// One intercepted backend response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCapture {
    pub url: String,
    pub method: String,
    pub status: u16,
    /// Parsed JSON, or the raw text when the body was not JSON
    pub response_body: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub owning_section_index: usize,
}

/// File names written for a session, grouped by directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFiles {
    pub data: Vec<String>,
    pub screenshots: Vec<String>,
    pub api_data: Vec<String>,
}

/// Counts and file names of a finished session (`summary.json`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub scrape_timestamp: DateTime<Utc>,
    pub target_url: String,
    pub status: SessionStatus,
    pub total_sections: usize,
    pub total_api_captures: usize,
    pub files: SummaryFiles,
    pub errors: Vec<String>,
}

/// Everything one orchestrator run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeSession {
    pub session_id: String,
    pub target_url: String,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    pub sections: Vec<Section>,
    pub api_captures: Vec<ApiCapture>,
    pub status: SessionStatus,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ScrapeSession {
    #[must_use]
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            target_url: target_url.into(),
            started_at: Utc::now(),
            finished_at: None,
            sections: Vec::new(),
            api_captures: Vec::new(),
            status: SessionStatus::Running,
            errors: Vec::new(),
        }
    }

    /// Freeze the session.
    ///
    /// Captures whose owning section never came into existence are dropped so
    /// that every kept capture references a real section.
    pub fn finish(&mut self, status: SessionStatus, captures: Vec<ApiCapture>) {
        let section_count = self.sections.len();
        let before = captures.len();
        self.api_captures = captures
            .into_iter()
            .filter(|capture| capture.owning_section_index < section_count)
            .collect();
        let dropped = before - self.api_captures.len();
        if dropped > 0 {
            log::debug!("Dropped {dropped} API captures with no owning section");
        }
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    /// Captures owned by `index`, in arrival order
    pub fn captures_for(&self, index: usize) -> impl Iterator<Item = &ApiCapture> {
        self.api_captures
            .iter()
            .filter(move |capture| capture.owning_section_index == index)
    }

    /// Build the summary record, including the file names of the persisted layout
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let mut files = SummaryFiles::default();
        for section in &self.sections {
            files.data.push(section.data_file_name());
            if section.screenshot.is_some() {
                files.screenshots.push(section.screenshot_file_name());
            }
            for (n, _) in self.captures_for(section.index).enumerate() {
                files.api_data.push(section.api_file_name(n + 1));
            }
        }

        SessionSummary {
            session_id: self.session_id.clone(),
            scrape_timestamp: self.finished_at.unwrap_or_else(Utc::now),
            target_url: self.target_url.clone(),
            status: self.status,
            total_sections: self.sections.len(),
            total_api_captures: self.api_captures.len(),
            files,
            errors: self.errors.clone(),
        }
    }
}
