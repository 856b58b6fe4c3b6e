//! Vocabulary tables driving navigation and extraction
//!
//! The report layout is recognised purely from these phrases. When the source
//! site changes its wording, edit (or load) a different vocabulary; the parsers
//! stay untouched.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One named field pulled from the main page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Key under which the value is stored in `MainPageData.fields`
    pub name: String,
    /// Labels that precede the value, tried in order
    #[serde(default)]
    pub labels: Vec<String>,
    /// Optional regex over the whole page text; capture group 1 (or the whole
    /// match) is used when no label matched
    #[serde(default)]
    pub pattern: Option<String>,
}

impl FieldRule {
    fn labelled(name: &str, labels: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            pattern: None,
        }
    }
}

/// Maps a phrase found in a button's surrounding context to a section name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    pub phrase: String,
    pub name: String,
}

/// All externally supplied phrase tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportVocabulary {
    /// "View more" button labels (case-sensitive substring match)
    pub button_labels: Vec<String>,
    /// Context phrase → section name for detail pages
    pub section_rules: Vec<SectionRule>,
    /// Category names that open a block in a detail page
    pub category_names: Vec<String>,
    /// Severity keywords recognised in a category header
    pub severity_keywords: Vec<String>,
    /// Headers opening the nested metric table
    pub metrics_headers: Vec<String>,
    /// Headers opening the causes list
    pub cause_headers: Vec<String>,
    /// Headers opening the care-suggestion list
    pub care_headers: Vec<String>,
    /// Fields read from the main page
    pub main_page_fields: Vec<FieldRule>,
}

impl Default for ReportVocabulary {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        }

        Self {
            button_labels: strings(&["Visualizza di più"]),
            section_rules: vec![
                SectionRule {
                    phrase: "Livello di Invecchiamento".to_string(),
                    name: "Aging_Level".to_string(),
                },
                SectionRule {
                    phrase: "Analisi della Pelle".to_string(),
                    name: "Skin_Analysis".to_string(),
                },
            ],
            category_names: strings(&[
                "Rughe",
                "Rughe sottili",
                "Zampe di gallina",
                "Pieghe nasolabiali",
                "Rilassamento",
                "Pori",
                "Punti neri",
                "Acne",
                "Macchie",
                "Pigmentazione",
                "Rossori",
                "Sensibilità",
                "Occhiaie",
                "Borse sotto gli occhi",
                "Texture",
                "Idratazione",
                "Oleosità",
                "Elasticità",
                "Luminosità",
            ]),
            severity_keywords: strings(&[
                "Eccellente",
                "Buono",
                "Normale",
                "Lieve",
                "Moderato",
                "Grave",
                "Severo",
            ]),
            metrics_headers: strings(&["Metriche", "Dettagli", "Metrics"]),
            cause_headers: strings(&["Possibili cause", "Cause", "Causes"]),
            care_headers: strings(&[
                "Suggerimenti per la cura",
                "Consigli per la cura",
                "Suggerimenti",
                "Care suggestions",
                "Care",
            ]),
            main_page_fields: vec![
                FieldRule::labelled(
                    "algorithm_version",
                    &["Versione algoritmo", "Versione dell'algoritmo", "Algorithm version"],
                ),
                FieldRule {
                    name: "report_date".to_string(),
                    labels: strings(&["Data del report", "Data", "Report date"]),
                    pattern: Some(r"(\d{4}[-/.]\d{1,2}[-/.]\d{1,2}(?:\s+\d{1,2}:\d{2}(?::\d{2})?)?)".to_string()),
                },
                FieldRule::labelled("customer_name", &["Nome cliente", "Cliente", "Nome", "Customer"]),
                FieldRule::labelled("age", &["Età", "Age"]),
                FieldRule::labelled("gender", &["Sesso", "Genere", "Gender"]),
                FieldRule::labelled("skin_type", &["Tipo di pelle", "Skin type"]),
                FieldRule::labelled("skin_age", &["Età della pelle", "Skin age"]),
                FieldRule::labelled("overall_score", &["Punteggio complessivo", "Punteggio", "Score"]),
            ],
        }
    }
}

impl ReportVocabulary {
    /// Load a vocabulary from a JSON file; missing tables fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse vocabulary file {}", path.display()))
    }

    /// Section name for a button whose surrounding context matched `phrase`.
    #[must_use]
    pub fn section_name_for(&self, phrase: &str) -> Option<&str> {
        self.section_rules
            .iter()
            .find(|rule| rule.phrase == phrase)
            .map(|rule| rule.name.as_str())
    }

    /// Context phrases in the order they should be tried.
    #[must_use]
    pub fn section_phrases(&self) -> Vec<String> {
        self.section_rules.iter().map(|r| r.phrase.clone()).collect()
    }
}
