//! Main page metadata extractor

use regex::Regex;
use std::collections::BTreeMap;

use super::vocabulary::{FieldRule, ReportVocabulary};
use crate::schema::MainPageData;

/// Pull the configured fields out of the main page text.
///
/// For each field the labels are tried in order. A label followed by a colon
/// yields the rest of its line (or the next line when that is empty); a label
/// alone on its line yields the next non-empty line. When no label matches the
/// field's regex is tried over the whole text. Fields that are not found are
/// left out; nothing is guessed.
#[must_use]
pub fn extract_main_page(text: &str, vocabulary: &ReportVocabulary) -> MainPageData {
    let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let fields: BTreeMap<String, String> = vocabulary
        .main_page_fields
        .iter()
        .filter_map(|rule| {
            labelled_value(&lines, &rule.labels)
                .or_else(|| pattern_value(text, rule))
                .map(|value| (rule.name.clone(), value))
        })
        .collect();

    MainPageData { fields }
}

fn labelled_value(lines: &[&str], labels: &[String]) -> Option<String> {
    for label in labels.iter().filter(|l| !l.is_empty()) {
        for (i, line) in lines.iter().enumerate() {
            let Some(rest) = line.strip_prefix(label.as_str()) else {
                continue;
            };
            let rest = rest.trim_start();
            let inline = match rest.strip_prefix([':', '：']) {
                Some(value) => value.trim(),
                None if rest.is_empty() => "",
                // label is only the prefix of a longer phrase
                None => continue,
            };
            if !inline.is_empty() {
                return Some(inline.to_string());
            }
            if let Some(next) = lines.get(i + 1) {
                return Some((*next).to_string());
            }
        }
    }
    None
}

fn pattern_value(text: &str, rule: &FieldRule) -> Option<String> {
    let pattern = rule.pattern.as_deref()?;
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            log::warn!("Invalid pattern for field '{}': {e}", rule.name);
            return None;
        }
    };
    let captures = regex.captures(text)?;
    captures
        .get(1)
        .or_else(|| captures.get(0))
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_with_colon_and_on_own_line() {
        let text = "\
Versione algoritmo: 3.2.1
Nome cliente
Maria Rossi
Età: 34
Età della pelle: 38
Tipo di pelle:
Mista
";
        let data = extract_main_page(text, &ReportVocabulary::default());
        assert_eq!(data.fields["algorithm_version"], "3.2.1");
        assert_eq!(data.fields["customer_name"], "Maria Rossi");
        assert_eq!(data.fields["age"], "34");
        assert_eq!(data.fields["skin_age"], "38");
        assert_eq!(data.fields["skin_type"], "Mista");
    }

    #[test]
    fn pattern_is_the_fallback() {
        let data = extract_main_page("Report generato il 2024-05-17 10:22", &ReportVocabulary::default());
        assert_eq!(data.fields["report_date"], "2024-05-17 10:22");
    }

    #[test]
    fn missing_fields_are_omitted() {
        let data = extract_main_page("niente da vedere", &ReportVocabulary::default());
        assert!(data.fields.is_empty());
    }

    #[test]
    fn invalid_pattern_is_ignored() {
        let mut vocab = ReportVocabulary::default();
        vocab.main_page_fields = vec![FieldRule {
            name: "broken".to_string(),
            labels: Vec::new(),
            pattern: Some("(".to_string()),
        }];
        assert!(extract_main_page("anything", &vocab).fields.is_empty());
    }
}
