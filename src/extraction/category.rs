//! Category report extractor for detail pages
//!
//! A detail page renders one block per category:
//!
//! ```text
//! Pori
//! 52
//! Lieve
//! Metriche:
//! Quantità: 120
//! Area: 3.4mm²
//! Possibili cause:
//! - Esposizione UV
//! Suggerimenti per la cura:
//! - Usa la protezione solare
//! ```
//!
//! Blocks are cut at category names, then each block is cut again at its
//! section headers. Whatever cannot be located stays empty.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::text_utils::{find_block_starts, find_headers, first_keyword, first_number, split_list_items};
use super::vocabulary::ReportVocabulary;
use crate::schema::Category;

/// Table cells are separated by tabs or by runs of two or more spaces
static CELL_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\t+| {2,}").expect("Invalid cell separator regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Zone {
    Metrics,
    Causes,
    Care,
}

type MetricTable = BTreeMap<String, BTreeMap<String, String>>;

/// Extract every category block of a detail page, in document order.
///
/// Blocks are not deduplicated: a category rendered twice yields two entries.
#[must_use]
pub fn extract_categories(text: &str, vocabulary: &ReportVocabulary) -> Vec<Category> {
    let starts = find_block_starts(text, &vocabulary.category_names);
    starts
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let end = starts.get(i + 1).map_or(text.len(), |next| next.start);
            parse_block(start.kind, &text[start.end..end], vocabulary)
        })
        .collect()
}

fn parse_block(name: &str, body: &str, vocabulary: &ReportVocabulary) -> Category {
    let keywords: Vec<(Zone, &str)> = vocabulary
        .metrics_headers
        .iter()
        .map(|k| (Zone::Metrics, k.as_str()))
        .chain(vocabulary.cause_headers.iter().map(|k| (Zone::Causes, k.as_str())))
        .chain(vocabulary.care_headers.iter().map(|k| (Zone::Care, k.as_str())))
        .collect();
    let headers = find_headers(body, &keywords);

    let header_zone = &body[..headers.first().map_or(body.len(), |h| h.start)];
    let mut category = Category {
        name: name.to_string(),
        score: first_number(header_zone).unwrap_or_default().to_string(),
        severity: first_keyword(header_zone, &vocabulary.severity_keywords).map(str::to_string),
        ..Category::default()
    };

    // "key: value" lines rendered right under the score belong to the category itself
    parse_metrics(header_zone, name, false, &mut category.metrics);

    for (i, header) in headers.iter().enumerate() {
        let zone_end = headers.get(i + 1).map_or(body.len(), |next| next.start);
        let zone = &body[header.end..zone_end];
        match header.kind {
            Zone::Metrics => parse_metrics(zone, name, true, &mut category.metrics),
            Zone::Causes => category.causes.extend(split_list_items(zone)),
            Zone::Care => category.care_suggestions.extend(split_list_items(zone)),
        }
    }

    category
}

/// Fill `out` from a metrics zone.
///
/// Supported shapes, mixable within one zone:
/// - `name: value` lines, stored under the current group
/// - a bare line (or `name:` with no value) opening a new group, when
///   `open_groups` is set
/// - a table whose first row holds column names and whose following rows start
///   with the group name
fn parse_metrics(zone: &str, default_group: &str, open_groups: bool, out: &mut MetricTable) {
    let mut group = default_group.to_string();
    let mut columns: Option<Vec<String>> = None;

    for line in zone.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let cells: Vec<&str> = CELL_SEPARATOR
            .split(line)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if open_groups && cells.len() >= 2 {
            let is_header_row = columns.is_none()
                && cells.iter().all(|c| !c.chars().any(|ch| ch.is_ascii_digit()));
            if is_header_row {
                columns = Some(cells.iter().map(|c| (*c).to_string()).collect());
            } else if let Some(cols) = &columns {
                let (row_group, values) = (cells[0], &cells[1..]);
                let names = if cols.len() == cells.len() { &cols[1..] } else { &cols[..] };
                let entry = out.entry(row_group.to_string()).or_default();
                for (column, value) in names.iter().zip(values) {
                    entry.insert(column.clone(), (*value).to_string());
                }
            } else if cells.len() == 2 {
                out.entry(group.clone())
                    .or_default()
                    .insert(cells[0].to_string(), cells[1].to_string());
            } else {
                log::debug!("Skipping metric row without column names: {line}");
            }
            continue;
        }

        if let Some((key, value)) = line.split_once([':', '：']) {
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() {
                continue;
            }
            if value.is_empty() {
                if open_groups {
                    group = key.to_string();
                }
                continue;
            }
            out.entry(group.clone())
                .or_default()
                .insert(key.to_string(), value.to_string());
        } else if open_groups && !line.chars().any(|c| c.is_ascii_digit()) {
            group = line.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> ReportVocabulary {
        ReportVocabulary::default()
    }

    #[test]
    fn inline_block_with_causes_and_care() {
        let categories = extract_categories(
            "Pori ... 52 ... Causes: UV exposure; Genetics ... Care: Use sunscreen",
            &vocab(),
        );
        assert_eq!(categories.len(), 1);
        let pori = &categories[0];
        assert_eq!(pori.name, "Pori");
        assert_eq!(pori.score, "52");
        assert_eq!(pori.causes, vec!["UV exposure", "Genetics"]);
        assert_eq!(pori.care_suggestions, vec!["Use sunscreen"]);
        assert!(pori.metrics.is_empty());
    }

    #[test]
    fn multiline_blocks_in_document_order() {
        let text = "\
Rughe
45
Moderato
Metriche:
Rughe frontali
Quantità: 12
Lunghezza: 3.4mm
Zona occhi
Quantità: 4
Possibili cause:
- Invecchiamento
- Esposizione UV
Suggerimenti per la cura:
1. Retinolo
Pori
52
Lieve
Cause: Sebo in eccesso
";
        let categories = extract_categories(text, &vocab());
        assert_eq!(categories.len(), 2);

        let rughe = &categories[0];
        assert_eq!(rughe.name, "Rughe");
        assert_eq!(rughe.score, "45");
        assert_eq!(rughe.severity.as_deref(), Some("Moderato"));
        assert_eq!(rughe.metrics["Rughe frontali"]["Lunghezza"], "3.4mm");
        assert_eq!(rughe.metrics["Zona occhi"]["Quantità"], "4");
        assert_eq!(rughe.causes, vec!["Invecchiamento", "Esposizione UV"]);
        assert_eq!(rughe.care_suggestions, vec!["Retinolo"]);

        let pori = &categories[1];
        assert_eq!(pori.score, "52");
        assert_eq!(pori.severity.as_deref(), Some("Lieve"));
        assert_eq!(pori.causes, vec!["Sebo in eccesso"]);
    }

    #[test]
    fn tabular_metrics() {
        let text = "Rughe\n30\nMetriche\nZona\tQuantità\tArea\nFronte\t12\t3.4mm²\nOcchi\t5\t1.1mm²\n";
        let categories = extract_categories(text, &vocab());
        let metrics = &categories[0].metrics;
        assert_eq!(metrics["Fronte"]["Quantità"], "12");
        assert_eq!(metrics["Occhi"]["Area"], "1.1mm²");
    }

    #[test]
    fn key_values_under_score_use_category_group() {
        let text = "Macchie\n61\nNumero: 7\nCause: Sole";
        let categories = extract_categories(text, &vocab());
        assert_eq!(categories[0].metrics["Macchie"]["Numero"], "7");
        assert_eq!(categories[0].score, "61");
    }

    #[test]
    fn missing_parts_stay_empty() {
        let categories = extract_categories("Acne\nnessun dato", &vocab());
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].score, "");
        assert!(categories[0].severity.is_none());
        assert!(categories[0].causes.is_empty());
    }

    #[test]
    fn repeated_category_is_not_deduplicated() {
        let categories = extract_categories("Pori 10\nPori 20\n", &vocab());
        let scores: Vec<&str> = categories.iter().map(|c| c.score.as_str()).collect();
        assert_eq!(scores, vec!["10", "20"]);
    }

    #[test]
    fn text_without_categories_yields_nothing() {
        assert!(extract_categories("Versione algoritmo: 2.1", &vocab()).is_empty());
        assert!(extract_categories("", &vocab()).is_empty());
    }
}
