//! Extraction engine
//!
//! Turns the rendered text of a page into structured data. Both extractors are
//! pure functions of (text, vocabulary); the same input always produces the
//! same output.

pub mod category;
pub mod main_page;
mod text_utils;
pub mod vocabulary;

pub use category::extract_categories;
pub use main_page::extract_main_page;
pub use vocabulary::{FieldRule, ReportVocabulary, SectionRule};
