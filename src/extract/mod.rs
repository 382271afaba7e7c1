//! Positional extraction of raw field values from results pages
//!
//! The results site has no semantic markup: fields are found by table index
//! and column index. Everything that depends on the page layout lives under
//! this module, so a layout change stays local to it.
//!
//! Extractors return raw strings; turning them into records is the job of
//! [`crate::builder`].

use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Selector};

pub mod index;
pub mod musher;
pub mod status;

pub use index::extract_race_ids;
pub use musher::extract_musher_page;
pub use status::extract_race_status;

/// Raw contents of a race status page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceStatusPage {
    /// Header text, "<event name> <year>"
    pub title: String,
    pub start_date: String,
    /// Checkpoint labels in route order
    pub checkpoints: Vec<String>,
    /// Musher entry IDs in page order
    pub musher_ids: Vec<u32>,
}

/// Raw contents of a musher results page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusherPage {
    /// "<bib>. <name>"
    pub name_field: String,
    /// Country as given by the flag's title attribute
    pub country: String,
    pub residence: String,
    /// Present only when the header has a seventh cell
    pub rank_field: Option<String>,
    pub rows: Vec<RawCheckpointRow>,
}

/// One row of the checkpoint log as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCheckpointRow {
    pub checkpoint: String,
    pub arrival: String,
    /// None when the row has no dog-count column
    pub dogs: Option<String>,
}

/// Compile a CSS selector used for page navigation
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::configuration(format!("invalid selector '{}': {:?}", css, e)))
}

/// Plain text of a cell with all nested markup removed.
///
/// Text directly inside the cell is kept as is; text from nested elements is
/// trimmed piecewise and concatenated. Whitespace runs collapse to a single
/// space and the result is trimmed.
pub fn cell_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            raw.push_str(text);
        } else if let Some(nested) = ElementRef::wrap(child) {
            flatten_nested(nested, &mut raw);
        }
    }
    collapse_whitespace(&raw)
}

fn flatten_nested(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text.trim());
        } else if let Some(nested) = ElementRef::wrap(child) {
            flatten_nested(nested, out);
        }
    }
}

/// Collapse whitespace runs into one space and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Rows of a table, looking through `thead`/`tbody`/`tfoot` but not into
/// nested tables
pub(crate) fn table_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|row| row.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}
