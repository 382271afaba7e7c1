//! Musher results page extraction
//!
//! The page is a stack of layout tables. Table 1 is the header: its `td`
//! cells are 0 = "<bib>. <name>", 2 = country flag, 4 = residence and, for
//! mushers with a result, 6 = rank. Table 3 is the checkpoint log: a heading
//! row followed by one row per checkpoint (name, arrival, departure, dogs, ...).

use super::{MusherPage, RawCheckpointRow, cell_text, selector};
use crate::error::{Result, ScrapeError};
use scraper::{ElementRef, Html};
use tracing::debug;

const HEADER_TABLE: usize = 1;
const LOG_TABLE: usize = 3;

const NAME_CELL: usize = 0;
const COUNTRY_CELL: usize = 2;
const RESIDENCE_CELL: usize = 4;
const RANK_CELL: usize = 6;

const CHECKPOINT_COLUMN: usize = 0;
const ARRIVAL_COLUMN: usize = 1;
const DOGS_COLUMN: usize = 3;

/// Extract header fields and the checkpoint log from a musher results page
pub fn extract_musher_page(document: &Html, source: &str) -> Result<MusherPage> {
    let tables: Vec<ElementRef> = document.select(&selector("table")?).collect();
    let td = selector("td")?;

    let header = tables.get(HEADER_TABLE).ok_or_else(|| {
        ScrapeError::extraction(
            source,
            format!("expected header table, page has {} tables", tables.len()),
        )
    })?;
    let cells: Vec<ElementRef> = header.select(&td).collect();
    if cells.len() <= RESIDENCE_CELL {
        return Err(ScrapeError::extraction(
            source,
            format!(
                "header has {} cells, expected at least {}",
                cells.len(),
                RESIDENCE_CELL + 1
            ),
        ));
    }

    let name_field = cell_text(cells[NAME_CELL]);
    let country = cells[COUNTRY_CELL]
        .select(&selector("img[title]")?)
        .next()
        .and_then(|flag| flag.value().attr("title"))
        .map(|title| title.trim().to_string())
        .ok_or_else(|| ScrapeError::extraction(source, "country flag has no title"))?;
    let residence = cell_text(cells[RESIDENCE_CELL]);
    let rank_field = cells.get(RANK_CELL).map(|cell| cell_text(*cell));

    let log = tables.get(LOG_TABLE).ok_or_else(|| {
        ScrapeError::extraction(
            source,
            format!("expected checkpoint table, page has {} tables", tables.len()),
        )
    })?;

    let mut rows = Vec::new();
    for row in log.select(&selector("tr")?).skip(1) {
        let columns: Vec<ElementRef> = row.select(&td).collect();
        if columns.len() <= ARRIVAL_COLUMN {
            continue;
        }
        rows.push(RawCheckpointRow {
            checkpoint: cell_text(columns[CHECKPOINT_COLUMN]),
            arrival: cell_text(columns[ARRIVAL_COLUMN]),
            dogs: columns.get(DOGS_COLUMN).map(|cell| cell_text(*cell)),
        });
    }

    debug!(
        "Musher page {}: '{}', {} header cells, {} checkpoint rows",
        source,
        name_field,
        cells.len(),
        rows.len()
    );

    Ok(MusherPage {
        name_field,
        country,
        residence,
        rank_field,
        rows,
    })
}
