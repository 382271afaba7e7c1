//! Race status grid extraction
//!
//! Layout of the status page:
//! - `#rshead` holds `<span>` elements: 0 = "<event> <year>", 2 = start date
//! - `#status-grid` is a nested-table grid; its first row is a title, its
//!   second row is the route (checkpoint icons separated by arrow cells) and
//!   each following row links to one musher's results page.

use super::{RaceStatusPage, cell_text, selector, table_rows};
use crate::error::{Result, ScrapeError};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::debug;

static TRAILING_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)$").expect("trailing id pattern is valid"));

/// Extract header, route and participants from a race status page
pub fn extract_race_status(document: &Html, source: &str) -> Result<RaceStatusPage> {
    let spans: Vec<ElementRef> = document.select(&selector("#rshead span")?).collect();
    if spans.len() < 3 {
        return Err(ScrapeError::extraction(
            source,
            format!("expected 3 spans in #rshead, found {}", spans.len()),
        ));
    }
    let title = cell_text(spans[0]);
    let start_date = cell_text(spans[2]);

    let grid = document
        .select(&selector("#status-grid")?)
        .next()
        .ok_or_else(|| ScrapeError::extraction(source, "missing #status-grid"))?;

    let table = if grid.value().name() == "table" {
        grid
    } else {
        grid.children()
            .filter_map(ElementRef::wrap)
            .next()
            .ok_or_else(|| ScrapeError::extraction(source, "#status-grid is empty"))?
    };

    let mut rows = table_rows(table).into_iter();

    // Title row
    rows.next()
        .ok_or_else(|| ScrapeError::extraction(source, "status grid has no title row"))?;

    let route_row = rows
        .next()
        .ok_or_else(|| ScrapeError::extraction(source, "status grid has no route row"))?;
    let checkpoints = extract_route(route_row, source)?;

    let musher_ids: Vec<u32> = rows.filter_map(musher_id_from_row).collect();

    debug!(
        "Status page {}: {} checkpoints, {} mushers",
        source,
        checkpoints.len(),
        musher_ids.len()
    );

    Ok(RaceStatusPage {
        title,
        start_date,
        checkpoints,
        musher_ids,
    })
}

/// Checkpoint labels from the route row; odd cells are arrows
fn extract_route(row: ElementRef<'_>, source: &str) -> Result<Vec<String>> {
    let td = selector("td")?;
    let img = selector("img[title]")?;

    let mut checkpoints = Vec::new();
    for (position, cell) in row.select(&td).step_by(2).enumerate() {
        let title = cell
            .select(&img)
            .next()
            .and_then(|icon| icon.value().attr("title"))
            .ok_or_else(|| {
                ScrapeError::extraction(
                    source,
                    format!("route cell {} has no titled checkpoint icon", position * 2),
                )
            })?;

        // Titles read "<checkpoint>: <details>"
        let label = title.split(':').next().unwrap_or_default().trim();
        checkpoints.push(label.to_string());
    }

    if checkpoints.is_empty() {
        return Err(ScrapeError::extraction(source, "route row has no checkpoints"));
    }
    Ok(checkpoints)
}

/// Entry ID from the first results link of a participant row
fn musher_id_from_row(row: ElementRef<'_>) -> Option<u32> {
    let link = selector("a[href]").ok()?;
    row.select(&link)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find_map(|href| TRAILING_ID.captures(href.trim()))
        .and_then(|caps| caps[1].parse().ok())
}
