//! Historical results index: the list of race IDs

use super::selector;
use crate::error::Result;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use tracing::debug;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\b").expect("number pattern is valid"));

/// Race IDs linked from the winners table, in listing order without repeats
pub fn extract_race_ids(document: &Html) -> Result<Vec<u32>> {
    let links = selector("table.winners a[href]")?;

    let mut race_ids = Vec::new();
    for anchor in document.select(&links) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(race_id) = FIRST_NUMBER
            .captures(href)
            .and_then(|caps| caps[1].parse::<u32>().ok())
        else {
            debug!("Skipping winners link without a race id: {}", href);
            continue;
        };
        if !race_ids.contains(&race_id) {
            race_ids.push(race_id);
        }
    }

    debug!("Found {} races on the index page", race_ids.len());
    Ok(race_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_race_ids() {
        let document = Html::parse_document(
            r#"<table class="winners">
                 <tr><td><a href="/race/results/status.jsp?rid=40">2015</a></td></tr>
                 <tr><td><a href="/race/results/status.jsp?rid=38">2014</a></td>
                     <td><a href="/race/results/status.jsp?rid=38">again</a></td></tr>
                 <tr><td><a href="/about.jsp">about</a></td></tr>
               </table>
               <table><tr><td><a href="/race/results/status.jsp?rid=99">other</a></td></tr></table>"#,
        );

        assert_eq!(extract_race_ids(&document).unwrap(), vec![40, 38]);
    }

    #[test]
    fn test_index_without_winners_table() {
        let document = Html::parse_document("<p>maintenance</p>");
        assert!(extract_race_ids(&document).unwrap().is_empty());
    }
}
