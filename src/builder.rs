//! Record building from extracted page text.
//!
//! Converts the raw strings produced by [`crate::extract`] into [`Race`] and
//! [`Musher`] records: splits compound fields, coerces numbers, derives the
//! start/end dog counts and the last checkpoint reached, and applies the
//! curated data-quality corrections.

use crate::config::DataQualityConfig;
use crate::constants::{DISQUALIFIED_MARKER, STRAY_DOG_COUNT_ARTIFACT};
use crate::error::{Result, ScrapeError};
use crate::extract::{MusherPage, RaceStatusPage, RawCheckpointRow, collapse_whitespace};
use crate::models::{CheckpointLogEntry, CheckpointRef, FinalRank, Musher, Race};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

/// Values derived from a musher's checkpoint log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub dogs_start: u32,
    pub dogs_end: u32,
    pub last_checkpoint: String,
}

/// Builds records, applying the configured data-quality corrections
pub struct RecordBuilder<'a> {
    quality: &'a DataQualityConfig,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(quality: &'a DataQualityConfig) -> Self {
        Self { quality }
    }

    /// Build a race from its status page.
    ///
    /// Mushers listed as did-not-start are dropped from the participants.
    pub fn build_race(&self, race_id: u32, page: RaceStatusPage, source: &str) -> Result<Race> {
        let (year, event) = split_race_title(&page.title).ok_or_else(|| {
            ScrapeError::extraction(source, format!("no year in race title '{}'", page.title))
        })?;

        let musher_ids: Vec<u32> = page
            .musher_ids
            .into_iter()
            .filter(|id| {
                let skip = self.quality.did_not_start(*id);
                if skip {
                    debug!("Race {}: skipping musher {} (did not start)", race_id, id);
                }
                !skip
            })
            .collect();

        Ok(Race {
            id: race_id,
            label: format!("{} {}", year, event),
            year,
            start_date: page.start_date,
            checkpoints: page.checkpoints,
            musher_ids,
            identifier: None,
        })
    }

    /// Build a musher from their results page; identifiers are left unresolved
    pub fn build_musher(&self, musher_id: u32, page: MusherPage, source: &str) -> Result<Musher> {
        let (number, label) = split_name_field(&page.name_field);

        let final_rank = parse_final_rank(page.rank_field.as_deref()).unwrap_or_else(|| {
            warn!(
                "Musher {}: unreadable final rank '{}' on {}, treated as did not finish",
                musher_id,
                page.rank_field.as_deref().unwrap_or_default(),
                source
            );
            FinalRank::DidNotFinish
        });

        let log = checkpoint_log(page.rows, source)?;
        let progress = derive_progress(&log)
            .ok_or_else(|| ScrapeError::extraction(source, "checkpoint log is empty"))?;

        let (dogs_start, dogs_end) = if self.quality.overrides_dog_count(musher_id) {
            debug!(
                "Musher {}: dog counts forced to zero (was {} / {})",
                musher_id, progress.dogs_start, progress.dogs_end
            );
            (0, 0)
        } else {
            (progress.dogs_start, progress.dogs_end)
        };

        Ok(Musher {
            id: musher_id,
            number,
            label,
            country: page.country,
            country_identifier: None,
            residence: page.residence,
            final_rank,
            last_checkpoint: CheckpointRef {
                label: progress.last_checkpoint,
                identifier: None,
            },
            dogs_start,
            dogs_end,
            identifier: None,
        })
    }
}

/// Split "<event name> <year>" into (year, event name).
///
/// The first all-digit token is the year; the remaining tokens, in order,
/// form the event name.
pub fn split_race_title(title: &str) -> Option<(String, String)> {
    let tokens: Vec<&str> = title.split_whitespace().collect();
    let year_index = tokens
        .iter()
        .position(|token| token.chars().all(|c| c.is_ascii_digit()))?;

    let event = tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != year_index)
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ");

    Some((tokens[year_index].to_string(), event))
}

/// Split "<bib>. <name>" into (bib, name).
///
/// Names may contain dots themselves ("J. R. Doe"), so only the first
/// segment is the bib number; the rest is rejoined with ". ".
pub fn split_name_field(field: &str) -> (String, String) {
    let mut parts = field.split('.').map(str::trim);
    let number = parts.next().unwrap_or_default().to_string();
    let name = parts.collect::<Vec<_>>().join(". ");
    (number, collapse_whitespace(&name))
}

/// Interpret the optional seventh header cell.
///
/// Returns None when the cell is present but holds no number.
pub fn parse_final_rank(field: Option<&str>) -> Option<FinalRank> {
    let Some(text) = field.map(str::trim) else {
        return Some(FinalRank::DidNotFinish);
    };
    if text == DISQUALIFIED_MARKER {
        return Some(FinalRank::Disqualified);
    }
    NUMBER
        .find_iter(text)
        .last()
        .and_then(|place| place.as_str().parse().ok())
        .map(FinalRank::Finished)
}

/// Parse a dog-count cell; an empty cell means the count is unknown
pub fn parse_dog_count(text: &str) -> std::result::Result<Option<u32>, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if let Ok(count) = text.parse() {
        return Ok(Some(count));
    }

    let cleaned = text.replace(STRAY_DOG_COUNT_ARTIFACT, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned
        .parse()
        .map(Some)
        .map_err(|_| format!("invalid dog count '{}'", text))
}

/// Convert raw rows into log entries, parsing dog counts
pub fn checkpoint_log(rows: Vec<RawCheckpointRow>, source: &str) -> Result<Vec<CheckpointLogEntry>> {
    rows.into_iter()
        .map(|row| -> Result<CheckpointLogEntry> {
            let dogs = match row.dogs.as_deref() {
                Some(text) => parse_dog_count(text).map_err(|reason| {
                    ScrapeError::extraction(source, format!("{} at {}", reason, row.checkpoint))
                })?,
                None => None,
            };
            Ok(CheckpointLogEntry {
                checkpoint: row.checkpoint,
                arrival: row.arrival,
                dogs,
            })
        })
        .collect()
}

/// Derive start/end dog counts and the last checkpoint reached.
///
/// - start: the first row's count, whether or not it has an arrival time
/// - end: the last row in route order with a non-zero count; the site
///   prints 0 at checkpoints reached after scratching
/// - last checkpoint: the last row with an arrival time, or the first row
///   when the musher never got past the start
///
/// Unknown counts become 0. Returns None for an empty log.
pub fn derive_progress(log: &[CheckpointLogEntry]) -> Option<Progress> {
    let first = log.first()?;

    let dogs_end = log
        .iter()
        .rev()
        .find_map(|entry| entry.dogs.filter(|&count| count > 0))
        .unwrap_or(0);

    let last_checkpoint = log
        .iter()
        .rev()
        .find(|entry| !entry.arrival.is_empty())
        .unwrap_or(first)
        .checkpoint
        .clone();

    Some(Progress {
        dogs_start: first.dogs.unwrap_or(0),
        dogs_end,
        last_checkpoint,
    })
}
