//! Identifier table loading
//!
//! Reads the race, checkpoint and musher CSV files. Each file needs a header
//! row naming its columns; the musher file may carry a pipe-separated alias
//! column.

use super::{IdentifierSources, IdentifierTable, LoadStats};
use crate::constants::{ALIAS_SEPARATOR, columns};
use crate::error::{Result, ScrapeError};
use crate::models::EntityKind;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct RaceRow {
    #[serde(rename = "race")]
    label: String,
    qid: String,
}

#[derive(Debug, Deserialize)]
struct CheckpointRow {
    #[serde(rename = "Checkpoint")]
    label: String,
    qid: String,
}

#[derive(Debug, Deserialize)]
struct MusherRow {
    label: String,
    qid: String,
    #[serde(default)]
    alias: Option<String>,
}

impl MusherRow {
    fn aliases(&self) -> impl Iterator<Item = &str> {
        self.alias
            .as_deref()
            .unwrap_or_default()
            .split(ALIAS_SEPARATOR)
            .map(str::trim)
            .filter(|alias| !alias.is_empty())
    }
}

impl IdentifierTable {
    /// Load all three identifier tables
    ///
    /// # Errors
    /// * `ScrapeError::IdentifierSourceMissing` if a file cannot be opened
    /// * `ScrapeError::IdentifierSourceMalformed` if a file lacks an expected
    ///   column or has an undecodable row
    pub fn load(sources: &IdentifierSources) -> Result<(Self, LoadStats)> {
        info!(
            "Loading identifier tables: {}, {}, {}",
            sources.races.display(),
            sources.checkpoints.display(),
            sources.mushers.display()
        );

        let mut table = Self::new();
        let mut stats = LoadStats::default();

        let races: Vec<RaceRow> =
            read_rows(&sources.races, &[columns::RACE_LABEL, columns::IDENTIFIER])?;
        stats.race_rows = races.len();
        for row in races {
            table.insert_reporting(EntityKind::Race, row.label, row.qid, &mut stats);
        }

        let checkpoints: Vec<CheckpointRow> = read_rows(
            &sources.checkpoints,
            &[columns::CHECKPOINT_LABEL, columns::IDENTIFIER],
        )?;
        stats.checkpoint_rows = checkpoints.len();
        for row in checkpoints {
            table.insert_reporting(EntityKind::Checkpoint, row.label, row.qid, &mut stats);
        }

        let mushers: Vec<MusherRow> =
            read_rows(&sources.mushers, &[columns::MUSHER_LABEL, columns::IDENTIFIER])?;
        stats.musher_rows = mushers.len();
        for row in &mushers {
            let aliases: Vec<&str> = row.aliases().collect();
            stats.aliases += aliases.len();

            for duplicate in table.insert_musher(&row.label, &row.qid, aliases) {
                warn!("Duplicate musher: {}", duplicate);
                stats.duplicates.push((EntityKind::Musher, duplicate));
            }
        }

        info!(
            "Identifier tables loaded: {} races, {} checkpoints, {} mushers ({} aliases), {} duplicates",
            stats.race_rows,
            stats.checkpoint_rows,
            stats.musher_rows,
            stats.aliases,
            stats.duplicates.len()
        );

        Ok((table, stats))
    }

    fn insert_reporting(
        &mut self,
        kind: EntityKind,
        label: String,
        identifier: String,
        stats: &mut LoadStats,
    ) {
        if self.insert(kind, label.clone(), identifier).is_some() {
            warn!("Duplicate {}: {}", kind, label);
            stats.duplicates.push((kind, label));
        }
    }
}

/// Open a CSV file and decode every row
fn read_rows<T: DeserializeOwned>(path: &Path, required: &[&str]) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| ScrapeError::source_missing(path, e))?;
    read_rows_from(file, path, required)
}

/// Decode every row of a CSV stream, checking the header first
pub(crate) fn read_rows_from<R: Read, T: DeserializeOwned>(
    input: R,
    path: &Path,
    required: &[&str],
) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ScrapeError::source_malformed(path, format!("unreadable header: {}", e)))?
        .clone();

    for column in required {
        if !headers.iter().any(|header| header == *column) {
            return Err(ScrapeError::source_malformed(
                path,
                format!("missing column '{}'", column),
            ));
        }
    }

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize().enumerate() {
        // +2: one for the header, one for 1-based line numbers
        let row = record.map_err(|e| {
            ScrapeError::source_malformed(path, format!("line {}: {}", index + 2, e))
        })?;
        rows.push(row);
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
