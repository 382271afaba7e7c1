//! Core data structures for races, mushers and checkpoint logs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity kinds that can be resolved to an external identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Race,
    Checkpoint,
    Musher,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Race => "race",
            EntityKind::Checkpoint => "checkpoint",
            EntityKind::Musher => "musher",
        };
        f.write_str(name)
    }
}

/// Outcome of a musher's race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalRank {
    /// Finishing place, starting at 1
    Finished(u32),
    /// Scratched with no further explanation
    DidNotFinish,
    Disqualified,
}

impl FinalRank {
    /// Legacy signed encoding: place, 0 for did-not-finish, -1 for disqualified
    pub fn as_signed(&self) -> i64 {
        match self {
            FinalRank::Finished(place) => i64::from(*place),
            FinalRank::DidNotFinish => 0,
            FinalRank::Disqualified => -1,
        }
    }

    pub fn place(&self) -> Option<u32> {
        match self {
            FinalRank::Finished(place) => Some(*place),
            _ => None,
        }
    }
}

impl fmt::Display for FinalRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalRank::Finished(place) => write!(f, "{}", place),
            FinalRank::DidNotFinish => f.write_str("did not finish"),
            FinalRank::Disqualified => f.write_str("disqualified"),
        }
    }
}

/// One edition of the race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Race {
    /// Site-assigned race ID
    pub id: u32,
    /// "<year> <event name>"
    pub label: String,
    pub year: String,
    /// Start date as printed in the page header
    pub start_date: String,
    /// Route in checkpoint order
    pub checkpoints: Vec<String>,
    /// Participating musher IDs in page order
    pub musher_ids: Vec<u32>,
    pub identifier: Option<String>,
}

impl Race {
    /// One-line description printed before the race's statements
    pub fn headline(&self) -> String {
        format!(
            "Race: {} ({}) - startdate: {}",
            self.label,
            self.identifier.as_deref().unwrap_or("?"),
            self.start_date
        )
    }
}

/// A checkpoint label with its identifier, if one is known
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckpointRef {
    pub label: String,
    pub identifier: Option<String>,
}

/// One participant's result in one race
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Musher {
    /// Site-assigned entry ID
    pub id: u32,
    /// Bib number, kept as text
    pub number: String,
    pub label: String,
    pub country: String,
    pub country_identifier: Option<String>,
    pub residence: String,
    pub final_rank: FinalRank,
    pub last_checkpoint: CheckpointRef,
    pub dogs_start: u32,
    pub dogs_end: u32,
    pub identifier: Option<String>,
}

impl Musher {
    /// Resolved fields of the musher for the run log
    pub fn summary(&self) -> String {
        format!(
            "{} ({}, {}) #{} {} ({}) rank: {} dogs: {} -> {} last: {} ({})",
            self.label,
            self.id,
            self.identifier.as_deref().unwrap_or("?"),
            self.number,
            self.country,
            self.country_identifier.as_deref().unwrap_or("?"),
            self.final_rank,
            self.dogs_start,
            self.dogs_end,
            self.last_checkpoint.label,
            self.last_checkpoint.identifier.as_deref().unwrap_or("?")
        )
    }

    /// Dog-count anomalies worth flagging for manual review
    pub fn dog_anomalies(&self) -> Vec<DogAnomalyKind> {
        let mut anomalies = Vec::new();
        if self.dogs_start == 0 {
            anomalies.push(DogAnomalyKind::NoDogsAtStart);
        }
        if self.dogs_end == 0 {
            anomalies.push(DogAnomalyKind::NoDogsAtEnd);
        }
        anomalies
    }
}

/// A row of a musher's checkpoint log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointLogEntry {
    pub checkpoint: String,
    /// Arrival time; empty when the checkpoint was not reached
    pub arrival: String,
    /// None when the row has no dog-count column or the cell is empty
    pub dogs: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogAnomalyKind {
    NoDogsAtStart,
    NoDogsAtEnd,
}

impl fmt::Display for DogAnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DogAnomalyKind::NoDogsAtStart => f.write_str("no dogs at start"),
            DogAnomalyKind::NoDogsAtEnd => f.write_str("no dogs at the end"),
        }
    }
}
