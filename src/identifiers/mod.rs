//! Identifier table for race, checkpoint and musher labels
//!
//! Maps display labels scraped from the site to external identifiers
//! (Wikidata QIDs). Lookups are exact: labels must be normalised by the
//! caller before resolution.

use crate::models::EntityKind;
use std::collections::HashMap;
use std::path::PathBuf;

pub mod loader;


/// Locations of the three identifier CSV files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierSources {
    pub races: PathBuf,
    pub checkpoints: PathBuf,
    pub mushers: PathBuf,
}

/// Result of looking up a label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Identifier(&'a str),
    Unresolved,
}

impl<'a> Resolution<'a> {
    pub fn identifier(self) -> Option<&'a str> {
        match self {
            Resolution::Identifier(id) => Some(id),
            Resolution::Unresolved => None,
        }
    }
}

/// Statistics about loading the identifier table
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Rows read per table
    pub race_rows: usize,
    pub checkpoint_rows: usize,
    pub musher_rows: usize,

    /// Number of alias labels registered for mushers
    pub aliases: usize,

    /// Labels seen more than once; the later entry replaced the earlier one
    pub duplicates: Vec<(EntityKind, String)>,
}

/// Read-only label → identifier mappings for one run
#[derive(Debug, Clone, Default)]
pub struct IdentifierTable {
    races: HashMap<String, String>,
    checkpoints: HashMap<String, String>,
    mushers: HashMap<String, String>,
}

impl IdentifierTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, kind: EntityKind) -> &HashMap<String, String> {
        match kind {
            EntityKind::Race => &self.races,
            EntityKind::Checkpoint => &self.checkpoints,
            EntityKind::Musher => &self.mushers,
        }
    }

    fn map_mut(&mut self, kind: EntityKind) -> &mut HashMap<String, String> {
        match kind {
            EntityKind::Race => &mut self.races,
            EntityKind::Checkpoint => &mut self.checkpoints,
            EntityKind::Musher => &mut self.mushers,
        }
    }

    /// Register a label, returning the identifier it replaced
    pub fn insert(
        &mut self,
        kind: EntityKind,
        label: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Option<String> {
        self.map_mut(kind).insert(label.into(), identifier.into())
    }

    /// Register a musher label and its aliases under one identifier.
    ///
    /// Returns the labels (canonical or alias) that were already present.
    pub fn insert_musher<'a>(
        &mut self,
        label: &'a str,
        identifier: &str,
        aliases: impl IntoIterator<Item = &'a str>,
    ) -> Vec<String> {
        let mut replaced = Vec::new();
        for name in std::iter::once(label).chain(aliases) {
            if self.insert(EntityKind::Musher, name, identifier).is_some() {
                replaced.push(name.to_string());
            }
        }
        replaced
    }

    /// Look up a label in the table for `kind`
    pub fn resolve(&self, kind: EntityKind, label: &str) -> Resolution<'_> {
        match self.map(kind).get(label) {
            Some(identifier) => Resolution::Identifier(identifier),
            None => Resolution::Unresolved,
        }
    }

    /// Number of labels (aliases included) registered for `kind`
    pub fn len(&self, kind: EntityKind) -> usize {
        self.map(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty() && self.checkpoints.is_empty() && self.mushers.is_empty()
    }
}
