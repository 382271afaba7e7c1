//! Attach external identifiers to built races and mushers

use crate::constants::country_identifier;
use crate::error::{Result, ScrapeError};
use crate::identifiers::IdentifierTable;
use crate::models::{EntityKind, Musher, Race};
use crate::report::UnresolvedLabels;
use tracing::warn;

/// Resolves labels against a loaded identifier table.
///
/// Misses on race, musher and checkpoint labels are recorded and processing
/// continues. A country missing from the embedded country table is an error.
pub struct Resolver<'a> {
    table: &'a IdentifierTable,
}

impl<'a> Resolver<'a> {
    pub fn new(table: &'a IdentifierTable) -> Self {
        Self { table }
    }

    pub fn resolve_race(&self, race: &mut Race, unresolved: &mut UnresolvedLabels) {
        race.identifier = self.lookup(EntityKind::Race, &race.label, unresolved);
    }

    pub fn resolve_musher(
        &self,
        musher: &mut Musher,
        unresolved: &mut UnresolvedLabels,
    ) -> Result<()> {
        let country = country_identifier(&musher.country)
            .ok_or_else(|| ScrapeError::unknown_country(&musher.country))?;
        musher.country_identifier = Some(country.to_string());

        musher.identifier = self.lookup(EntityKind::Musher, &musher.label, unresolved);

        let checkpoint = &mut musher.last_checkpoint;
        checkpoint.identifier = self.lookup(EntityKind::Checkpoint, &checkpoint.label, unresolved);

        Ok(())
    }

    fn lookup(
        &self,
        kind: EntityKind,
        label: &str,
        unresolved: &mut UnresolvedLabels,
    ) -> Option<String> {
        match self.table.resolve(kind, label).identifier() {
            Some(identifier) => Some(identifier.to_string()),
            None => {
                warn!("Unknown {}: {}", kind, label);
                unresolved.record(kind, label);
                None
            }
        }
    }
}
