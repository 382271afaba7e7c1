//! QuickStatements lines describing race participation

use crate::constants::properties::{PARTICIPANT, RANKING, SPORTS_NUMBER};
use crate::models::{Musher, Race};
use std::fmt;

/// One participant statement: race, musher, bib number and finishing place.
///
/// Renders as `{race} P710 {musher}`, followed by ` P1618 {bib}` when the bib
/// is known and ` P1352 {place}` when the musher finished. Missing identifiers
/// render as empty fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickStatement<'a> {
    race_identifier: Option<&'a str>,
    musher_identifier: Option<&'a str>,
    number: &'a str,
    place: Option<u32>,
}

impl<'a> QuickStatement<'a> {
    pub fn participant(race: &'a Race, musher: &'a Musher) -> Self {
        Self {
            race_identifier: race.identifier.as_deref(),
            musher_identifier: musher.identifier.as_deref(),
            number: musher.number.trim(),
            place: musher.final_rank.place(),
        }
    }

    /// Whether both ends of the statement resolved
    pub fn is_complete(&self) -> bool {
        self.race_identifier.is_some() && self.musher_identifier.is_some()
    }
}

impl fmt::Display for QuickStatement<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.race_identifier.unwrap_or_default(),
            PARTICIPANT,
            self.musher_identifier.unwrap_or_default()
        )?;
        if !self.number.is_empty() {
            write!(f, " {} {}", SPORTS_NUMBER, self.number)?;
        }
        if let Some(place) = self.place {
            write!(f, " {} {}", RANKING, place)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckpointRef, FinalRank};

    fn race(identifier: Option<&str>) -> Race {
        Race {
            id: 40,
            label: "2015 Finnmarksløpet".to_string(),
            year: "2015".to_string(),
            start_date: "2015-03-07".to_string(),
            checkpoints: vec![],
            musher_ids: vec![],
            identifier: identifier.map(str::to_string),
        }
    }

    fn musher(number: &str, final_rank: FinalRank, identifier: Option<&str>) -> Musher {
        Musher {
            id: 7,
            number: number.to_string(),
            label: "Jon Doe".to_string(),
            country: "Norway".to_string(),
            country_identifier: Some("Q20".to_string()),
            residence: "Alta".to_string(),
            final_rank,
            last_checkpoint: CheckpointRef::default(),
            dogs_start: 12,
            dogs_end: 10,
            identifier: identifier.map(str::to_string),
        }
    }

    #[test]
    fn test_finished_musher() {
        let race = race(Some("Q100"));
        let musher = musher("12", FinalRank::Finished(3), Some("Q200"));

        let statement = QuickStatement::participant(&race, &musher);
        assert_eq!(statement.to_string(), "Q100 P710 Q200 P1618 12 P1352 3");
        assert!(statement.is_complete());
    }

    #[test]
    fn test_scratched_and_disqualified_have_no_ranking() {
        let race = race(Some("Q100"));

        let scratched = musher("5", FinalRank::DidNotFinish, Some("Q200"));
        assert_eq!(
            QuickStatement::participant(&race, &scratched).to_string(),
            "Q100 P710 Q200 P1618 5"
        );

        let disqualified = musher("5", FinalRank::Disqualified, Some("Q200"));
        assert_eq!(
            QuickStatement::participant(&race, &disqualified).to_string(),
            "Q100 P710 Q200 P1618 5"
        );
    }

    #[test]
    fn test_missing_bib_number() {
        let race = race(Some("Q100"));
        let musher = musher("", FinalRank::Finished(1), Some("Q200"));

        assert_eq!(
            QuickStatement::participant(&race, &musher).to_string(),
            "Q100 P710 Q200 P1352 1"
        );
    }

    #[test]
    fn test_unresolved_identifiers_render_empty() {
        let race = race(None);
        let musher = musher("9", FinalRank::Finished(4), None);

        let statement = QuickStatement::participant(&race, &musher);
        assert_eq!(statement.to_string(), " P710  P1618 9 P1352 4");
        assert!(!statement.is_complete());
    }
}
