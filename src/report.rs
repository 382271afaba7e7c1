//! Run-scoped accumulators and the end-of-run report.
//!
//! Everything a run learns besides the statements themselves (labels that
//! failed resolution, distinct values seen, dog-count anomalies, units that
//! failed) is collected here and owned by the run controller.

use crate::error::{Result, ScrapeError};
use crate::models::{DogAnomalyKind, EntityKind, Musher, Race};
use colored::*;
use std::fs;
use std::path::Path;
use tracing::info;

/// Labels that failed resolution, in the order they were met
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnresolvedLabels {
    pub races: Vec<String>,
    pub checkpoints: Vec<String>,
    pub mushers: Vec<String>,
}

impl UnresolvedLabels {
    pub fn record(&mut self, kind: EntityKind, label: &str) {
        let registry = match kind {
            EntityKind::Race => &mut self.races,
            EntityKind::Checkpoint => &mut self.checkpoints,
            EntityKind::Musher => &mut self.mushers,
        };
        registry.push(label.to_string());
    }

    pub fn get(&self, kind: EntityKind) -> &[String] {
        match kind {
            EntityKind::Race => &self.races,
            EntityKind::Checkpoint => &self.checkpoints,
            EntityKind::Musher => &self.mushers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty() && self.checkpoints.is_empty() && self.mushers.is_empty()
    }
}

/// Distinct values met during the run, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct SeenLabels {
    pub checkpoints: Vec<String>,
    pub countries: Vec<String>,
    pub residences: Vec<String>,
    /// Every musher label processed, repeats included
    pub mushers: Vec<String>,
}

impl SeenLabels {
    pub fn record_race(&mut self, race: &Race) {
        for checkpoint in &race.checkpoints {
            push_distinct(&mut self.checkpoints, checkpoint);
        }
    }

    pub fn record_musher(&mut self, musher: &Musher) {
        self.mushers.push(musher.label.clone());
        push_distinct(&mut self.countries, &musher.country);
        push_distinct(&mut self.residences, &musher.residence);
    }
}

fn push_distinct(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

/// A musher whose dog counts look wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogAnomaly {
    pub kind: DogAnomalyKind,
    pub musher_label: String,
    pub musher_id: u32,
    pub race_label: String,
    pub race_identifier: Option<String>,
    pub final_rank: i64,
}

impl std::fmt::Display for DogAnomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) in the {} ({})",
            self.musher_label,
            self.musher_id,
            self.race_label,
            self.race_identifier.as_deref().unwrap_or_default()
        )?;
        if self.kind == DogAnomalyKind::NoDogsAtEnd {
            write!(f, " -- Final rank: {}", self.final_rank)?;
        }
        Ok(())
    }
}

/// A race or musher that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitFailure {
    pub race_id: u32,
    pub musher_id: Option<u32>,
    pub error: String,
}

impl std::fmt::Display for UnitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.musher_id {
            Some(musher_id) => write!(
                f,
                "race {} musher {}: {}",
                self.race_id, musher_id, self.error
            ),
            None => write!(f, "race {}: {}", self.race_id, self.error),
        }
    }
}

/// Everything produced by one run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Statements in processing order
    pub statements: Vec<String>,
    pub unresolved: UnresolvedLabels,
    pub seen: SeenLabels,
    pub anomalies: Vec<DogAnomaly>,
    pub failures: Vec<UnitFailure>,
    pub races_processed: usize,
    pub mushers_processed: usize,
    /// Statements emitted with an empty race or musher identifier
    pub incomplete_statements: usize,
}

impl RunReport {
    pub fn record_anomaly(&mut self, kind: DogAnomalyKind, race: &Race, musher: &Musher) {
        self.anomalies.push(DogAnomaly {
            kind,
            musher_label: musher.label.clone(),
            musher_id: musher.id,
            race_label: race.label.clone(),
            race_identifier: race.identifier.clone(),
            final_rank: musher.final_rank.as_signed(),
        });
    }

    pub fn record_failure(&mut self, race_id: u32, musher_id: Option<u32>, error: &ScrapeError) {
        self.failures.push(UnitFailure {
            race_id,
            musher_id,
            error: error.to_string(),
        });
    }

    pub fn anomalies_of(&self, kind: DogAnomalyKind) -> impl Iterator<Item = &DogAnomaly> {
        self.anomalies.iter().filter(move |anomaly| anomaly.kind == kind)
    }

    /// Write all statements to `path`, one per line; nothing is written when
    /// there are no statements.
    ///
    /// Returns whether a file was written.
    pub fn write_statements(&self, path: &Path) -> Result<bool> {
        if self.statements.is_empty() {
            return Ok(false);
        }

        let mut content = self.statements.join("\n");
        content.push('\n');
        fs::write(path, content).map_err(|source| ScrapeError::Output {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            "Wrote {} statements to {}",
            self.statements.len(),
            path.display()
        );
        Ok(true)
    }

    /// Short summary printed at the end of every run
    pub fn print_summary(&self) {
        println!("\n{}", "Run Summary".bright_green().bold());
        println!(
            "  {} {}",
            "Races processed:".bright_cyan(),
            self.races_processed.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Mushers processed:".bright_cyan(),
            self.mushers_processed.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Statements:".bright_cyan(),
            self.statements.len().to_string().bright_white().bold()
        );
        if self.incomplete_statements > 0 {
            println!(
                "  {} {}",
                "Incomplete statements:".bright_yellow(),
                self.incomplete_statements.to_string().bright_yellow()
            );
        }
        if !self.failures.is_empty() {
            println!(
                "  {} {}",
                "Failed units:".bright_red(),
                self.failures.len().to_string().bright_red().bold()
            );
        }
    }

    /// Full report: seen lists, unresolved labels, anomalies and failures
    pub fn print_details(&self) {
        print_section("Checkpoints", &sorted(&self.seen.checkpoints));
        print_section("Countries", &sorted(&self.seen.countries));
        print_section("Residences", &sorted(&self.seen.residences));
        print_section("Mushers", &sorted(&self.seen.mushers));

        println!("\n{}", "=========".bright_black());
        println!("{}", "Unknown identifiers".bright_yellow().bold());
        for kind in [EntityKind::Race, EntityKind::Checkpoint, EntityKind::Musher] {
            println!("{}:", kind);
            for label in sorted(self.unresolved.get(kind)) {
                println!("  {}", label);
            }
        }

        let no_dogs_at_start: Vec<String> = self
            .anomalies_of(DogAnomalyKind::NoDogsAtStart)
            .map(ToString::to_string)
            .collect();
        print_section("No dogs at start", &sorted(&no_dogs_at_start));

        let no_dogs_at_end: Vec<String> = self
            .anomalies_of(DogAnomalyKind::NoDogsAtEnd)
            .map(ToString::to_string)
            .collect();
        print_section("No dogs at the end", &no_dogs_at_end);

        if !self.failures.is_empty() {
            let failures: Vec<String> = self.failures.iter().map(ToString::to_string).collect();
            print_section("Failed units (re-run individually)", &failures);
        }
    }
}

fn sorted(values: &[String]) -> Vec<String> {
    let mut values = values.to_vec();
    values.sort();
    values
}

fn print_section(title: &str, lines: &[String]) {
    println!("\n{}", "=========".bright_black());
    println!("{}", title.bright_yellow().bold());
    for line in lines {
        println!("  {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckpointRef, FinalRank};
    use tempfile::TempDir;

    fn race() -> Race {
        Race {
            id: 40,
            label: "2015 Finnmarksløpet".to_string(),
            year: "2015".to_string(),
            start_date: "2015-03-07".to_string(),
            checkpoints: vec!["Alta".to_string(), "Jotka".to_string(), "Alta".to_string()],
            musher_ids: vec![1],
            identifier: Some("Q19455277".to_string()),
        }
    }

    fn musher() -> Musher {
        Musher {
            id: 1,
            number: "1".to_string(),
            label: "Jon Doe".to_string(),
            country: "Norway".to_string(),
            country_identifier: Some("Q20".to_string()),
            residence: "Alta".to_string(),
            final_rank: FinalRank::Disqualified,
            last_checkpoint: CheckpointRef::default(),
            dogs_start: 0,
            dogs_end: 0,
            identifier: None,
        }
    }

    #[test]
    fn test_unresolved_registry_keeps_order_and_repeats() {
        let mut unresolved = UnresolvedLabels::default();
        unresolved.record(EntityKind::Musher, "B");
        unresolved.record(EntityKind::Musher, "A");
        unresolved.record(EntityKind::Musher, "B");
        unresolved.record(EntityKind::Checkpoint, "Jotka");

        assert_eq!(unresolved.get(EntityKind::Musher), ["B", "A", "B"]);
        assert_eq!(unresolved.get(EntityKind::Checkpoint), ["Jotka"]);
        assert!(unresolved.get(EntityKind::Race).is_empty());
        assert!(!unresolved.is_empty());
    }

    #[test]
    fn test_seen_labels_are_distinct() {
        let mut seen = SeenLabels::default();
        seen.record_race(&race());
        seen.record_musher(&musher());
        seen.record_musher(&musher());

        assert_eq!(seen.checkpoints, vec!["Alta", "Jotka"]);
        assert_eq!(seen.countries, vec!["Norway"]);
        assert_eq!(seen.mushers.len(), 2);
    }

    #[test]
    fn test_anomaly_display() {
        let mut report = RunReport::default();
        report.record_anomaly(DogAnomalyKind::NoDogsAtStart, &race(), &musher());
        report.record_anomaly(DogAnomalyKind::NoDogsAtEnd, &race(), &musher());

        let start: Vec<_> = report.anomalies_of(DogAnomalyKind::NoDogsAtStart).collect();
        assert_eq!(
            start[0].to_string(),
            "Jon Doe (1) in the 2015 Finnmarksløpet (Q19455277)"
        );

        let end: Vec<_> = report.anomalies_of(DogAnomalyKind::NoDogsAtEnd).collect();
        assert_eq!(
            end[0].to_string(),
            "Jon Doe (1) in the 2015 Finnmarksløpet (Q19455277) -- Final rank: -1"
        );
    }

    #[test]
    fn test_write_statements() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("qs.txt");

        let mut report = RunReport::default();
        assert!(!report.write_statements(&path).unwrap());
        assert!(!path.exists());

        report.statements.push("Q1 P710 Q2".to_string());
        report.statements.push("Q1 P710 Q3 P1618 4".to_string());
        assert!(report.write_statements(&path).unwrap());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Q1 P710 Q2\nQ1 P710 Q3 P1618 4\n"
        );
    }

    #[test]
    fn test_failure_display() {
        let mut report = RunReport::default();
        report.record_failure(40, Some(7), &ScrapeError::fetch("http://x", "timed out"));
        report.record_failure(41, None, &ScrapeError::extraction("http://y", "no grid"));

        assert_eq!(
            report.failures[0].to_string(),
            "race 40 musher 7: Failed to fetch http://x: timed out"
        );
        assert!(report.failures[1].to_string().starts_with("race 41: "));
    }
}
