//! Run controller: walks races and mushers and collects the run report
//!
//! A run is one of three invocations: every race listed on the index page,
//! one race, or one musher in one race. Each race and each musher is a unit
//! of work; fetch and layout failures abort only that unit and are recorded
//! in the report, while everything else stops the run.

use crate::builder::RecordBuilder;
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::extract::{extract_musher_page, extract_race_ids, extract_race_status};
use crate::fetch::{PageFetcher, SiteUrls};
use crate::identifiers::IdentifierTable;
use crate::models::Race;
use crate::report::RunReport;
use crate::resolver::Resolver;
use crate::statement::QuickStatement;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use scraper::Html;
use tracing::{error, info, warn};

/// What a run covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    AllRaces,
    SingleRace { race_id: u32 },
    SingleMusher { race_id: u32, musher_id: u32 },
}

impl Invocation {
    /// Build an invocation from the positional command-line arguments
    ///
    /// # Errors
    /// `ScrapeError::InvalidArgument` if an ID is not a plain decimal number,
    /// or a musher ID is given without a race ID
    pub fn from_args(race_id: Option<&str>, musher_id: Option<&str>) -> Result<Self> {
        match (race_id, musher_id) {
            (None, None) => Ok(Self::AllRaces),
            (Some(race_id), None) => Ok(Self::SingleRace {
                race_id: parse_id("race_id", race_id)?,
            }),
            (Some(race_id), Some(musher_id)) => Ok(Self::SingleMusher {
                race_id: parse_id("race_id", race_id)?,
                musher_id: parse_id("musher_id", musher_id)?,
            }),
            (None, Some(musher_id)) => Err(ScrapeError::invalid_argument(
                musher_id,
                "a musher ID needs a race ID",
            )),
        }
    }
}

fn parse_id(name: &str, value: &str) -> Result<u32> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ScrapeError::invalid_argument(
            value,
            format!("{} must be a number", name),
        ));
    }
    value
        .parse()
        .map_err(|e| ScrapeError::invalid_argument(value, format!("{}: {}", name, e)))
}

/// Scrapes results pages and turns them into participant statements
pub struct ResultsScraper<F: PageFetcher> {
    fetcher: F,
    config: ScraperConfig,
    table: IdentifierTable,
    urls: SiteUrls,
}

impl<F: PageFetcher> ResultsScraper<F> {
    pub fn new(fetcher: F, config: ScraperConfig, table: IdentifierTable) -> Self {
        let urls = SiteUrls::new(&config.root_url);
        Self {
            fetcher,
            config,
            table,
            urls,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Execute one run
    ///
    /// # Errors
    /// Any error that is not scoped to a single race or musher: an unreadable
    /// index page, an unknown country, an output failure
    pub fn run(&self, invocation: Invocation) -> Result<RunReport> {
        let mut report = RunReport::default();

        match invocation {
            Invocation::AllRaces => {
                let race_ids = self.race_ids()?;
                info!("Processing {} races", race_ids.len());

                let progress_bar = if self.config.show_progress {
                    Some(Self::create_progress_bar(race_ids.len() as u64)?)
                } else {
                    None
                };

                for race_id in race_ids {
                    if let Some(pb) = &progress_bar {
                        pb.set_message(format!("race {}", race_id));
                    }
                    self.process_race(race_id, None, &mut report, progress_bar.as_ref())?;
                    if let Some(pb) = &progress_bar {
                        pb.inc(1);
                    }
                }

                if let Some(pb) = progress_bar {
                    pb.finish_with_message("All races processed");
                }
            }
            Invocation::SingleRace { race_id } => {
                self.process_race(race_id, None, &mut report, None)?;
            }
            Invocation::SingleMusher { race_id, musher_id } => {
                self.process_race(race_id, Some(musher_id), &mut report, None)?;
            }
        }

        info!(
            "Run finished: {} races, {} mushers, {} statements, {} failed units",
            report.races_processed,
            report.mushers_processed,
            report.statements.len(),
            report.failures.len()
        );
        Ok(report)
    }

    fn race_ids(&self) -> Result<Vec<u32>> {
        let url = self.urls.index();
        let html = self.fetcher.fetch(&url)?;
        let document = Html::parse_document(&html);
        extract_race_ids(&document)
    }

    /// Process one race, or only `only_musher` within it
    fn process_race(
        &self,
        race_id: u32,
        only_musher: Option<u32>,
        report: &mut RunReport,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<()> {
        let race = match self.load_race(race_id, report) {
            Ok(race) => race,
            Err(e) if e.is_unit_scoped() => {
                error!("Skipping race {}: {}", race_id, e);
                report.record_failure(race_id, None, &e);
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        report.races_processed += 1;

        let headline = race.headline().bright_green().bold();
        match progress_bar {
            Some(pb) => pb.suspend(|| eprintln!("{}", headline)),
            None => eprintln!("{}", headline),
        }

        let musher_ids = match only_musher {
            Some(musher_id) => vec![musher_id],
            None => race.musher_ids.clone(),
        };

        for musher_id in musher_ids {
            match self.process_musher(&race, musher_id, report, progress_bar) {
                Ok(()) => {}
                Err(e) if e.is_unit_scoped() => {
                    error!("Skipping musher {} in race {}: {}", musher_id, race_id, e);
                    report.record_failure(race_id, Some(musher_id), &e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    fn load_race(&self, race_id: u32, report: &mut RunReport) -> Result<Race> {
        let url = self.urls.race_status(race_id);
        let html = self.fetcher.fetch(&url)?;
        let page = extract_race_status(&Html::parse_document(&html), &url)?;

        let builder = RecordBuilder::new(&self.config.data_quality);
        let mut race = builder.build_race(race_id, page, &url)?;

        Resolver::new(&self.table).resolve_race(&mut race, &mut report.unresolved);
        report.seen.record_race(&race);

        info!("Race {} route: {}", race.id, race.checkpoints.join(" -> "));
        info!("{} mushers in the race", race.musher_ids.len());
        Ok(race)
    }

    fn process_musher(
        &self,
        race: &Race,
        musher_id: u32,
        report: &mut RunReport,
        progress_bar: Option<&ProgressBar>,
    ) -> Result<()> {
        let url = self.urls.musher_results(race.id, musher_id);
        let html = self.fetcher.fetch(&url)?;
        let page = extract_musher_page(&Html::parse_document(&html), &url)?;

        let builder = RecordBuilder::new(&self.config.data_quality);
        let mut musher = builder.build_musher(musher_id, page, &url)?;

        Resolver::new(&self.table).resolve_musher(&mut musher, &mut report.unresolved)?;
        report.seen.record_musher(&musher);
        info!("{}", musher.summary());

        for kind in musher.dog_anomalies() {
            warn!(
                "{}: {} ({}) in the {}",
                kind, musher.label, musher.id, race.label
            );
            report.record_anomaly(kind, race, &musher);
        }

        let statement = QuickStatement::participant(race, &musher);
        if !statement.is_complete() {
            warn!(
                "Incomplete statement for {} ({}) in the {}",
                musher.label, musher.id, race.label
            );
            report.incomplete_statements += 1;
        }
        let statement = statement.to_string();
        match progress_bar {
            Some(pb) => pb.suspend(|| println!("{}", statement)),
            None => println!("{}", statement),
        }

        report.statements.push(statement);
        report.mushers_processed += 1;
        Ok(())
    }

    fn create_progress_bar(total: u64) -> Result<ProgressBar> {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| ScrapeError::configuration(format!("Invalid progress template: {}", e)))?
                .progress_chars("#>-"),
        );
        pb.set_message("Processing races...");
        Ok(pb)
    }
}
