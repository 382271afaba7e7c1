//! Integration tests for the scraping pipeline
//!
//! These tests drive `ResultsScraper` end-to-end over saved results pages
//! served from memory, with identifier tables written to temporary CSV files.

use finnmarkslopet_scraper::identifiers::IdentifierSources;
use finnmarkslopet_scraper::models::DogAnomalyKind;
use finnmarkslopet_scraper::{
    IdentifierTable, Invocation, PageFetcher, Result, ResultsScraper, ScrapeError, ScraperConfig,
    SiteUrls,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ROOT_URL: &str = "http://results.test";

/// Serves fixture pages by URL and remembers every request
struct FixtureFetcher {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl FixtureFetcher {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn with_page(mut self, url: String, fixture: &str) -> Self {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(fixture);
        let html = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
        self.pages.insert(url, html);
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl PageFetcher for &FixtureFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::fetch(url, "HTTP status 404 Not Found"))
    }
}

/// Fetcher with the index, race 40 and the two readable musher pages.
/// Race 41 and musher 9 are missing and fail to fetch.
fn site() -> FixtureFetcher {
    let urls = SiteUrls::new(ROOT_URL);
    FixtureFetcher::new()
        .with_page(urls.index(), "index.html")
        .with_page(urls.race_status(40), "status_40.html")
        .with_page(urls.musher_results(40, 7), "musher_40_7.html")
        .with_page(urls.musher_results(40, 8), "musher_40_8.html")
}

fn write_identifier_tables(dir: &Path) -> IdentifierSources {
    let races = dir.join("races.csv");
    let checkpoints = dir.join("checkpoints.csv");
    let mushers = dir.join("mushers.csv");

    fs::write(&races, "race,qid\n2015 Finnmarksløpet,Q19455277\n").unwrap();
    fs::write(
        &checkpoints,
        "Checkpoint,qid\nAlta,Q1001\nJotka,Q1002\nKautokeino,Q1003\n",
    )
    .unwrap();
    fs::write(&mushers, "label,qid,alias\nJon Doe,Q2002,J. Doe|Jon A. Doe\n").unwrap();

    IdentifierSources {
        races,
        checkpoints,
        mushers,
    }
}

fn load_table() -> IdentifierTable {
    let temp_dir = TempDir::new().unwrap();
    let sources = write_identifier_tables(temp_dir.path());
    let (table, stats) = IdentifierTable::load(&sources).unwrap();
    assert_eq!(stats.musher_rows, 1);
    assert_eq!(stats.aliases, 2);
    table
}

fn config() -> ScraperConfig {
    ScraperConfig::default()
        .with_root_url(ROOT_URL)
        .without_progress()
}

#[test]
fn test_all_races_with_isolated_failures() {
    let fetcher = site();
    let scraper = ResultsScraper::new(&fetcher, config(), load_table());

    let report = scraper.run(Invocation::AllRaces).unwrap();

    assert_eq!(
        report.statements,
        vec![
            "Q19455277 P710 Q2002 P1618 12 P1352 1".to_string(),
            "Q19455277 P710  P1618 5".to_string(),
        ]
    );
    assert_eq!(report.races_processed, 1);
    assert_eq!(report.mushers_processed, 2);
    // Kari Nordmann has no musher identifier
    assert_eq!(report.incomplete_statements, 1);

    // Musher 9 in race 40 and all of race 41 could not be fetched
    let failed: Vec<(u32, Option<u32>)> = report
        .failures
        .iter()
        .map(|failure| (failure.race_id, failure.musher_id))
        .collect();
    assert_eq!(failed, vec![(40, Some(9)), (41, None)]);

    assert_eq!(report.unresolved.mushers, vec!["Kari Nordmann"]);
    assert!(report.unresolved.races.is_empty());
    assert!(report.unresolved.checkpoints.is_empty());

    assert_eq!(report.seen.checkpoints, vec!["Alta", "Jotka", "Kautokeino"]);
    assert_eq!(report.seen.countries, vec!["Norway", "Sweden"]);
    assert_eq!(report.seen.residences, vec!["Alta", "Kiruna"]);
    assert!(report.anomalies.is_empty());
}

#[test]
fn test_did_not_start_entries_are_never_requested() {
    let fetcher = site();
    let scraper = ResultsScraper::new(&fetcher, config(), load_table());

    scraper.run(Invocation::SingleRace { race_id: 40 }).unwrap();

    let requests = fetcher.requests();
    assert!(!requests.iter().any(|url| url.ends_with("entr.id=133")));
    // Single-race mode skips the index
    assert!(!requests.contains(&SiteUrls::new(ROOT_URL).index()));
    assert_eq!(requests.len(), 4);
}

#[test]
fn test_single_musher() {
    let fetcher = site();
    let scraper = ResultsScraper::new(&fetcher, config(), load_table());

    let report = scraper
        .run(Invocation::SingleMusher {
            race_id: 40,
            musher_id: 7,
        })
        .unwrap();

    assert_eq!(
        report.statements,
        vec!["Q19455277 P710 Q2002 P1618 12 P1352 1".to_string()]
    );
    assert!(report.failures.is_empty());
    assert_eq!(report.incomplete_statements, 0);
    assert_eq!(fetcher.requests().len(), 2);
}

#[test]
fn test_dog_count_override_flags_both_anomalies() {
    let fetcher = site();
    let mut config = config();
    config.data_quality.dog_count_override_ids = vec![7];
    let scraper = ResultsScraper::new(&fetcher, config, load_table());

    let report = scraper
        .run(Invocation::SingleMusher {
            race_id: 40,
            musher_id: 7,
        })
        .unwrap();

    let kinds: Vec<DogAnomalyKind> = report.anomalies.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![DogAnomalyKind::NoDogsAtStart, DogAnomalyKind::NoDogsAtEnd]
    );
    assert_eq!(report.anomalies[0].race_identifier.as_deref(), Some("Q19455277"));
    // The statement is still produced
    assert_eq!(report.statements.len(), 1);
}

#[test]
fn test_unknown_country_stops_the_run() {
    let urls = SiteUrls::new(ROOT_URL);
    let fetcher = site().with_page(urls.musher_results(40, 9), "musher_40_9_unknown_country.html");
    let scraper = ResultsScraper::new(&fetcher, config(), load_table());

    match scraper.run(Invocation::SingleRace { race_id: 40 }) {
        Err(ScrapeError::UnknownCountry { country }) => assert_eq!(country, "Atlantis"),
        other => panic!("Expected UnknownCountry error, got {:?}", other.map(|r| r.statements)),
    }
}

#[test]
fn test_unreachable_index_is_fatal() {
    let fetcher = FixtureFetcher::new();
    let scraper = ResultsScraper::new(&fetcher, config(), load_table());

    assert!(matches!(
        scraper.run(Invocation::AllRaces),
        Err(ScrapeError::Fetch { .. })
    ));
}

#[test]
fn test_statements_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("qs.txt");

    let fetcher = site();
    let scraper = ResultsScraper::new(
        &fetcher,
        config().with_output_file(output.clone()),
        load_table(),
    );
    let report = scraper.run(Invocation::SingleRace { race_id: 40 }).unwrap();

    assert!(report.write_statements(&output).unwrap());
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "Q19455277 P710 Q2002 P1618 12 P1352 1\nQ19455277 P710  P1618 5\n"
    );
}

#[test]
fn test_non_numeric_arguments_fail_before_any_request() {
    match Invocation::from_args(Some("forty"), None) {
        Err(ScrapeError::InvalidArgument { argument, .. }) => assert_eq!(argument, "forty"),
        other => panic!("Expected InvalidArgument error, got {:?}", other),
    }
}
