//! Application constants for the Finnmarksløpet scraper
//!
//! Site layout markers, default file locations, QuickStatements properties
//! and the embedded country table.

// =============================================================================
// Site
// =============================================================================

/// Root of the results website
pub const DEFAULT_ROOT_URL: &str = "http://www.finnmarkslopet.no";

/// Historical results index, relative to the root URL
pub const INDEX_PATH: &str = "/rhist/results.jsp?lang=en";

/// Per-race status grid, relative to the root URL
pub const STATUS_PATH: &str = "/race/results/status.jsp?lang=en";

/// Per-musher results page, relative to the root URL
pub const MUSHER_PATH: &str = "/race/results/musher.jsp?lang=en";

/// Rank cell text used for disqualified mushers
pub const DISQUALIFIED_MARKER: &str = "(Disqualified)";

/// Empty strike-through tag that leaks into some dog-count cells as text
pub const STRAY_DOG_COUNT_ARTIFACT: &str = "<s></s>";

pub const DEFAULT_USER_AGENT: &str = concat!("finnmarkslopet_scraper/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Identifier sources
// =============================================================================

/// Data directory relative to the user's home directory
pub const DEFAULT_DATA_DIR: &str = "Dropbox/finnmarkslopet";

pub const RACE_TABLE_FILE: &str = "finnmarkslopet/finnmarkslopet-qid.csv";
pub const CHECKPOINT_TABLE_FILE: &str = "finnmarkslopet/checkpoint-id.csv";
pub const MUSHER_TABLE_FILE: &str = "mushers-qid.csv";

/// Column names expected in the identifier CSV headers
pub mod columns {
    pub const RACE_LABEL: &str = "race";
    pub const CHECKPOINT_LABEL: &str = "Checkpoint";
    pub const MUSHER_LABEL: &str = "label";
    pub const IDENTIFIER: &str = "qid";
}

/// Separator between aliases in the musher table
pub const ALIAS_SEPARATOR: char = '|';

// =============================================================================
// Data-quality defaults
// =============================================================================

/// Mushers whose checkpoint tables carry wrong dog counts
pub const DOG_COUNT_OVERRIDE_IDS: &[u32] = &[312, 314];

/// Registered mushers that never started
pub const DID_NOT_START_IDS: &[u32] = &[133];

// =============================================================================
// QuickStatements
// =============================================================================

/// Wikidata properties used in participant statements
pub mod properties {
    /// participant
    pub const PARTICIPANT: &str = "P710";
    /// sports number
    pub const SPORTS_NUMBER: &str = "P1618";
    /// ranking
    pub const RANKING: &str = "P1352";
}

pub const DEFAULT_OUTPUT_FILE: &str = "qs.txt";

// =============================================================================
// Countries
// =============================================================================

/// Country labels as they appear in the musher page flag titles.
///
/// Regions and constituent countries map to their sovereign state.
pub const COUNTRY_IDENTIFIERS: &[(&str, &str)] = &[
    ("Aragon", "Q29"),
    ("Austria", "Q40"),
    ("Basque country", "Q47588"),
    ("Belgia", "Q31"),
    ("Catalonia", "Q29"),
    ("Czech Republic", "Q213"),
    ("Denmark", "Q35"),
    ("England", "Q145"),
    ("Faroe Islands", "Q4628"),
    ("Finland", "Q33"),
    ("France", "Q142"),
    ("Germany", "Q183"),
    ("Great Britain", "Q145"),
    ("Hungary", "Q28"),
    ("Iceland", "Q189"),
    ("Italy", "Q38"),
    ("Nederland", "Q55"),
    ("Norway", "Q20"),
    ("Poland", "Q36"),
    ("Russia", "Q159"),
    ("Scotland", "Q145"),
    ("Slovakia", "Q214"),
    ("Spain", "Q29"),
    ("Sweden", "Q34"),
    ("Swiss", "Q39"),
    ("USA", "Q30"),
    ("Uruguay", "Q77"),
    ("Wales", "Q145"),
];

/// Look up a country label in the embedded table
pub fn country_identifier(country: &str) -> Option<&'static str> {
    COUNTRY_IDENTIFIERS
        .iter()
        .find(|(label, _)| *label == country)
        .map(|(_, qid)| *qid)
}
