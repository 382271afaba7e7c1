//! Finnmarksløpet Results Scraper Library
//!
//! Scrapes the historical results of the Finnmarksløpet sled-dog race and
//! turns every participant into a Wikidata QuickStatements line.
//!
//! This library provides tools for:
//! - Loading the race, checkpoint and musher identifier tables
//! - Extracting race status grids and musher result pages
//! - Building race and musher records, including dog-count checks
//! - Resolving labels to identifiers and formatting participant statements
//! - Running the whole pipeline with per-race and per-musher failure isolation

pub mod builder;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod identifiers;
pub mod models;
pub mod processor;
pub mod report;
pub mod resolver;
pub mod statement;

// Re-export commonly used types
pub use config::{DataQualityConfig, ScraperConfig};
pub use error::{Result, ScrapeError};
pub use fetch::{HttpFetcher, PageFetcher, SiteUrls};
pub use identifiers::{IdentifierSources, IdentifierTable};
pub use models::{FinalRank, Musher, Race};
pub use processor::{Invocation, ResultsScraper};
pub use report::RunReport;
