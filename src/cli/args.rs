//! Command-line argument definitions
//!
//! Two optional positional IDs choose the run mode; flags override the
//! configuration file and control logging and reporting.

use crate::constants::DEFAULT_OUTPUT_FILE;
use crate::{Result, ScrapeError};
use clap::Parser;
use std::path::PathBuf;

/// Scrape Finnmarksløpet race results into participant statements
///
/// With no arguments every race on the historical results index is processed.
/// A race ID limits the run to that race; a race ID and a musher ID limit it
/// to one participant.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "finnmarkslopet",
    version,
    about = "Scrape Finnmarksløpet race results into QuickStatements participant lines"
)]
pub struct Args {
    /// Race ID as used by the results site
    #[arg(value_name = "RACE_ID")]
    pub race_id: Option<String>,

    /// Musher entry ID within the race
    #[arg(value_name = "MUSHER_ID", requires = "race_id")]
    pub musher_id: Option<String>,

    /// JSON configuration file
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Directory holding the identifier tables
    ///
    /// Defaults to ~/Dropbox/finnmarkslopet
    #[arg(short = 'd', long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Also write all statements to a file (qs.txt when no path is given)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        num_args = 0..=1,
        default_missing_value = DEFAULT_OUTPUT_FILE
    )]
    pub output: Option<PathBuf>,

    /// Root URL of the results site
    #[arg(long = "root-url", value_name = "URL")]
    pub root_url: Option<String>,

    /// Print the full report after the run
    #[arg(long = "report")]
    pub report: bool,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Only show warnings and errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress progress and summary output",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Reject flag combinations that cannot work
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(ScrapeError::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }
        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_ids() {
        let args = Args::try_parse_from(["finnmarkslopet"]).unwrap();
        assert_eq!(args.race_id, None);
        assert_eq!(args.musher_id, None);

        let args = Args::try_parse_from(["finnmarkslopet", "40", "312"]).unwrap();
        assert_eq!(args.race_id.as_deref(), Some("40"));
        assert_eq!(args.musher_id.as_deref(), Some("312"));

        // Numeric checks happen when the invocation is built, not here
        let args = Args::try_parse_from(["finnmarkslopet", "abc"]).unwrap();
        assert_eq!(args.race_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_output_flag() {
        let args = Args::try_parse_from(["finnmarkslopet"]).unwrap();
        assert_eq!(args.output, None);

        let args = Args::try_parse_from(["finnmarkslopet", "--output"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("qs.txt")));

        let args = Args::try_parse_from(["finnmarkslopet", "40", "-o", "out.txt"]).unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_log_levels() {
        let args = Args::try_parse_from(["finnmarkslopet"]).unwrap();
        assert_eq!(args.get_log_level(), "info");
        assert!(args.show_progress());

        let args = Args::try_parse_from(["finnmarkslopet", "-vv"]).unwrap();
        assert_eq!(args.get_log_level(), "trace");

        let args = Args::try_parse_from(["finnmarkslopet", "-q"]).unwrap();
        assert_eq!(args.get_log_level(), "warn");
        assert!(!args.show_progress());

        assert!(Args::try_parse_from(["finnmarkslopet", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let args =
            Args::try_parse_from(["finnmarkslopet", "--config", "/nonexistent/scraper.json"])
                .unwrap();

        match args.validate() {
            Err(ScrapeError::Configuration { message }) => {
                assert!(message.contains("does not exist"))
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }
}
