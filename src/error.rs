//! Error handling for scraping runs.
//!
//! Errors fall into two groups: run-level failures (identifier sources,
//! arguments, configuration) that stop everything before or during a run,
//! and unit-level failures (a page that cannot be fetched or does not have
//! the expected layout) that only abort the race or musher being processed.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Identifier source not readable: {path}")]
    IdentifierSourceMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed identifier source {path}: {reason}")]
    IdentifierSourceMalformed { path: PathBuf, reason: String },

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Unexpected page layout at {source_page}: {reason}")]
    Extraction { source_page: String, reason: String },

    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("Country '{country}' is missing from the country table")]
    UnknownCountry { country: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to write output file {path}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    /// Create an identifier-source error for an unreadable file
    pub fn source_missing(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IdentifierSourceMissing {
            path: path.into(),
            source,
        }
    }

    /// Create an identifier-source error for missing columns or bad rows
    pub fn source_malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::IdentifierSourceMalformed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a fetch error
    pub fn fetch(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create an extraction error for a page that lacks an expected element
    pub fn extraction(source_page: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Extraction {
            source_page: source_page.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-argument error
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-country error
    pub fn unknown_country(country: impl Into<String>) -> Self {
        Self::UnknownCountry {
            country: country.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Errors that only invalidate the race or musher being processed.
    ///
    /// The run controller logs these and moves on to the next unit; every
    /// other kind aborts the run.
    pub fn is_unit_scoped(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Extraction { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_scoped_errors() {
        assert!(ScrapeError::fetch("http://x", "timeout").is_unit_scoped());
        assert!(ScrapeError::extraction("http://x", "no table").is_unit_scoped());

        assert!(!ScrapeError::unknown_country("Atlantis").is_unit_scoped());
        assert!(!ScrapeError::invalid_argument("abc", "not numeric").is_unit_scoped());
        assert!(!ScrapeError::configuration("bad").is_unit_scoped());
        assert!(!ScrapeError::source_malformed("races.csv", "missing column").is_unit_scoped());
    }

    #[test]
    fn test_error_messages_carry_context() {
        let error = ScrapeError::extraction("http://host/page", "missing #rshead");
        assert_eq!(
            error.to_string(),
            "Unexpected page layout at http://host/page: missing #rshead"
        );

        let error = ScrapeError::unknown_country("Atlantis");
        assert!(error.to_string().contains("Atlantis"));
    }
}
