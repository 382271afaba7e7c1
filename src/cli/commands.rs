//! Command execution for the scraper CLI
//!
//! Sets up logging, layers the configuration, loads the identifier tables
//! and hands over to the results scraper.

use crate::cli::args::Args;
use crate::config::ScraperConfig;
use crate::fetch::HttpFetcher;
use crate::identifiers::IdentifierTable;
use crate::processor::{Invocation, ResultsScraper};
use crate::report::RunReport;
use crate::Result;
use tracing::{debug, info, warn};

/// Run the scraper for the parsed command line
///
/// Argument and identifier-table errors are returned before any page is
/// fetched.
pub fn run(args: Args) -> Result<RunReport> {
    setup_logging(&args);
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let invocation = Invocation::from_args(args.race_id.as_deref(), args.musher_id.as_deref())?;

    let config = load_configuration(&args)?;
    debug!("Loaded configuration: {:?}", config);

    let sources = config.identifier_sources()?;
    let (table, stats) = IdentifierTable::load(&sources)?;
    if !stats.duplicates.is_empty() {
        warn!(
            "{} duplicate labels in the identifier tables",
            stats.duplicates.len()
        );
    }

    let fetcher = HttpFetcher::new(&config)?;
    let scraper = ResultsScraper::new(fetcher, config, table);

    info!("Starting run: {:?}", invocation);
    let report = scraper.run(invocation)?;

    if let Some(path) = &scraper.config().output_file {
        if !report.write_statements(path)? {
            warn!("No statements produced, {} not written", path.display());
        }
    }

    if !args.quiet {
        report.print_summary();
    }
    if args.report {
        report.print_details();
    }

    Ok(report)
}

/// Defaults, then the optional config file, then command-line overrides
pub fn load_configuration(args: &Args) -> Result<ScraperConfig> {
    let mut config = match &args.config_file {
        Some(path) => {
            info!("Using config file: {}", path.display());
            ScraperConfig::from_file(path)?
        }
        None => ScraperConfig::default(),
    };

    if let Some(data_dir) = &args.data_dir {
        config = config.with_data_dir(data_dir.clone());
    }
    if let Some(output) = &args.output {
        config = config.with_output_file(output.clone());
    }
    if let Some(root_url) = &args.root_url {
        config = config.with_root_url(root_url.as_str());
    }
    if !args.show_progress() {
        config = config.without_progress();
    }

    config.validate()?;
    Ok(config)
}

/// Filter used when `RUST_LOG` is not set.
///
/// At trace level the HTTP client's own events are included as well.
pub fn log_directive(args: &Args) -> String {
    let level = args.get_log_level();
    if args.verbose >= 2 {
        format!("finnmarkslopet_scraper={},reqwest={}", level, level)
    } else {
        format!("finnmarkslopet_scraper={}", level)
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over the verbosity flags. Quiet runs log
/// warnings compactly without a timer; verbose runs show event targets so
/// extraction and HTTP lines can be told apart.
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directive(args)));
    let layer = fmt::layer().with_writer(std::io::stderr);

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.without_time().with_target(false).compact())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                layer
                    .with_timer(fmt::time::uptime())
                    .with_target(args.verbose > 0),
            )
            .init();
    }

    debug!("Logging initialized: {}", log_directive(args));
}
