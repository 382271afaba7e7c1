use anyhow::Context;
use clap::Parser;
use finnmarkslopet_scraper::cli::{Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    let result = commands::run(args).context("Scraping run failed");

    match result {
        Ok(_report) => {
            // Statements and summary have already been printed
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
