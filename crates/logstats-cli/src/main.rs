// Copyright 2025-Present the logstats authors
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

use std::env;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use logstats::aggregator::aggregate;
use logstats::reader::MultiFileReader;
use logstats::report;

#[derive(Parser, Debug)]
#[command(
    name = "logstats",
    version,
    about = "Aggregated request reports from newline-delimited JSON access logs"
)]
struct Cli {
    /// Log files to read, processed in the order given
    #[arg(long, required = true, num_args = 1..)]
    files: Vec<PathBuf>,

    /// Report to generate
    #[arg(long, value_enum)]
    report: ReportKind,

    /// Only count records whose timestamp starts with this date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReportKind {
    /// Request count and mean response time per handler
    Average,
}

#[derive(Debug, thiserror::Error)]
enum ArgsError {
    #[error("log file(s) do not exist: {0}")]
    MissingFiles(String),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Rejects paths that do not exist and dates that are not real calendar
/// dates, before any file is opened.
fn validate_args(cli: &Cli) -> Result<(), ArgsError> {
    let missing: Vec<String> = cli
        .files
        .iter()
        .filter(|path| !path.exists())
        .map(|path| path.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ArgsError::MissingFiles(missing.join(", ")));
    }

    if let Some(date) = cli.date.as_deref() {
        if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(ArgsError::InvalidDate(date.to_string()));
        }
    }

    Ok(())
}

fn init_logging() {
    let log_level = env::var("LOGSTATS_LOG_LEVEL")
        .map(|val| val.to_lowercase())
        .unwrap_or("warn".to_string());

    // The report goes to stdout; logs must stay out of its way.
    #[allow(clippy::expect_used)]
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(log_level).expect("could not parse log level in configuration"),
        )
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true)
        .with_writer(std::io::stderr)
        .without_time()
        .finish();

    #[allow(clippy::expect_used)]
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn run(cli: &Cli) -> anyhow::Result<String> {
    let records = MultiFileReader::new(cli.files.clone());
    let stats = aggregate(records, cli.date.as_deref())?;
    debug!("aggregated {} handlers", stats.len());
    let rendered = match cli.report {
        ReportKind::Average => report::format_report(stats),
    };
    Ok(rendered)
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    if let Err(error) = validate_args(&cli) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(rendered) => println!("{rendered}"),
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    }
}
