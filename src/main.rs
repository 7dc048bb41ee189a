//! CLI entry point for the loan tier analysis tool.
//!
//! Loads a LendingClub-style loan CSV, buckets borrowers into tiers and
//! reports default rates per tier.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use loan_tiers::analyzers::analyzer::{build_report, preview};
use loan_tiers::config::{RunConfig, load_dotenv};
use loan_tiers::output::{
    print_json, print_pretty, render_bin_spec, render_preview, render_report, write_json,
    write_report_csv,
};
use loan_tiers::parser::load_dataset;
use loan_tiers::tiers::{BalanceTier, CreditTier, DtiTier, IncomeTier, Tier};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "loan_tiers")]
#[command(about = "Default-rate analysis of loan applications by borrower tier", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full default-rate report for a loan CSV
    Analyze {
        /// Loan CSV to analyze [default: $LOAN_DATA_PATH or loan_data.csv]
        #[arg(long)]
        data: Option<PathBuf>,

        /// How to print the report
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also write the report as JSON to this file [default: $LOAN_JSON_OUT]
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Also write one CSV per section into this directory [default: $LOAN_CSV_DIR]
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Show the first records with their derived tiers
    Preview {
        /// Loan CSV to read [default: $LOAN_DATA_PATH or loan_data.csv]
        #[arg(long)]
        data: Option<PathBuf>,

        /// Number of records to show
        #[arg(short = 'n', long, default_value_t = 10)]
        rows: usize,
    },
    /// Print the bin edges of every tier
    Tiers,
}

fn main() -> Result<()> {
    let dotenv = load_dotenv();

    // Logging setup: colored stderr + JSON rolling log file
    let run_config = RunConfig::from_env();
    let file_appender =
        tracing_appender::rolling::daily(&run_config.log.dir, &run_config.log.file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    if let Some(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env");
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            data,
            format,
            json_out,
            csv_dir,
        } => {
            let run = run_config.with_overrides(data, json_out, csv_dir);
            debug!(?run, "Resolved run config");

            let dataset = load_dataset(&run.data_path)?;
            let report = build_report(&dataset, &run.data_path.display().to_string());
            print_pretty(&report);

            match format {
                Format::Text => println!("{}", render_report(&report)),
                Format::Json => print_json(&report)?,
            }

            if let Some(path) = &run.json_out {
                write_json(path, &report)?;
            }

            if let Some(dir) = &run.csv_dir {
                write_report_csv(dir, &report)?;
            }
        }
        Commands::Preview { data, rows } => {
            let run = run_config.with_overrides(data, None, None);
            let dataset = load_dataset(&run.data_path)?;
            let shown = preview(&dataset, rows);
            info!(shown = shown.len(), total = dataset.len(), "Dataset preview");
            println!("{}", render_preview(&shown));
        }
        Commands::Tiers => {
            println!("{}", render_bin_spec(&CreditTier::bin_spec()?));
            println!("{}", render_bin_spec(&IncomeTier::bin_spec()?));
            println!("{}", render_bin_spec(&DtiTier::bin_spec()?));
            println!("{}", render_bin_spec(&BalanceTier::bin_spec()?));
        }
    }

    Ok(())
}
