mod render;

use analytics::AnalyticsEngine;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use configuration::OutputFormat;
use configuration::settings::Config;
use core_types::{Dimension, EnrichedSubmission};
use indicatif::{ProgressBar, ProgressStyle};
use ingest::ProjectSet;
use render::{ProjectInfo, Renderer};
use std::path::PathBuf;
use std::process::ExitCode;

/// The main entry point for the gedscope application.
fn main() -> ExitCode {
    // Optional: GEDSCOPE__* overrides may live in a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match configuration::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The guard flushes the optional log file when main returns.
    let _log_guard = match configuration::init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Statistics on GED document submission exports.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ./gedscope.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the loaded exports and how many submissions each holds.
    Projects(ReportArgs),
    /// Print every submission with its per-document, per-lot and interval columns.
    Enrich(ReportArgs),
    /// Descriptive statistics per document type.
    Summary(ReportArgs),
    /// Submissions per month, split by a dimension.
    Trends(TrendsArgs),
    /// Correlations between the per-type statistics.
    Correlations(ReportArgs),
    /// Submission flow: project -> emitter -> document type -> indice.
    Flow(ReportArgs),
    /// First and last submission date per lot (or another dimension).
    Calendar(CalendarArgs),
    /// Submission counts per combination of dimensions.
    Breakdown(BreakdownArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// GED export files (semicolon separated CSV). Each file is one project.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// The project (file name) to analyse. Defaults to the first file.
    #[arg(long)]
    project: Option<String>,

    /// Output format. Overrides `output.format` from the configuration.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

#[derive(Parser)]
struct TrendsArgs {
    #[command(flatten)]
    report: ReportArgs,

    /// Dimension to split the monthly counts by.
    #[arg(long, default_value = "document-type")]
    by: Dimension,
}

#[derive(Parser)]
struct CalendarArgs {
    #[command(flatten)]
    report: ReportArgs,

    /// Dimension whose date ranges are listed (e.g., "lot", "project").
    #[arg(long, default_value = "lot")]
    by: Dimension,
}

#[derive(Parser)]
struct BreakdownArgs {
    #[command(flatten)]
    report: ReportArgs,

    /// Dimensions to group by, repeatable (e.g., --by lot --by indice).
    #[arg(long, required = true)]
    by: Vec<Dimension>,

    /// Keep only the N largest groups.
    #[arg(long)]
    top: Option<usize>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let engine = AnalyticsEngine::with_settings(&config.analysis);
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Projects(args) => {
            let projects = load_projects(&args, config)?;
            let info: Vec<ProjectInfo> = projects
                .iter()
                .map(|dataset| ProjectInfo {
                    name: dataset.name.clone(),
                    path: dataset.path.display().to_string(),
                    submissions: dataset.submissions.len(),
                    unparsed_dates: dataset.unparsed_dates,
                })
                .collect();
            let renderer = renderer(&args, config);
            renderer.emit(&mut out, &info, &renderer.projects(&info))?;
        }
        Commands::Enrich(args) => {
            let rows = enriched(&args, config, &engine)?;
            let renderer = renderer(&args, config);
            renderer.emit(&mut out, &rows, &renderer.enriched(&rows))?;
        }
        Commands::Summary(args) => {
            let rows = enriched(&args, config, &engine)?;
            let report = engine.describe(&rows);
            let renderer = renderer(&args, config);
            renderer.emit(&mut out, &report, &renderer.summary(&report))?;
        }
        Commands::Trends(args) => {
            let rows = enriched(&args.report, config, &engine)?;
            let counts = analytics::monthly_counts(&rows, args.by);
            let renderer = renderer(&args.report, config);
            renderer.emit(&mut out, &counts, &renderer.trends(&counts, args.by))?;
        }
        Commands::Correlations(args) => {
            let rows = enriched(&args, config, &engine)?;
            let report = engine.describe(&rows);
            let matrix = analytics::correlation_matrix(&report.per_type)
                .context("Cannot compute correlations")?;
            let renderer = renderer(&args, config);
            renderer.emit(&mut out, &matrix, &renderer.correlations(&matrix))?;
        }
        Commands::Flow(args) => {
            let rows = enriched(&args, config, &engine)?;
            let flow = analytics::document_flow(&rows);
            let renderer = renderer(&args, config);
            renderer.emit(&mut out, &flow, &renderer.flow(&flow))?;
        }
        Commands::Calendar(args) => {
            let rows = enriched(&args.report, config, &engine)?;
            let entries = analytics::calendar(&rows, args.by);
            let renderer = renderer(&args.report, config);
            renderer.emit(&mut out, &entries, &renderer.calendar(&entries, args.by))?;
        }
        Commands::Breakdown(args) => {
            let rows = enriched(&args.report, config, &engine)?;
            let breakdown = analytics::breakdown(&rows, &args.by, args.top)?;
            let renderer = renderer(&args.report, config);
            renderer.emit(&mut out, &breakdown, &renderer.breakdown(&breakdown))?;
        }
    }

    Ok(())
}

fn renderer(args: &ReportArgs, config: &Config) -> Renderer {
    Renderer::new(args.format.unwrap_or(config.output.format), config)
}

/// Loads every file given on the command line, with a progress bar when there are several.
fn load_projects(args: &ReportArgs, config: &Config) -> anyhow::Result<ProjectSet> {
    let progress_bar = if args.files.len() > 1 {
        let bar = ProgressBar::new(args.files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let projects = ingest::load_files(&args.files, &config.csv, &config.columns, |dataset| {
        progress_bar.inc(1);
        progress_bar.set_message(format!("Loaded {}", dataset.name));
    })
    .context("Failed to load GED exports")?;

    progress_bar.finish_and_clear();
    tracing::info!(projects = projects.len(), "Loaded GED exports");
    Ok(projects)
}

/// Loads the files, selects the project and derives the enriched rows.
fn enriched(
    args: &ReportArgs,
    config: &Config,
    engine: &AnalyticsEngine,
) -> anyhow::Result<Vec<EnrichedSubmission>> {
    let projects = load_projects(args, config)?;
    let dataset = projects.select(args.project.as_deref())?;
    tracing::info!(
        project = %dataset.name,
        submissions = dataset.submissions.len(),
        "Analysing project"
    );
    Ok(engine.enrich(&dataset.submissions))
}
