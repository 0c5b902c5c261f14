//! CLI entry point for the data cleaning report client.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use lex_report::reporting::{ReportDocument, ReportGenerator, report_stem, table};
use lex_report::{
    CleaningOptions, ClientConfig, Collaborator, HttpCollaborator, ImputationMethod,
    OutlierMethod, ReportController, ReportView, ViewSide, VisualizationDescriptor,
};
use std::path::PathBuf;
use tracing::{error, info};

/// CLI-compatible imputation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliImputation {
    /// Leave missing values as they are
    None,
    /// Fill numeric gaps with the column mean
    Mean,
    /// Fill numeric gaps with the column median
    Median,
    /// Fill numeric gaps with K-Nearest Neighbors
    Knn,
}

impl From<CliImputation> for ImputationMethod {
    fn from(cli: CliImputation) -> Self {
        match cli {
            CliImputation::None => ImputationMethod::None,
            CliImputation::Mean => ImputationMethod::Mean,
            CliImputation::Median => ImputationMethod::Median,
            CliImputation::Knn => ImputationMethod::Knn,
        }
    }
}

/// CLI-compatible outlier method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierMethod {
    /// Keep outliers as-is
    None,
    /// Cap with robust percentile bounds
    Iqr,
    /// Cap at mean +/- 3 standard deviations
    Zscore,
    /// Winsorize the 5% tails
    Winsorization,
}

impl From<CliOutlierMethod> for OutlierMethod {
    fn from(cli: CliOutlierMethod) -> Self {
        match cli {
            CliOutlierMethod::None => OutlierMethod::None,
            CliOutlierMethod::Iqr => OutlierMethod::Iqr,
            CliOutlierMethod::Zscore => OutlierMethod::Zscore,
            CliOutlierMethod::Winsorization => OutlierMethod::Winsorization,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Before/after data-quality reports from a remote cleaning service",
    long_about = "Uploads a dataset to the DataCleaner service, prints the data-quality \
                  report, runs a cleaning pass and prints the cleaned report with \
                  changed cells marked.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DATACLEANER_API_URL       Base URL of the service (default http://localhost:5000)\n  \
                  DATACLEANER_TIMEOUT_SECS  Request timeout in seconds (default 120)\n\n\
                  EXAMPLES:\n  \
                  # Upload and clean with defaults (deduplicate only)\n  \
                  lex-report -i data.csv\n\n  \
                  # Median imputation and IQR capping, save the PDF report\n  \
                  lex-report -i data.csv --impute median --outliers iqr --export\n\n  \
                  # Only inspect the uploaded dataset\n  \
                  lex-report -i data.xlsx --no-clean\n\n  \
                  # Machine-readable output\n  \
                  lex-report -i data.csv --json | jq .report.health_after"
)]
struct Args {
    /// Path to the dataset (.csv, .xlsx or .xls)
    #[arg(short, long)]
    input: PathBuf,

    /// Strategy for missing values
    #[arg(long, value_enum, default_value = "none")]
    impute: CliImputation,

    /// Strategy for outliers
    #[arg(long, value_enum, default_value = "none")]
    outliers: CliOutlierMethod,

    /// Keep duplicate rows
    #[arg(long)]
    keep_duplicates: bool,

    /// Only upload and show the before report
    #[arg(long)]
    no_clean: bool,

    /// Download the PDF report after cleaning
    ///
    /// Without a path the file is written to the output directory as
    /// data_cleaning_report_<timestamp>.pdf
    #[arg(long, num_args = 0..=1, value_name = "PATH")]
    export: Option<Option<PathBuf>>,

    /// Output JSON to stdout instead of the human-readable report
    ///
    /// Disables all logs; only the final JSON document is written.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Output directory for reports and exported files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Preview rows to print
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Base URL of the cleaning service (overrides DATACLEANER_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides DATACLEANER_TIMEOUT_SECS)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Leave the dataset loaded on the service when done
    #[arg(long)]
    keep_session: bool,
}

impl Args {
    fn cleaning_options(&self) -> CleaningOptions {
        CleaningOptions::builder()
            .imputation_method(self.impute.into())
            .outlier_method(self.outliers.into())
            .remove_duplicates(!self.keep_duplicates)
            .build()
    }
}

/// Initialize the tracing subscriber for logging.
///
/// With `json_output` no subscriber is installed, so stdout carries only the
/// JSON document.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Environment first, then command-line overrides.
fn build_config(args: &Args) -> Result<ClientConfig> {
    let env = ClientConfig::from_env()?;

    let mut builder = ClientConfig::builder()
        .base_url(args.api_url.clone().unwrap_or(env.base_url))
        .timeout_secs(args.timeout_secs.unwrap_or(env.timeout_secs))
        .output_dir(env.output_dir);

    if let Some(dir) = &args.output {
        builder = builder.output_dir(dir);
    }

    Ok(builder.build()?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    info!("Using cleaning service at {}", config.base_url);

    let generator = ReportGenerator::new(&config.output_dir);
    let controller = ReportController::new(HttpCollaborator::with_config(config)?);

    let outcome = run(&args, &controller, &generator).await;
    if let Err(e) = &outcome {
        error!("{e:#}");
    }

    if !args.keep_session {
        controller.reset().await;
    }

    outcome
}

async fn run(
    args: &Args,
    controller: &ReportController<HttpCollaborator>,
    generator: &ReportGenerator,
) -> Result<()> {
    controller
        .upload_path(&args.input)
        .await
        .with_context(|| format!("Upload of {} failed", args.input.display()))?;

    let view = current_view(controller)?;
    if !args.json {
        print_report(&view, args.rows);
    }

    let options = (!args.no_clean).then(|| args.cleaning_options());
    let view = match &options {
        Some(options) => {
            controller.clean(options).await.context("Cleaning failed")?;
            let view = current_view(controller)?;
            if !args.json {
                print_report(&view, args.rows);
            }
            view
        }
        None => view,
    };

    let document = ReportDocument::new(
        args.input.display().to_string(),
        controller.collaborator().name(),
        options,
        view,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    if args.emit_report {
        let path = generator.write_report_to_file(&document, &report_stem(&args.input))?;
        if !args.json {
            println!("Report written to {}", path.display());
        }
    }

    if let Some(target) = &args.export {
        let bytes = controller
            .export_report()
            .await
            .context("Report export failed")?;
        let path = generator.write_artifact(&bytes, target.as_deref())?;
        if !args.json {
            println!("PDF report saved to {}", path.display());
        }
    }

    Ok(())
}

fn current_view(controller: &ReportController<HttpCollaborator>) -> Result<ReportView> {
    controller
        .view()?
        .ok_or_else(|| anyhow!("Session was reset while the request was in flight"))
}

/// Print the human-readable report.
///
/// Uses `println!` on purpose: this is the command's output, not a log.
fn print_report(view: &ReportView, rows: usize) {
    let title = match view.showing {
        ViewSide::Before => "BEFORE CLEANING",
        ViewSide::After => "AFTER CLEANING",
    };

    println!("\n{}", "=".repeat(80));
    println!("{title}");
    println!("{}\n", "=".repeat(80));

    println!("HEALTH");
    println!("{}", "-".repeat(40));
    match (view.health_after, view.health_delta()) {
        (Some(after), Some(delta)) => println!(
            "  Score: {:.1} -> {:.1} ({:+.1})",
            view.health_before, after, delta
        ),
        _ => println!("  Score: {:.1}", view.health_before),
    }

    let stats = view.stats_after.as_ref().unwrap_or(&view.stats_before);
    println!("  Rows: {}", stats.total_rows);
    println!("  Columns: {}", stats.total_columns);
    println!("  Missing values: {}", stats.missing_values);
    println!("  Duplicate rows: {}", stats.duplicate_rows);

    if let Some(summary) = &view.summary {
        println!("  Rows removed: {}", summary.rows_removed);
        println!("  Missing values fixed: {}", summary.missing_fixed);
        println!("  Duplicates removed: {}", summary.duplicates_fixed);
    }
    println!();

    if view.showing == ViewSide::Before {
        print_issues("MISSING VALUES", &view.missing_info);
        print_issues("OUTLIERS", &view.outliers_info);
    }

    println!("PREVIEW");
    println!("{}", "-".repeat(40));
    print!("{}", table::render_grid(&view.grid, rows));
    println!("{}", table::legend());
    let counts = view
        .class_counts()
        .into_iter()
        .filter(|(class, count)| class.is_highlighted() && *count > 0)
        .map(|(class, count)| format!("{count} {}", class.display_name()))
        .collect::<Vec<_>>();
    if !counts.is_empty() {
        println!("highlighted: {}", counts.join(", "));
    }
    println!();

    println!("CHARTS");
    println!("{}", "-".repeat(40));
    if view.charts.is_empty() {
        println!("  No visualizations");
    }
    for viz in &view.charts.categorical {
        print_chart("categorical", viz);
    }
    for viz in &view.charts.numerical {
        print_chart("numerical", viz);
    }
    if view.dropped_charts > 0 {
        println!("  ({} unsupported charts skipped)", view.dropped_charts);
    }
}

fn print_issues(title: &str, issues: &std::collections::BTreeMap<String, lex_report::ColumnIssue>) {
    let flagged: Vec<_> = issues.iter().filter(|(_, issue)| issue.count > 0).collect();
    if flagged.is_empty() {
        return;
    }

    println!("{title}");
    println!("{}", "-".repeat(40));
    for (column, issue) in flagged {
        println!("  {column:<24} {}", issue.count);
    }
    println!();
}

fn print_chart(bucket: &str, viz: &VisualizationDescriptor) {
    println!("  [{bucket}] {} ({} points)", viz.column, viz.data.len());
}
