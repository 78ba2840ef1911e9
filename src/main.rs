//! Pairwise Highlight CLI
//!
//! Inspect review task files, resolve analysis quotes into highlights, and
//! generate a self-contained HTML page for side-by-side answer review.

use clap::{Parser, Subcommand, ValueEnum};
use pairwise_highlight::color::ColorPolicy;
use pairwise_highlight::helpers::{
    self, criterion_short_name, helper_tab, parse_comparison_points, parse_quotes,
    CriteriaQuotes, HelperContent, COMPARE, CRITERIA_QUOTES,
};
use pairwise_highlight::highlight::{highlight_task, highlight_tasks};
use pairwise_highlight::locate::locate_quote;
use pairwise_highlight::models::{
    HighlightParams, HighlightReport, OverlapPolicy, RankingTask, Side, TaskHighlights,
};
use pairwise_highlight::output::{
    format_quote_match, format_task_highlights, generate_viewer_html, print_summary,
    truncate_text, write_csv, write_csv_file, write_json, write_json_file,
    write_viewer_html_file,
};
use pairwise_highlight::storage::TaskStorage;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "pairwise-highlight")]
#[command(about = "Quote highlighting for side-by-side answer review")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for highlight results
#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// Answers with highlighted runs marked as [[...]]
    Text,
    /// JSON report with highlights and segments
    Json,
    /// One CSV row per highlight
    Csv,
    /// Self-contained HTML review page
    Html,
}

/// Color assignment (CLI version, mirrors color::ColorPolicy)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliColorPolicy {
    /// One color per criterion name
    Keyed,
    /// One color per quote position
    ByIndex,
}

impl From<CliColorPolicy> for ColorPolicy {
    fn from(policy: CliColorPolicy) -> Self {
        match policy {
            CliColorPolicy::Keyed => ColorPolicy::Keyed,
            CliColorPolicy::ByIndex => ColorPolicy::ByIndex,
        }
    }
}

/// Overlap handling (CLI version, mirrors models::OverlapPolicy)
#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliOverlapPolicy {
    /// Emit overlapping highlights unchanged
    Passthrough,
    /// Trim overlapping highlights so segments never overlap
    Clip,
}

impl From<CliOverlapPolicy> for OverlapPolicy {
    fn from(policy: CliOverlapPolicy) -> Self {
        match policy {
            CliOverlapPolicy::Passthrough => OverlapPolicy::Passthrough,
            CliOverlapPolicy::Clip => OverlapPolicy::Clip,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CliSide {
    A,
    B,
}

impl From<CliSide> for Side {
    fn from(side: CliSide) -> Self {
        match side {
            CliSide::A => Side::A,
            CliSide::B => Side::B,
        }
    }
}

/// Raw analysis response format accepted by `ingest`
#[derive(Clone, Copy, Debug, ValueEnum)]
enum IngestKind {
    /// QUOTE: / COMMENT: lines
    Quotes,
    /// FEATURE: / A: / B: line triples
    Compare,
}

#[derive(Subcommand)]
enum Commands {
    /// List task files
    List {
        /// Directory holding task files
        #[arg(long, default_value = "data/tasks")]
        tasks_dir: PathBuf,
    },

    /// Show a task's prompt, answers and available helpers
    Show {
        #[arg(long, default_value = "data/tasks")]
        tasks_dir: PathBuf,

        /// Task file name
        #[arg(long)]
        task: String,

        /// Task position within the file
        #[arg(long, default_value = "0")]
        index: usize,
    },

    /// Resolve criteria quotes into highlights
    Highlight {
        #[arg(long, default_value = "data/tasks")]
        tasks_dir: PathBuf,

        /// Task file name
        #[arg(long)]
        task: String,

        /// Only this task position (default: every task in the file)
        #[arg(long)]
        index: Option<usize>,

        /// Only this criterion
        #[arg(long)]
        group: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Color assignment [default: keyed]
        #[arg(long, value_enum)]
        color_policy: Option<CliColorPolicy>,

        /// Overlap handling [default: passthrough]
        #[arg(long, value_enum)]
        overlap: Option<CliOverlapPolicy>,

        /// Suppress progress and summary output
        #[arg(long)]
        quiet: bool,
    },

    /// Locate a single quote in a text
    Locate {
        /// Text to search
        #[arg(long, conflicts_with = "text_file")]
        text: Option<String>,

        /// File holding the text to search
        #[arg(long)]
        text_file: Option<PathBuf>,

        /// Quote to find (surrounding quotation marks are ignored)
        #[arg(long)]
        quote: String,
    },

    /// Write an HTML review page for every task in a file
    Viewer {
        #[arg(long, default_value = "data/tasks")]
        tasks_dir: PathBuf,

        /// Task file name
        #[arg(long)]
        task: String,

        /// Output HTML path
        #[arg(long)]
        output: PathBuf,

        /// Color assignment [default: keyed]
        #[arg(long, value_enum)]
        color_policy: Option<CliColorPolicy>,

        /// Overlap handling [default: passthrough]
        #[arg(long, value_enum)]
        overlap: Option<CliOverlapPolicy>,

        /// Suppress progress output
        #[arg(long)]
        quiet: bool,
    },

    /// Parse a raw analysis response; print it or store it on a task
    Ingest {
        /// File holding the raw response
        #[arg(long)]
        raw: PathBuf,

        /// Response format
        #[arg(long, value_enum, default_value = "quotes")]
        kind: IngestKind,

        #[arg(long, default_value = "data/tasks")]
        tasks_dir: PathBuf,

        /// Store into this task file instead of printing
        #[arg(long)]
        task: Option<String>,

        /// Task position within the file
        #[arg(long, default_value = "0")]
        index: usize,

        /// Criterion the quotes belong to (quotes only; `**Name**` is shortened to Name)
        #[arg(long)]
        criterion: Option<String>,

        /// Answer the quotes were taken from (quotes only)
        #[arg(long, value_enum)]
        side: Option<CliSide>,
    },

    /// Remove a helper from every task in a file
    DeleteHelper {
        #[arg(long, default_value = "data/tasks")]
        tasks_dir: PathBuf,

        /// Task file name
        #[arg(long)]
        task: String,

        /// Helper name
        #[arg(long)]
        helper: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::List { tasks_dir } => {
            let storage = TaskStorage::open(tasks_dir);
            let names = storage.list_tasks()?;
            if names.is_empty() {
                eprintln!("No task files in {}", storage.tasks_dir().display());
            }
            for name in names {
                match storage.read_task(&name) {
                    Ok(tasks) => println!("{} ({} tasks)", name, tasks.len()),
                    Err(e) => {
                        warn!(task = %name, error = %e, "unreadable task file");
                        println!("{} (unreadable)", name);
                    }
                }
            }
        }

        Commands::Show {
            tasks_dir,
            task,
            index,
        } => {
            let storage = TaskStorage::open(tasks_dir);
            let ranking_task = storage.read_task_at(&task, index)?;
            print_task(&task, index, &ranking_task);
        }

        Commands::Highlight {
            tasks_dir,
            task,
            index,
            group,
            format,
            output,
            color_policy,
            overlap,
            quiet,
        } => {
            let params = build_params(color_policy, overlap);
            let storage = TaskStorage::open(tasks_dir);

            let results: Vec<TaskHighlights> = match index {
                Some(i) => vec![highlight_task(&storage.read_task_at(&task, i)?, i, &params)],
                None => highlight_tasks(&storage.read_task(&task)?, &params, !quiet),
            };

            let mut report = build_report(&task, params, results);
            if let Some(name) = &group {
                report.retain_group(name);
            }

            match (format, output.as_ref()) {
                (OutputFormat::Text, _) => {
                    let text: String = report
                        .tasks
                        .iter()
                        .map(|t| format_task_highlights(t, None))
                        .collect::<Vec<_>>()
                        .join("\n");
                    match &output {
                        Some(path) => std::fs::write(path, text)?,
                        None => print!("{}", text),
                    }
                }
                (OutputFormat::Json, Some(path)) => write_json_file(&report, path)?,
                (OutputFormat::Json, None) => {
                    let mut stdout = io::stdout().lock();
                    write_json(&report, &mut stdout)?;
                    writeln!(stdout)?;
                }
                (OutputFormat::Csv, Some(path)) => write_csv_file(&report, path)?,
                (OutputFormat::Csv, None) => write_csv(&report, &mut io::stdout().lock())?,
                (OutputFormat::Html, Some(path)) => write_viewer_html_file(&report, path)?,
                (OutputFormat::Html, None) => println!("{}", generate_viewer_html(&report)),
            }

            if !quiet && output.is_some() {
                print_summary(&report);
                if let Some(path) = &output {
                    eprintln!("\nOutput: {}", path.display());
                }
            }
        }

        Commands::Locate {
            text,
            text_file,
            quote,
        } => {
            let text = match (text, text_file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => return Err("either --text or --text-file is required".into()),
            };

            println!("{}", format_quote_match(&text, &locate_quote(&text, &quote)));
        }

        Commands::Viewer {
            tasks_dir,
            task,
            output,
            color_policy,
            overlap,
            quiet,
        } => {
            let params = build_params(color_policy, overlap);
            let storage = TaskStorage::open(tasks_dir);
            let tasks = storage.read_task(&task)?;

            if !quiet {
                eprintln!("Highlighting {} tasks...", tasks.len());
            }
            let results = highlight_tasks(&tasks, &params, !quiet);
            let report = build_report(&task, params, results);

            let html_output = output.with_extension("html");
            write_viewer_html_file(&report, &html_output)?;

            if !quiet {
                print_summary(&report);
                eprintln!("\nViewer output: {}", html_output.display());
            }
        }

        Commands::Ingest {
            raw,
            kind,
            tasks_dir,
            task,
            index,
            criterion,
            side,
        } => {
            let raw_text = std::fs::read_to_string(&raw)?;

            match kind {
                IngestKind::Quotes => {
                    let quotes = parse_quotes(&raw_text);
                    info!(count = quotes.len(), "parsed quotes");

                    let Some(task) = task else {
                        println!("{}", serde_json::to_string_pretty(&quotes)?);
                        return Ok(());
                    };

                    let (Some(criterion), Some(side)) = (criterion, side) else {
                        return Err("storing quotes requires --criterion and --side".into());
                    };
                    let group = criterion_short_name(&criterion)
                        .unwrap_or(criterion.as_str())
                        .to_string();
                    let side = Side::from(side);
                    let count = quotes.len();

                    let storage = TaskStorage::open(tasks_dir);
                    storage.update_task(&task, index, |t| {
                        let mut content: CriteriaQuotes = match t.helpers.get(CRITERIA_QUOTES) {
                            Some(value) => match HelperContent::from_value(CRITERIA_QUOTES, value) {
                                HelperContent::CriteriaQuotes(c) => c,
                                _ => {
                                    warn!("replacing malformed criteria_quotes payload");
                                    CriteriaQuotes::new()
                                }
                            },
                            None => CriteriaQuotes::new(),
                        };
                        content
                            .entry(group.clone())
                            .or_default()
                            .insert(side.label().to_string(), quotes);
                        t.helpers.insert(
                            CRITERIA_QUOTES.to_string(),
                            HelperContent::CriteriaQuotes(content).to_value(),
                        );
                    })?;

                    eprintln!(
                        "Stored {} quotes for {} / {} on {}[{}]",
                        count,
                        group,
                        side.label(),
                        task,
                        index
                    );
                }
                IngestKind::Compare => {
                    let items = parse_comparison_points(&raw_text);
                    info!(count = items.len(), "parsed comparison points");
                    let value = HelperContent::Compare(items).to_value();

                    match task {
                        Some(task) => {
                            let storage = TaskStorage::open(tasks_dir);
                            storage.set_helper(&task, COMPARE, Some(&[index][..]), &value)?;
                            eprintln!("Stored comparison on {}[{}]", task, index);
                        }
                        None => println!("{}", serde_json::to_string_pretty(&value)?),
                    }
                }
            }
        }

        Commands::DeleteHelper {
            tasks_dir,
            task,
            helper,
        } => {
            let storage = TaskStorage::open(tasks_dir);
            let removed = storage.delete_helper(&task, &helper)?;
            println!("Removed {} from {} tasks", helper, removed);
        }
    }

    Ok(())
}

/// Overlay user-specified values onto the library defaults.
fn build_params(
    color_policy: Option<CliColorPolicy>,
    overlap: Option<CliOverlapPolicy>,
) -> HighlightParams {
    let defaults = HighlightParams::default();
    HighlightParams {
        color_policy: color_policy
            .map(ColorPolicy::from)
            .unwrap_or(defaults.color_policy),
        overlap_policy: overlap
            .map(OverlapPolicy::from)
            .unwrap_or(defaults.overlap_policy),
    }
}

fn build_report(task_name: &str, params: HighlightParams, tasks: Vec<TaskHighlights>) -> HighlightReport {
    HighlightReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        task_name: task_name.to_string(),
        parameters: params,
        tasks,
    }
}

fn print_task(task_name: &str, index: usize, task: &RankingTask) {
    println!("=== {} [{}] ===", task_name, index);
    println!("Prompt: {}", truncate_text(&task.prompt, 200));
    println!();
    for side in Side::BOTH {
        println!("{}: {}", side.label(), truncate_text(task.answer(side), 200));
    }
    println!();
    println!("Criteria:");
    for criterion in &task.criteria {
        match criterion_short_name(criterion) {
            Some(short) => println!("  {} ({})", short, truncate_text(criterion, 60)),
            None => println!("  {}", truncate_text(criterion, 60)),
        }
    }
    println!();
    println!("Helpers:");
    if task.helpers.is_empty() {
        println!("  (none)");
    }
    for (name, value) in &task.helpers {
        let tab = helper_tab(name).unwrap_or("-");
        let detail = match HelperContent::from_value(name, value) {
            HelperContent::Summarize(_) => "summary of both answers".to_string(),
            HelperContent::Compare(items) => format!("{} comparison points", items.len()),
            HelperContent::CriteriaQuotes(content) => {
                let quotes: usize = content
                    .values()
                    .flat_map(|sides| sides.values())
                    .map(Vec::len)
                    .sum();
                format!("{} criteria, {} quotes", content.len(), quotes)
            }
            HelperContent::Opaque(_) => "unrecognized payload".to_string(),
        };
        println!("  [{}] {}: {}", tab, name, detail);
    }
    let missing: Vec<&str> = helpers::HELPER_TABS
        .iter()
        .flat_map(|(_, names)| names.iter().copied())
        .filter(|name| !task.helpers.contains_key(*name))
        .collect();
    if !missing.is_empty() {
        println!("  not yet run: {}", missing.join(", "));
    }
}

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::{EnvFilter, Layer};

    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt).init();
}
