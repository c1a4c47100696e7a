use clap::ArgMatches;
use clap::error::ErrorKind;
use citemap_core::config::{DEFAULT_INPUT, DEFAULT_OUTPUT};
use citemap_core::{
    GraphStats, LoadError, OutputFormat, PageSummary, RenderConfig, WriteError,
    emit_page, load_graph,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

/// Everything the render command needs, parsed out of the CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub title: String,
    pub stats_only: bool,
    pub quiet: bool,
}

#[derive(Debug)]
pub enum Outcome {
    Written(PageSummary),
    Stats(GraphStats),
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// Exit code for rejected command line arguments
pub const USAGE_EXIT_CODE: i32 = 64;

/// Help and version requests exit cleanly, everything else is a usage error
pub fn usage_exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => USAGE_EXIT_CODE,
    }
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Load(_) => 1,
            CliError::Write(_) => 2,
        }
    }
}

impl RenderOptions {
    pub fn from_matches(args: &ArgMatches) -> Self {
        let format = args
            .get_one::<String>("format")
            .and_then(|f| OutputFormat::from_str(f))
            .unwrap_or(OutputFormat::Html);

        let input = args
            .get_one::<String>("input")
            .map(|p| expand_path(p))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));

        let output = args
            .get_one::<String>("output")
            .map(|p| expand_path(p))
            .unwrap_or_else(|| default_output(format));

        let title = args
            .get_one::<String>("title")
            .cloned()
            .unwrap_or_else(|| RenderConfig::default().title);

        Self {
            input,
            output,
            format,
            title,
            stats_only: args.get_flag("stats"),
            quiet: args.get_flag("quiet"),
        }
    }
}

/// Expand a leading `~` in a user supplied path
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

pub fn default_output(format: OutputFormat) -> PathBuf {
    match format {
        OutputFormat::Html => PathBuf::from(DEFAULT_OUTPUT),
        OutputFormat::Json => Path::new(DEFAULT_OUTPUT).with_extension("json"),
    }
}

/// Map the -q / -v flags onto a tracing level
pub fn log_level(quiet: bool, verbose: u8) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_logging(quiet: bool, verbose: u8) {
    tracing_subscriber::fmt()
        .with_max_level(log_level(quiet, verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Load the graph and either write the page or collect statistics.
/// Nothing is written when loading fails.
pub fn run_render(options: &RenderOptions) -> Result<Outcome, CliError> {
    let config = RenderConfig::default().with_title(options.title.clone());
    let progress = spinner(options.quiet);

    if let Some(ref pb) = progress {
        pb.set_message(format!("Loading {}", options.input.display()));
    }
    let graph = match load_graph(&options.input, &config) {
        Ok(graph) => graph,
        Err(e) => {
            if let Some(pb) = progress {
                pb.finish_and_clear();
            }
            return Err(e.into());
        }
    };

    if options.stats_only {
        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        return Ok(Outcome::Stats(graph.stats()));
    }

    if let Some(ref pb) = progress {
        pb.set_message(format!("Writing {}", options.output.display()));
    }
    let written = emit_page(&graph, &options.output, options.format, &config);
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(Outcome::Written(written?))
}

pub fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Written(summary) => {
            println!(
                "{} Saved {}",
                "✓".green().bold(),
                summary.path.display().to_string().bright_white()
            );
            println!(
                "{} {} nodes, {} edges, {} bytes",
                "→".blue(),
                summary.stats.node_count,
                summary.stats.edge_count,
                summary.bytes
            );
        }
        Outcome::Stats(stats) => print_stats(stats),
    }
}

pub fn format_stats(stats: &GraphStats) -> String {
    let years = stats
        .year_range
        .map(|(min, max)| format!("{}-{}", min, max))
        .unwrap_or_else(|| "none".to_string());

    let mut out = String::new();
    out.push_str(&format!("Nodes:      {}\n", stats.node_count));
    out.push_str(&format!("  Authors:   {}\n", stats.authors));
    out.push_str(&format!("  Subtopics: {}\n", stats.subtopics));
    out.push_str(&format!("  Other:     {}\n", stats.others));
    out.push_str(&format!("Edges:      {}\n", stats.edge_count));
    out.push_str(&format!("Papers:     {}\n", stats.papers));
    out.push_str(&format!("Years:      {}\n", years));
    out
}

fn print_stats(stats: &GraphStats) {
    println!("{}", "GRAPH STATISTICS".bright_blue().bold());
    print!("{}", format_stats(stats));
}

pub fn print_error(error: &CliError) {
    let kind = match error {
        CliError::Load(_) => "Load failed:",
        CliError::Write(_) => "Write failed:",
    };
    eprintln!("{} {} {}", "✗".red().bold(), kind.red(), error);
}
