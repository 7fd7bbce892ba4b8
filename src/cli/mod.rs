//! Command-line interface for combine-code
//!
//! Flag names are camelCase (`--includeExtensions`, `--excludeDirs`).

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod output;

pub use output::Output;

use crate::combine::{self, CombineStats, Combiner};
use crate::config::{CliOverrides, CombineConfig, Settings};

pub const USAGE: [&str; 2] = [
    "Usage: combine-code --path <start_path> --includeExtensions <comma_separated_extensions> [--output <output_file>] [--excludeDirs <comma_separated_dirs>]",
    "Example: combine-code --path /path/to/start --includeExtensions go,js --excludeDirs node_modules,vendor",
];

/// Combine a source tree into one line-numbered document
#[derive(Parser, Debug)]
#[command(name = "combine-code", author, version, about, long_about = None)]
pub struct Cli {
    /// Start path for searching files
    #[arg(long, value_name = "DIR")]
    pub path: Option<String>,

    /// Comma-separated list of file extensions to include
    #[arg(long = "includeExtensions", value_name = "EXTS")]
    pub include_extensions: Option<String>,

    /// Output file name [default: combined_code.md]
    #[arg(long, value_name = "FILE")]
    pub output: Option<String>,

    /// Comma-separated list of additional directories to exclude
    #[arg(long = "excludeDirs", value_name = "DIRS")]
    pub exclude_dirs: Option<String>,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// List the files that would be combined without writing the output
    #[arg(long)]
    pub dry_run: bool,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Run the command and map the outcome to a process exit code
    pub fn run(self) -> ExitCode {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.execute(&output) {
            Ok(code) => code,
            Err(e) => {
                output.error(&format!("{:#}", e));
                ExitCode::FAILURE
            }
        }
    }

    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            path: self.path.as_ref().map(PathBuf::from),
            include_extensions: self.include_extensions.clone(),
            output: self.output.as_ref().map(PathBuf::from),
            exclude_dirs: self.exclude_dirs.clone(),
        }
    }

    fn execute(&self, output: &Output) -> Result<ExitCode> {
        let cwd = std::env::current_dir().context("Cannot determine working directory")?;
        let settings = Settings::load(self.config.as_deref(), &cwd, &self.overrides())?;

        let config = match settings.resolve() {
            Ok(config) => config,
            Err(missing) => {
                tracing::debug!("{}", missing);
                output.usage(&USAGE);
                return Ok(ExitCode::FAILURE);
            }
        };
        tracing::debug!("Resolved configuration: {:?}", config);

        if self.dry_run {
            return dry_run(&config, output);
        }

        let out = combine::create_output(&config)?;
        let combiner = Combiner::from_config(&config);
        warn_ignore_error(&combiner, output);
        let stats = combiner.write_to(out)?;
        combine::log_summary(&config, &stats);

        output.success(&format!(
            "Combined code has been written to {}",
            config.output.display()
        ));
        report(&stats, output);
        Ok(ExitCode::SUCCESS)
    }
}

fn dry_run(config: &CombineConfig, output: &Output) -> Result<ExitCode> {
    let combiner = Combiner::from_config(config);
    warn_ignore_error(&combiner, output);
    let (files, stats) = combiner.plan()?;
    for file in &files {
        output.list_item(&file.display().to_string());
    }
    output.success(&format!(
        "{} files would be written to {}",
        files.len(),
        config.output.display()
    ));
    report(&stats, output);
    Ok(ExitCode::SUCCESS)
}

fn warn_ignore_error(combiner: &Combiner<'_>, output: &Output) {
    if let Some(e) = combiner.ignore_error() {
        output.warning(&format!("Error loading .gitignore: {:#}", e));
    }
}

fn report(stats: &CombineStats, output: &Output) {
    output.verbose("Run summary");
    output.verbose_breakdown("files written", stats.files_written);
    output.verbose_breakdown("lines written", stats.lines_written);
    output.verbose_breakdown("bytes read", stats.bytes_read);
    output.verbose_breakdown("directories pruned", stats.directories_pruned);
    output.verbose_breakdown("files ignored", stats.files_ignored);
    output.verbose_breakdown("files with other extensions", stats.files_skipped_by_extension);
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    // Keep the ignore crate quiet unless everything was asked for
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,ignore=warn,globset=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,ignore=warn,globset=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    // try_init: a second subscriber (tests, embedding) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(console::Term::stderr().is_term())
        .with_writer(std::io::stderr)
        .try_init();
}
