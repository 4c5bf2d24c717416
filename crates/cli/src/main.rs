use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use roster_cli::{Prompter, Session, table};
use roster_core::Config;
use roster_store::{LoadSource, Roster};

/// Default config location, relative to the working directory
const DEFAULT_CONFIG_FILE: &str = "roster.toml";

/// Roster - student academic records kept in a flat file
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "Menu-driven student record manager", long_about = None)]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to roster.toml (default: ./roster.toml, optional)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Record file to use instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Without a subcommand the interactive menu starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the records, optionally only those matching QUERY
    List {
        /// Case-insensitive match against name, course or roll number
        #[arg(value_name = "QUERY")]
        query: Option<String>,
    },
    /// Merge a CSV file into the records and save
    Import {
        #[arg(required = true, value_name = "CSV")]
        csv: PathBuf,
    },
    /// Write the records to a CSV (or JSON) file
    Export {
        #[arg(required = true, value_name = "PATH")]
        path: PathBuf,

        /// Write JSON instead of CSV
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let _log_guard = roster_core::init_logging(&config.logging).context("Failed to initialise logging")?;

    tracing::debug!(data_file = %config.data_file.display(), capacity = config.capacity, "Starting");

    match cli.command {
        None => cmd_interactive(&config),
        Some(Commands::List { query }) => {
            cmd_list(&config, query.as_deref(), &mut io::stdout().lock())?;
            Ok(0)
        }
        Some(Commands::Import { csv }) => {
            cmd_import(&config, &csv)?;
            Ok(0)
        }
        Some(Commands::Export { path, json }) => {
            cmd_export(&config, &path, json)?;
            Ok(0)
        }
    }
}

/// Load the config file (if any) and apply command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let mut config = Config::load_or_default(&config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", config_path.display(), e))?;

    if let Some(file) = &cli.file {
        config.data_file = file.clone();
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }

    Ok(config)
}

/// Run the menu on stdin/stdout
fn cmd_interactive(config: &Config) -> Result<i32> {
    let prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    let mut session = Session::open(&config.data_file, config.capacity, prompter)?;
    let exit = session.run()?;
    tracing::debug!(?exit, "Session finished");
    Ok(exit.code())
}

fn load_roster(config: &Config) -> Result<Roster> {
    let report = roster_store::load(&config.data_file, config.capacity)
        .with_context(|| format!("Failed to read {}", config.data_file.display()))?;
    if report.source == LoadSource::Missing {
        tracing::info!("No record file at {}", config.data_file.display());
    }
    Ok(report.roster)
}

/// Print the (filtered) table
fn cmd_list(config: &Config, query: Option<&str>, out: &mut impl Write) -> Result<()> {
    let roster = load_roster(config)?;
    let hits = roster.filter(query.unwrap_or(""));

    if hits.is_empty() {
        writeln!(out, "No records available.")?;
        return Ok(());
    }

    table::write_table(out, hits.iter().copied())?;
    writeln!(out, "{} student(s)", hits.len())?;
    Ok(())
}

/// Merge a CSV file into the record file
fn cmd_import(config: &Config, csv: &Path) -> Result<()> {
    let mut roster = load_roster(config)?;
    let report = roster_store::import_csv(csv, &mut roster)?;

    if report.imported == 0 {
        println!("{} No new unique students imported.", "Info:".yellow().bold());
        return Ok(());
    }

    roster_store::save(&config.data_file, &roster)
        .with_context(|| format!("Failed to save {}", config.data_file.display()))?;

    println!(
        "{} Imported {} student(s) into {}",
        "Success:".green().bold(),
        report.imported,
        config.data_file.display()
    );
    if report.duplicates + report.invalid + report.rejected_capacity > 0 {
        println!(
            "{} Skipped {} duplicate, {} invalid, {} over capacity",
            "Info:".blue().bold(),
            report.duplicates,
            report.invalid,
            report.rejected_capacity
        );
    }
    Ok(())
}

/// Export the record file as CSV or JSON
fn cmd_export(config: &Config, path: &Path, json: bool) -> Result<()> {
    let roster = load_roster(config)?;
    if roster.is_empty() {
        println!("{} No data to export!", "Warning:".yellow().bold());
        return Ok(());
    }

    if json {
        roster_store::export_json(path, &roster)?;
    } else {
        roster_store::export_csv(path, &roster)?;
    }

    println!(
        "{} Exported {} student(s) to {}",
        "Success:".green().bold(),
        roster.len(),
        path.display()
    );
    Ok(())
}
