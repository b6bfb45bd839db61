//! modmeta CLI - parse mod descriptors into typed metadata records
//!
//! Parses one or more `About.xml` descriptors and prints the resulting
//! records, or summarizes an external rules database.

use clap::{Parser, Subcommand};
use modmeta::{
    get_rules_db, parse_descriptor, ListedMod, OutputFormat, ParserConfig, RecordWriter,
    TargetVersion,
};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "modmeta")]
#[command(version, about = "Typed metadata and load-order rules from mod descriptors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse descriptors and print their records
    Parse {
        /// Descriptor files (About.xml)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// YAML parser configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Game version to target, overrides the config file (e.g. 1.5)
        #[arg(short, long)]
        target_version: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Ndjson)]
        format: OutputFormat,

        /// Exit with status 1 if any descriptor is invalid
        #[arg(long)]
        strict: bool,
    },

    /// Summarize an external rules database
    RulesDb {
        /// Path to the rules database JSON
        path: PathBuf,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            paths,
            config,
            target_version,
            format,
            strict,
        } => run_parse(paths, config, target_version, format, strict),
        Commands::RulesDb { path } => run_rules_db(path),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

fn run_parse(
    paths: Vec<PathBuf>,
    config: Option<PathBuf>,
    target_version: Option<String>,
    format: OutputFormat,
    strict: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ParserConfig::load_from_file(path)?,
        None => ParserConfig::default(),
    };

    let target = match target_version {
        Some(version) => TargetVersion::parse(&version)?,
        None => config.target()?,
    };
    tracing::info!("Targeting game version {}", target);

    if let Some(path) = &config.rules_db {
        if let Some(db) = get_rules_db(path)? {
            tracing::info!(
                "Rules DB {} has {} entries (not merged into parsed rules)",
                path.display(),
                db.rules.len()
            );
        }
    }

    let stdout = io::stdout();
    let mut writer = RecordWriter::new(stdout.lock(), format)?;
    let mut invalid = 0usize;

    for path in &paths {
        let (valid, record) = parse_descriptor(path, &target);
        if !valid {
            invalid += 1;
            tracing::warn!(
                "{} is invalid ({} problem(s))",
                path.display(),
                record.metadata().validity.reasons().len()
            );
        }
        writer.write(&record)?;
    }
    drop(writer.finish()?);

    if invalid > 0 {
        eprintln!("{} of {} descriptor(s) invalid", invalid, paths.len());
    }

    Ok(if strict && invalid > 0 { 1 } else { 0 })
}

fn run_rules_db(path: PathBuf) -> Result<i32, Box<dyn std::error::Error>> {
    let Some(db) = get_rules_db(&path)? else {
        eprintln!("No rules DB at {}", path.display());
        return Ok(1);
    };

    println!("Rules DB: {}", path.display());
    println!("  entries: {}", db.rules.len());
    match db.updated_at() {
        Some(updated) => println!("  updated: {}", updated.to_rfc3339()),
        None => println!("  updated: unknown"),
    }

    let load_bottom = db.rules.values().filter(|rule| rule.is_load_bottom()).count();
    let load_top = db.rules.values().filter(|rule| rule.is_load_top()).count();
    println!("  load top: {}, load bottom: {}", load_top, load_bottom);

    Ok(0)
}
