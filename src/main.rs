// Fri Oct 16 2026 - Alex

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use codevein_fix::{
    config::{FixConfig, Resolution, DEFAULT_CONFIG_FILE},
    display::{DisplayQuery, FixedDisplay, NoDisplay},
    fixes::{run_fixes, FixOutcome, LogObserver},
    hook::{InterceptionAdapter, RecordingFacility},
    memory::{pe, Address, BufferMemory, ModuleImage},
    pattern::{compile, BytePattern, PatternScanner},
    utils::{
        logging::{self, LoggingUtils, DEFAULT_LOG_FILE},
        pluralize,
    },
};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Aspect ratio, pillarbox and FOV fixes for Code Vein", long_about = None)]
struct Args {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Append logs to a file instead of stderr
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = DEFAULT_LOG_FILE)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find byte patterns in an executable
    Scan {
        file: PathBuf,

        #[arg(required = true)]
        patterns: Vec<String>,

        #[arg(long)]
        json: bool,
    },
    /// Apply the fixes to a copy of an executable
    Apply {
        file: PathBuf,

        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target resolution as WIDTHxHEIGHT, used when the config leaves it at 0x0
        #[arg(short, long)]
        resolution: Option<Resolution>,

        /// Where to write the patched executable. Without it nothing is written.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write a configuration file with default settings
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(Serialize)]
struct PatternHits {
    pattern: String,
    hits: Vec<HitLocation>,
}

#[derive(Serialize)]
struct HitLocation {
    file_offset: usize,
    rva: Option<u64>,
    section: Option<String>,
}

fn main() {
    let args = Args::parse();

    let level = LoggingUtils::level_from_verbosity(args.verbose as u8);
    match &args.log_file {
        Some(path) => {
            if let Err(e) = LoggingUtils::init_logger_with_file(level, path) {
                eprintln!("{} Failed to open log file {}: {}", "[!]".red(), path.display(), e);
                std::process::exit(1);
            }
        }
        None if !args.verbose && std::env::var_os("RUST_LOG").is_some() => logging::init_from_env(),
        None => LoggingUtils::init_logger(level),
    }

    let result = match args.command {
        Command::Scan { file, patterns, json } => scan(file, patterns, json),
        Command::Apply {
            file,
            config,
            resolution,
            output,
        } => apply(file, config, resolution, output),
        Command::InitConfig { path } => init_config(path),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn scan(file: PathBuf, patterns: Vec<String>, json: bool) -> Result<()> {
    let compiled = patterns
        .iter()
        .map(|text| compile(text).with_context(|| format!("Invalid pattern '{}'", text)))
        .collect::<Result<Vec<BytePattern>>>()?;

    let handle = File::open(&file).with_context(|| format!("Failed to open {}", file.display()))?;
    // SAFETY: the mapping is only read, and only for the duration of this call
    let mapped = unsafe { memmap2::Mmap::map(&handle) }.with_context(|| format!("Failed to map {}", file.display()))?;
    let image = ModuleImage::new(Address::zero(), &mapped[..]).context("File is empty")?;
    let sections = pe::sections(&mapped).unwrap_or_default();

    if !json {
        println!("{} Scanning {} ({} bytes)", "[*]".blue(), file.display(), image.size());
    }

    let start = Instant::now();
    let scanner = PatternScanner::new().use_parallel(true);
    let results: Vec<PatternHits> = compiled
        .par_iter()
        .map(|pattern| PatternHits {
            pattern: pattern.to_pattern_string(),
            hits: scanner
                .scan(&image, pattern)
                .into_iter()
                .map(|hit| {
                    let located = pe::file_offset_to_rva(&sections, hit.offset);
                    HitLocation {
                        file_offset: hit.offset,
                        rva: located.map(|(rva, _)| rva),
                        section: located.map(|(_, s)| s.name.clone()),
                    }
                })
                .collect(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        let label = if result.hits.is_empty() {
            "[!]".yellow()
        } else {
            "[+]".green()
        };
        println!(
            "{} '{}': {}",
            label,
            result.pattern.cyan(),
            pluralize(result.hits.len(), "hit", "hits")
        );
        for hit in &result.hits {
            match (&hit.rva, &hit.section) {
                (Some(rva), Some(section)) => {
                    println!("    file 0x{:08x}  rva 0x{:08x}  {}", hit.file_offset, rva, section.dimmed())
                }
                _ => println!("    file 0x{:08x}", hit.file_offset),
            }
        }
    }
    println!("{} Done in {:.2}ms", "[+]".green(), start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

fn apply(
    file: PathBuf,
    config_path: Option<PathBuf>,
    resolution: Option<Resolution>,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = match &config_path {
        Some(path) => FixConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?,
        None => FixConfig::default(),
    };

    let display: Box<dyn DisplayQuery> = match resolution {
        Some(r) => Box::new(FixedDisplay(r)),
        None => Box::new(NoDisplay),
    };

    println!("{} Loading {}", "[*]".blue(), file.display());
    let mut memory =
        BufferMemory::load(&file, Address::zero()).with_context(|| format!("Failed to load {}", file.display()))?;

    // Nothing executes a file, so interception points are recorded only.
    let hooks = InterceptionAdapter::new(RecordingFacility::new());
    let report = run_fixes(&config, display.as_ref(), &mut memory, &hooks, &LogObserver);

    println!();
    for entry in report.entries() {
        let label = match &entry.outcome {
            FixOutcome::Patched { .. } | FixOutcome::Hooked { .. } => "[+]".green(),
            FixOutcome::Disabled => "[-]".dimmed(),
            FixOutcome::NotFound => "[?]".yellow(),
            FixOutcome::Partial { .. } => "[~]".yellow(),
            FixOutcome::Failed(_) => "[!]".red(),
        };
        println!("{} {:<12} {}", label, entry.name, entry.outcome);
    }

    if report.has_failures() {
        bail!("{} failed", pluralize(report.failures().count(), "fix", "fixes"));
    }

    match output {
        Some(path) => {
            std::fs::write(&path, memory.into_bytes())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{} Patched executable written to {}", "[+]".green(), path.display());
        }
        None => println!("{} Dry run, nothing written (use --output)", "[*]".blue()),
    }
    Ok(())
}

fn init_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    FixConfig::default()
        .save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Wrote default configuration to {}", "[+]".green(), path.display());
    Ok(())
}
