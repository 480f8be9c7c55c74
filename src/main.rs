//! pq-seed CLI
//!
//! Derives per-algorithm seeds from one BIP39 mnemonic. The mnemonic is
//! read from a file or stdin, never from the command line; the passphrase
//! comes from `PQ_SEED_PASSPHRASE`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

use pq_seed::utils::config::{DeriverConfig, PASSPHRASE_ENV};
use pq_seed::utils::logging;
use pq_seed::{
    derive_all_with_style, log_error, log_info, log_warn, parse_path, AddressStyle, Algorithm,
    PathTable, SeedReport,
};

const MODULE: &str = "cli";
const MNEMONIC_BUFFER_LEN: usize = 1024;

/// Post-quantum seed deriver
#[derive(Parser)]
#[command(name = "pq-seed")]
#[command(version)]
#[command(about = "Derive per-algorithm seeds from one BIP39 mnemonic", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Configuration file (defaults to $PQ_SEED_CONFIG, then built-in paths)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive algorithm seeds from a mnemonic (read from stdin unless a file is given)
    Derive {
        /// File holding the mnemonic words
        #[arg(long)]
        mnemonic_file: Option<PathBuf>,

        /// Only derive these algorithms (repeatable)
        #[arg(long = "algorithm", value_name = "ID")]
        algorithms: Vec<Algorithm>,

        /// Render the legacy address in EIP-55 mixed case
        #[arg(long)]
        checksum: bool,
    },

    /// Print the configured path table
    Paths,

    /// Parse a derivation path and report lint warnings
    CheckPath {
        /// Path such as m/44'/9000'/0'/0/0
        path: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = DeriverConfig::resolve(cli.config.as_deref())?;
    if cli.verbose || config.debug {
        logging::enable_debug();
    }

    match cli.command {
        Commands::Derive {
            mnemonic_file,
            algorithms,
            checksum,
        } => run_derive(&config, cli.json, mnemonic_file.as_deref(), &algorithms, checksum),
        Commands::Paths => run_paths(&config.paths, cli.json),
        Commands::CheckPath { path } => run_check_path(&path, cli.json),
    }
}

fn run_derive(
    config: &DeriverConfig,
    json: bool,
    mnemonic_file: Option<&Path>,
    algorithms: &[Algorithm],
    checksum: bool,
) -> Result<()> {
    let table = if algorithms.is_empty() {
        config.paths.clone()
    } else {
        config.paths.select(algorithms)?
    };
    if table.is_empty() {
        bail!("path table is empty, nothing to derive");
    }
    warn_on_unusual_paths(&table);

    let style = if checksum {
        AddressStyle::Checksum
    } else {
        config.address_style()
    };

    let mnemonic = read_mnemonic(mnemonic_file)?;
    let passphrase = read_passphrase();

    let words: Vec<&str> = mnemonic.expose_secret().split_whitespace().collect();
    let report = derive_all_with_style(&words, passphrase.expose_secret(), &table, style)
        .map_err(|e| {
            log_error!(MODULE, "Derivation failed", code = format!("{:?}", e.code));
            e
        })?;
    log_info!(MODULE, "Derivation complete", algorithms = report.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn warn_on_unusual_paths(table: &PathTable) {
    for (algorithm, path) in table.iter() {
        // malformed paths fail later with full context
        if let Ok(parsed) = parse_path(path) {
            for warning in parsed.lint() {
                log_warn!(MODULE, warning, algorithm = algorithm, path = path);
            }
        }
    }
}

fn run_paths(table: &PathTable, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(table)?);
        return Ok(());
    }

    for (algorithm, path) in table.iter() {
        println!("{:<8} {}", algorithm, path);
    }
    Ok(())
}

fn run_check_path(text: &str, json: bool) -> Result<()> {
    let path = parse_path(text).with_context(|| format!("invalid derivation path '{}'", text))?;
    let warnings = path.lint();

    if json {
        let components: Vec<_> = path
            .components()
            .iter()
            .map(|c| {
                json!({
                    "index": c.index(),
                    "hardened": c.is_hardened(),
                    "full_index": c.full_index(),
                })
            })
            .collect();
        let value = json!({
            "path": path.to_string(),
            "depth": path.depth(),
            "components": components,
            "warnings": warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("path:  {}", path);
    println!("depth: {}", path.depth());
    for (i, component) in path.components().iter().enumerate() {
        let kind = if component.is_hardened() { "hardened" } else { "normal" };
        println!("  [{}] {:<12} {:<8} 0x{:08x}", i, component.index(), kind, component.full_index());
    }
    for warning in &warnings {
        println!("warning: {}", warning);
    }
    Ok(())
}

fn read_mnemonic(file: Option<&Path>) -> Result<SecretString> {
    // sized for the longest phrase so reading never regrows the buffer
    let mut text = Zeroizing::new(String::with_capacity(MNEMONIC_BUFFER_LEN));
    match file {
        Some(path) => {
            std::fs::File::open(path)
                .with_context(|| format!("cannot open mnemonic file {}", path.display()))?
                .read_to_string(&mut text)
                .context("cannot read mnemonic file")?;
        }
        None => {
            std::io::stdin()
                .read_to_string(&mut text)
                .context("cannot read mnemonic from stdin")?;
        }
    }
    // exact-length copy, so boxing it does not reallocate
    Ok(SecretString::from(text.as_str().to_owned()))
}

fn read_passphrase() -> SecretString {
    std::env::var(PASSPHRASE_ENV).unwrap_or_default().into()
}

fn print_report(report: &SeedReport) {
    for record in report {
        println!(
            "{:<8} {:<20} {}",
            record.algorithm(),
            record.path(),
            record.seed().expose_hex().as_str()
        );
        if let Some(address) = record.address() {
            println!("{:<8} {:<20} {}", "", "address", address);
        }
    }
}
