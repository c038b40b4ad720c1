use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use passbook_ingest::{Bank, InputKind, clean_statement};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt};

mod config;

#[derive(Parser, Debug)]
#[command(name = "passbook", version, about = "Bank statement extracts to normalized transaction CSV")]
struct Cli {
    /// Config file (default: ./passbook.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean one extracted statement into txn_date,amount,dr_cr_flag,... rows
    Clean {
        /// Statement dialect
        #[arg(long, value_enum)]
        bank: BankArg,

        /// Page text (bob) or table CSV (bom, pnb) produced by the extractor
        source: PathBuf,

        /// Output CSV (default: <source>.csv for bob, the source itself for bom/pnb)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default passbook.toml
    Init,

    /// Print the effective configuration
    Show,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BankArg {
    /// Bank of Baroda page text
    Bob,
    /// Bank of Maharashtra table extract
    Bom,
    /// Punjab National Bank table extract
    Pnb,
}

impl From<BankArg> for Bank {
    fn from(arg: BankArg) -> Self {
        match arg {
            BankArg::Bob => Bank::Bob,
            BankArg::Bom => Bank::Bom,
            BankArg::Pnb => Bank::Pnb,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    init_tracing(&cfg.log.level);

    match cli.command {
        Command::Clean { bank, source, output, json } => {
            let bank = Bank::from(bank);
            let target = output.unwrap_or_else(|| default_target(bank, &source));
            ensure_parent(&target)?;
            debug!(%bank, source = %source.display(), target = %target.display(), "cleaning statement");

            let report = clean_statement(bank, &source, &target, &cfg.ingest_options())
                .with_context(|| format!("cleaning {}", source.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "Applied {} cleanup. Read {}, rebuilt {}, wrote {} rows to {} ({} skipped).",
                    report.bank,
                    report.read,
                    report.reconstructed,
                    report.written,
                    report.target.display(),
                    report.skipped
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Text extracts get a sibling `.csv`; table extracts are cleaned in place.
fn default_target(bank: Bank, source: &Path) -> PathBuf {
    match bank.input_kind() {
        InputKind::Text => source.with_extension("csv"),
        InputKind::Table => source.to_path_buf(),
    }
}

fn ensure_parent(target: &Path) -> Result<()> {
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
        }
        _ => Ok(()),
    }
}
