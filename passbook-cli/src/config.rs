use anyhow::{Context, Result};
use passbook_ingest::IngestOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "passbook.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogSection,
    pub sniff: SniffSection,
    pub bob: BobSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default `tracing` filter directive; `RUST_LOG` overrides it.
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SniffSection {
    pub sample_bytes: usize,
    /// Candidate delimiters as a string, e.g. ",|;\t".
    pub delimiters: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BobSection {
    /// Extra boilerplate line prefixes, matched case-insensitively.
    pub extra_noise_prefixes: Vec<String>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for SniffSection {
    fn default() -> Self {
        let defaults = IngestOptions::default();
        Self {
            sample_bytes: defaults.sniff_sample_bytes,
            delimiters: String::from_utf8_lossy(&defaults.delimiters).into_owned(),
        }
    }
}

impl Config {
    pub fn ingest_options(&self) -> IngestOptions {
        let defaults = IngestOptions::default();
        let delimiters: Vec<u8> = self
            .sniff
            .delimiters
            .chars()
            .filter(char::is_ascii)
            .map(|c| c as u8)
            .collect();

        IngestOptions {
            sniff_sample_bytes: if self.sniff.sample_bytes == 0 {
                defaults.sniff_sample_bytes
            } else {
                self.sniff.sample_bytes
            },
            delimiters: if delimiters.is_empty() { defaults.delimiters } else { delimiters },
            extra_noise_prefixes: self
                .bob
                .extra_noise_prefixes
                .iter()
                .map(|p| p.trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

/// `--config` if given, else `./passbook.toml`.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load the config; a missing default file means defaults, a missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let p = config_path(explicit);
    if !p.exists() {
        if explicit.is_some() {
            anyhow::bail!("config not found: {}", p.display());
        }
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(explicit: Option<&Path>) -> Result<()> {
    let p = config_path(explicit);
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&p, &Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}
