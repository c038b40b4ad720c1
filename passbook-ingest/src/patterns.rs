//! Regexes shared by the parsers, compiled once per process.

use once_cell::sync::Lazy;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// `dd-mm-yy <rest>`: the first line of every BOB entry.
pub static BOB_DATE_LINE: Lazy<Regex> =
    Lazy::new(|| compile(r"^(?P<date>\d{2}-\d{2}-\d{2})\s+(?P<rest>.+)$"));

/// Trailing running balance, optionally suffixed with its sign.
pub static BALANCE_TAIL: Lazy<Regex> =
    Lazy::new(|| compile(r"(?P<balance>[0-9,]+\.\d{2})(?P<flag>Cr|Dr)?$"));

/// A whole whitespace token holding a grouped-thousands amount.
pub static AMOUNT_TOKEN: Lazy<Regex> = Lazy::new(|| compile(r"^\d{1,3}(?:,\d{3})*\.\d{2}$"));

pub static UPI_REF: Lazy<Regex> = Lazy::new(|| compile(r"(?i)UPI/(\d+)"));
pub static IMPS_REF: Lazy<Regex> = Lazy::new(|| compile(r"(?i)IMPS/[0-9]*/(\d+)"));
pub static NEFT_REF: Lazy<Regex> = Lazy::new(|| compile(r"(?i)NEFT-([A-Z0-9]+)"));

/// Last-resort reference: any standalone run of six or more digits.
pub static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| compile(r"\b\d{6,}\b"));

pub static SLASH_SPACING: Lazy<Regex> = Lazy::new(|| compile(r"\s*/\s*"));

/// `NEFT <ref> <payer> MAH...` / `RTGS <ref> <payer> MAH...`
pub static NEFT_MAH_PAYER: Lazy<Regex> = Lazy::new(|| compile(r"(?i)NEFT\s+\S+\s+(.+?)\s+MAH"));
pub static RTGS_MAH_PAYER: Lazy<Regex> = Lazy::new(|| compile(r"(?i)RTGS\s+\S+\s+(.+?)\s+MAH"));

pub static HEADER_CELL_JUNK: Lazy<Regex> = Lazy::new(|| compile(r"[^a-z0-9]+"));

pub static DATE_SEPARATOR: Lazy<Regex> = Lazy::new(|| compile(r"[-/.]"));
