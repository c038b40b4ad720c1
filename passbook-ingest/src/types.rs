use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

use crate::normalize::format_amount;

/// Banks with a supported statement dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bank {
    /// Bank of Baroda: free-text page extracts with trailing running balances.
    Bob,
    /// Bank of Maharashtra: table extracts with debit/credit columns.
    Bom,
    /// Punjab National Bank: table extracts with withdrawal/deposit columns.
    Pnb,
}

impl Bank {
    pub fn code(self) -> &'static str {
        match self {
            Bank::Bob => "bob",
            Bank::Bom => "bom",
            Bank::Pnb => "pnb",
        }
    }

    pub fn input_kind(self) -> InputKind {
        match self {
            Bank::Bob => InputKind::Text,
            Bank::Bom | Bank::Pnb => InputKind::Table,
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code().to_uppercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    /// Page text, one statement line per text line.
    Text,
    /// Delimited rows produced by a table extractor.
    Table,
}

/// Debit/credit flag as written in the output (`D` / `C`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrCr {
    #[serde(rename = "D")]
    Debit,
    #[serde(rename = "C")]
    Credit,
}

/// Signed direction plus magnitude of a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Polarity {
    pub flag: DrCr,
    /// Always strictly positive.
    pub amount: Decimal,
}

/// Sub-fields derived from a narration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub txn_type: String,
    pub txn_ref: String,
    pub payer: String,
}

/// Normalized output record (one CSV row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub txn_date: String,
    #[serde(serialize_with = "serialize_amount")]
    pub amount: Option<Decimal>,
    pub dr_cr_flag: Option<DrCr>,
    pub txn_type: String,
    pub txn_ref: String,
    pub payer: String,
    /// Narration exactly as reconstructed from the source.
    pub description: String,
}

impl Transaction {
    pub fn new(txn_date: String, polarity: Polarity, classified: Classified, description: String) -> Self {
        Self {
            txn_date,
            amount: Some(polarity.amount),
            dr_cr_flag: Some(polarity.flag),
            txn_type: classified.txn_type,
            txn_ref: classified.txn_ref,
            payer: classified.payer,
            description,
        }
    }
}

fn serialize_amount<S: Serializer>(amount: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error> {
    match amount {
        Some(value) if !value.is_zero() => serializer.serialize_str(&format_amount(*value)),
        _ => serializer.serialize_str(""),
    }
}

/// Result of cleaning one source before it is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cleaned {
    pub transactions: Vec<Transaction>,
    /// Non-blank source lines (text) or raw rows (tables) read.
    pub read: usize,
    /// Candidate records built from them, before field derivation.
    pub reconstructed: usize,
    /// Candidate records or rows that produced no output.
    pub skipped: usize,
}

/// Knobs the caller may tune; every field has a working default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOptions {
    /// How much of a delimited source is inspected when sniffing its delimiter.
    pub sniff_sample_bytes: usize,
    /// Candidate delimiters, in order of preference on ties.
    pub delimiters: Vec<u8>,
    /// Lowercase line prefixes treated as boilerplate in BOB text, on top of the built-in list.
    pub extra_noise_prefixes: Vec<String>,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            sniff_sample_bytes: 4096,
            delimiters: b",|;\t".to_vec(),
            extra_noise_prefixes: Vec::new(),
        }
    }
}

/// Summary of one `clean_statement` run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub bank: Bank,
    pub source: PathBuf,
    pub target: PathBuf,
    pub read: usize,
    pub reconstructed: usize,
    pub written: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bank_display_and_kind() {
        assert_eq!(Bank::Pnb.to_string(), "PNB");
        assert_eq!(Bank::Bob.input_kind(), InputKind::Text);
        assert_eq!(Bank::Bom.input_kind(), InputKind::Table);
    }

    #[test]
    fn test_transaction_new_carries_polarity() {
        let txn = Transaction::new(
            "01-04-2024".to_string(),
            Polarity { flag: DrCr::Debit, amount: Decimal::new(1250, 2) },
            Classified { txn_type: "UPI".into(), txn_ref: "42".into(), payer: String::new() },
            "UPI/42".to_string(),
        );
        assert_eq!(txn.dr_cr_flag, Some(DrCr::Debit));
        assert_eq!(txn.amount, Some(Decimal::new(1250, 2)));
        assert_eq!(txn.txn_ref, "42");
    }
}
