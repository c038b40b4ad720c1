//! Source-to-target cleanup for one statement file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{IngestError, Result};
use crate::parsers::{clean_bob_text, clean_bom_rows, clean_pnb_rows};
use crate::tabular::read_rows;
use crate::types::{Bank, CleanReport, Cleaned, IngestOptions};
use crate::writer::write_transactions;

/// Clean already-extracted statement content for `bank`.
///
/// BOB expects page text; BOM and PNB expect a delimited table extract.
/// A table source with no rows at all cleans to nothing rather than failing.
pub fn clean_content(bank: Bank, content: &str, options: &IngestOptions) -> Result<Cleaned> {
    match bank {
        Bank::Bob => Ok(clean_bob_text(content, options)),
        Bank::Bom | Bank::Pnb => {
            let rows = read_rows(content, options.sniff_sample_bytes, &options.delimiters)?;
            if rows.is_empty() {
                return Ok(Cleaned::default());
            }
            match bank {
                Bank::Bom => clean_bom_rows(&rows),
                _ => clean_pnb_rows(&rows),
            }
        }
    }
}

/// Read `source`, clean it, and write the normalized CSV to `target`.
///
/// `source` and `target` may be the same file; the output is fully
/// rendered before anything is written.
pub fn clean_statement(bank: Bank, source: &Path, target: &Path, options: &IngestOptions) -> Result<CleanReport> {
    if !source.exists() {
        return Err(IngestError::SourceNotFound(source.to_path_buf()));
    }

    let content = fs::read_to_string(source)?;
    let cleaned = clean_content(bank, &content, options)?;
    write_transactions(target, &cleaned.transactions)?;

    info!(
        %bank,
        source = %source.display(),
        target = %target.display(),
        read = cleaned.read,
        reconstructed = cleaned.reconstructed,
        written = cleaned.transactions.len(),
        skipped = cleaned.skipped,
        "cleaned statement"
    );

    Ok(CleanReport {
        bank,
        source: source.to_path_buf(),
        target: target.to_path_buf(),
        read: cleaned.read,
        reconstructed: cleaned.reconstructed,
        written: cleaned.transactions.len(),
        skipped: cleaned.skipped,
    })
}
