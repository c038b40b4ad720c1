//! Row reconstruction for delimited table extracts.
//!
//! Table extractors prefix every row with page/table/row counters and
//! repeat the statement header on each page, so the header is searched for
//! rather than assumed, and the data window is sliced relative to it.

use tracing::{debug, warn};

use crate::error::{IngestError, Result};
use crate::normalize::{clean_cell, normalize_header_cell};
use crate::types::Bank;

/// Column offsets tried for the header, in order: after the three
/// page/table/row counters, then at the start of the row.
pub const HEADER_OFFSETS: [usize; 2] = [3, 0];

/// A bank's source row, filled positionally from a sliced data window.
pub trait TableRow: Sized {
    const BANK: Bank;

    /// Normalized header cells, in column order.
    const SIGNATURE: &'static [&'static str];

    fn from_cells(cells: Vec<String>) -> Self;

    /// Separator rows (blank lines, page totals) carry no transaction.
    fn is_separator(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderLocation {
    pub row: usize,
    pub offset: usize,
}

/// Rows that survived slicing and filtering.
#[derive(Debug)]
pub struct TableRows<R> {
    pub rows: Vec<R>,
    pub skipped: usize,
}

/// Pick the candidate delimiter that splits the most sample lines into the
/// same number of fields. Quoted text is ignored.
pub fn sniff_delimiter(sample: &str, candidates: &[u8]) -> Option<u8> {
    let lines: Vec<&str> = sample.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut best: Option<(u8, usize)> = None;

    for &delim in candidates {
        let counts: Vec<usize> = lines.iter().map(|l| count_unquoted(l, delim)).collect();
        let Some(modal) = modal_count(&counts) else {
            continue;
        };
        let score = counts.iter().filter(|&&c| c == modal).count();
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((delim, score));
        }
    }

    best.map(|(d, _)| d)
}

fn count_unquoted(line: &str, delim: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for b in line.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delim && !in_quotes {
            count += 1;
        }
    }
    count
}

// Most frequent nonzero field-separator count; ties go to the larger count.
fn modal_count(counts: &[usize]) -> Option<usize> {
    let mut tally: Vec<(usize, usize)> = Vec::new();
    for &c in counts.iter().filter(|&&c| c > 0) {
        match tally.iter_mut().find(|(value, _)| *value == c) {
            Some((_, n)) => *n += 1,
            None => tally.push((c, 1)),
        }
    }
    tally
        .into_iter()
        .max_by_key(|&(value, n)| (n, value))
        .map(|(value, _)| value)
}

/// Parse delimited text into raw rows, sniffing the delimiter from a prefix.
///
/// Falls back to a comma when no candidate fits.
pub fn read_rows(text: &str, sample_bytes: usize, candidates: &[u8]) -> Result<Vec<Vec<String>>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut end = sample_bytes.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }

    let delimiter = sniff_delimiter(&text[..end], candidates).unwrap_or_else(|| {
        warn!("could not sniff delimiter; falling back to comma");
        b','
    });
    debug!(delimiter = %char::from(delimiter).escape_default(), "sniffed delimiter");

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

fn matches_signature(cells: &[String], signature: &[&str]) -> bool {
    cells.len() == signature.len()
        && cells
            .iter()
            .zip(signature)
            .all(|(cell, expected)| normalize_header_cell(cell) == *expected)
}

/// First row whose window at one of [`HEADER_OFFSETS`] is exactly the signature.
pub fn locate_header(rows: &[Vec<String>], signature: &[&str]) -> Option<HeaderLocation> {
    rows.iter().enumerate().find_map(|(row, cells)| {
        HEADER_OFFSETS.iter().find_map(|&offset| {
            let window = cells.get(offset..)?;
            let window = &window[..signature.len().min(window.len())];
            matches_signature(window, signature).then_some(HeaderLocation { row, offset })
        })
    })
}

/// Cells `offset..offset + width`, right-padded with empty cells.
pub fn slice_row(cells: &[String], offset: usize, width: usize) -> Vec<String> {
    let mut data: Vec<String> = cells.iter().skip(offset).take(width).cloned().collect();
    data.resize(width, String::new());
    data
}

/// Locate the header and turn every following row into `R`, dropping
/// repeated headers and separator rows.
pub fn table_rows<R: TableRow>(rows: &[Vec<String>]) -> Result<TableRows<R>> {
    let header = locate_header(rows, R::SIGNATURE).ok_or(IngestError::HeaderNotFound { bank: R::BANK })?;
    debug!(row = header.row, offset = header.offset, bank = %R::BANK, "located header");

    let width = R::SIGNATURE.len();
    let mut out = Vec::new();
    let mut skipped = 0;

    for (idx, raw) in rows.iter().enumerate().skip(header.row + 1) {
        let cells: Vec<String> = slice_row(raw, header.offset, width)
            .iter()
            .map(|c| clean_cell(c))
            .collect();

        if matches_signature(&cells, R::SIGNATURE) {
            debug!(row = idx, "skipping repeated header");
            continue;
        }

        let row = R::from_cells(cells);
        if row.is_separator() {
            debug!(row = idx, "skipping separator row");
            skipped += 1;
            continue;
        }
        out.push(row);
    }

    Ok(TableRows { rows: out, skipped })
}
