//! Bank of Baroda statement parser (page text)
//!
//! Expected extracted-text rows:
//!   05-04-24 UPI/412345678901/PAYMENT FROM/okaxis/RAVI KUMAR 1,500.00 26,300.50Cr
//!            continuation of the narration on its own line
//!   06-04-24 NEFT-N0961234/ACME CORP 2,000.00 24,300.50Cr
//!
//! Each entry starts with a `dd-mm-yy` line ending in the running balance.
//! Wrapped narration lines follow until the next date line.

use rust_decimal::Decimal;
use tracing::debug;

use crate::narration::{NarrationRules, digit_run, leading_code, rail_marker, slash_field, text_after};
use crate::normalize::{collapse_whitespace, format_bob_date, parse_amount};
use crate::patterns::{AMOUNT_TOKEN, BALANCE_TAIL, BOB_DATE_LINE, IMPS_REF, NEFT_REF, UPI_REF};
use crate::polarity::RunningBalance;
use crate::types::{Cleaned, IngestOptions, Transaction};

/// Letterhead, branch details, column headings and page footers.
pub const NOISE_PREFIXES: &[&str] = &[
    "bank of baroda",
    "midc pimpri",
    "address:",
    "helpline",
    "branch phone",
    "micr code",
    "a/c name",
    "a/c number",
    "statement of account",
    "date particulars",
    "note:",
    "unless the constituent",
    "page total",
];

/// One statement entry rebuilt from a date line and its continuation lines.
#[derive(Debug, Clone, PartialEq)]
pub struct BobEntry {
    /// Raw `dd-mm-yy`.
    pub date: String,
    pub narration: String,
    /// Signed closing balance; `Dr` balances are negative.
    pub balance: Decimal,
    /// Amount tokens between narration and balance, left to right.
    pub amounts: Vec<Decimal>,
}

pub fn is_noise(line: &str, extra_prefixes: &[String]) -> bool {
    if line.is_empty() || line.starts_with('-') {
        return true;
    }
    let lowered = line.to_lowercase();
    NOISE_PREFIXES.iter().any(|p| lowered.starts_with(p))
        || extra_prefixes.iter().any(|p| lowered.starts_with(p.as_str()))
}

/// Balance at the end of `rest` and the text before it.
pub fn split_balance_tail(rest: &str) -> Option<(Decimal, &str)> {
    let caps = BALANCE_TAIL.captures(rest)?;
    let whole = caps.get(0)?;
    let mut balance = parse_amount(&caps["balance"])?;
    if caps.name("flag").is_some_and(|f| f.as_str() == "Dr") {
        balance = -balance;
    }
    Some((balance, &rest[..whole.start()]))
}

/// Pop grouped-thousands amount tokens off the right of `body`.
///
/// Returns the amounts in their original order and the remaining narration.
pub fn pop_amount_tokens(body: &str) -> (Vec<Decimal>, String) {
    let mut tokens: Vec<&str> = body.split_whitespace().collect();
    let mut amounts = Vec::new();

    while let Some(&last) = tokens.last() {
        if !AMOUNT_TOKEN.is_match(last) {
            break;
        }
        tokens.pop();
        if let Some(value) = parse_amount(last) {
            amounts.push(value);
        }
    }
    amounts.reverse();

    (amounts, tokens.join(" "))
}

fn parse_entry(main_line: &str, extras: &[String]) -> Option<BobEntry> {
    let caps = BOB_DATE_LINE.captures(main_line)?;
    let rest = caps["rest"].trim();

    let Some((balance, body)) = split_balance_tail(rest) else {
        debug!(line = main_line, "no balance tail; dropping entry");
        return None;
    };
    let (amounts, narration) = pop_amount_tokens(body);

    let mut parts = vec![narration];
    parts.extend(extras.iter().cloned());
    let narration = parts.join(" ").trim().to_string();

    Some(BobEntry {
        date: caps["date"].to_string(),
        narration,
        balance,
        amounts,
    })
}

/// Entries rebuilt from one page-text source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconstruction {
    pub entries: Vec<BobEntry>,
    /// Date lines that did not parse into an entry.
    pub dropped: usize,
    /// Non-blank raw lines seen, noise included.
    pub lines: usize,
}

/// Group page text into entries.
pub fn reconstruct(text: &str, options: &IngestOptions) -> Reconstruction {
    let mut out = Reconstruction::default();
    let mut current: Option<&str> = None;
    let mut extras: Vec<String> = Vec::new();

    let finish = |out: &mut Reconstruction, line: &str, extras: &[String]| match parse_entry(line, extras) {
        Some(entry) => out.entries.push(entry),
        None => out.dropped += 1,
    };

    for raw in text.split(['\n', '\x0c']) {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        out.lines += 1;
        if is_noise(line, &options.extra_noise_prefixes) {
            debug!(line, "noise line; skipping");
            continue;
        }
        if BOB_DATE_LINE.is_match(line) {
            if let Some(prev) = current.replace(line) {
                finish(&mut out, prev, &extras);
            }
            extras.clear();
        } else if current.is_some() {
            extras.push(line.to_string());
        }
    }
    if let Some(last) = current {
        finish(&mut out, last, &extras);
    }

    out
}

/// Bank of Baroda narration grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BobRules;

impl NarrationRules for BobRules {
    fn txn_type(&self, narration: &str) -> String {
        let desc = collapse_whitespace(narration);
        if desc.is_empty() {
            return String::new();
        }
        let upper = desc.to_uppercase();

        if upper.contains("IMPS/") {
            return "IMPS".to_string();
        }
        if upper.contains("UPI/") {
            // Channel code sits right before the first slash, e.g. `MOBUPI/...`.
            let prefix = desc.split('/').next().unwrap_or_default();
            let chars: Vec<char> = prefix.chars().collect();
            let start = chars.len().saturating_sub(3);
            return chars[start..].iter().collect::<String>().to_uppercase();
        }
        if let Some(rail @ ("NEFT" | "RTGS")) = rail_marker(&upper) {
            // A rail code written right after the first slash overrides the marker.
            let named = desc
                .split_once('/')
                .map(|(_, seg)| seg.trim().chars().take(5).collect::<String>().to_uppercase())
                .map(|c| c.trim_matches(['-', ' ']).to_string());
            return match named.as_deref() {
                Some(code @ ("NEFT" | "RTGS")) => code.to_string(),
                _ => rail.to_string(),
            };
        }

        leading_code(&desc)
    }

    fn txn_ref(&self, narration: &str, txn_type: &str) -> String {
        if txn_type == "RTGS" {
            let parts: Vec<&str> = narration.split('-').collect();
            if parts.len() >= 2 {
                let candidate = parts[parts.len() - 2].trim();
                if !candidate.is_empty() {
                    return candidate.to_string();
                }
            }
        }

        [&*UPI_REF, &*IMPS_REF, &*NEFT_REF]
            .iter()
            .find_map(|re| re.captures(narration).map(|c| c[1].to_string()))
            .or_else(|| digit_run(narration))
            .unwrap_or_default()
    }

    fn payer(&self, narration: &str, txn_type: &str, txn_ref: &str) -> String {
        if txn_type == "UPI" {
            if let Some(payer) = slash_field(narration, 4) {
                return payer;
            }
        }
        text_after(narration, txn_ref).unwrap_or_default()
    }
}

/// Clean extracted BOB page text into output records.
pub fn clean_bob_text(text: &str, options: &IngestOptions) -> Cleaned {
    let Reconstruction { entries, dropped, lines } = reconstruct(text, options);
    let reconstructed = entries.len() + dropped;
    let mut skipped = dropped;
    let mut running = RunningBalance::new();
    let mut transactions = Vec::with_capacity(entries.len());

    for entry in entries {
        let Some(polarity) = running.resolve(entry.balance, &entry.amounts) else {
            debug!(date = %entry.date, "no amount evidence; skipping entry");
            skipped += 1;
            continue;
        };

        let classified = BobRules.classify(&entry.narration);
        transactions.push(Transaction::new(
            format_bob_date(&entry.date),
            polarity,
            classified,
            entry.narration,
        ));
    }

    Cleaned {
        transactions,
        read: lines,
        reconstructed,
        skipped,
    }
}
