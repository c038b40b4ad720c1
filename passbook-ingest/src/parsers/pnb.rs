//! Punjab National Bank statement parser (table extract)
//!
//! Expected columns after the page/table/row counters:
//!   Tran Date | Withdrawal | Deposit | Balance | Alpha | Chq No | Narration | Additional Info
//!
//! Narrations are colon-delimited, e.g. `NEFT:SBIN123456789:ACME CORP`.

use tracing::debug;

use crate::error::Result;
use crate::narration::{NarrationRules, digit_run, leading_code, mah_payer, rail_marker};
use crate::normalize::{collapse_whitespace, format_table_date};
use crate::polarity::from_columns;
use crate::tabular::{TableRow, table_rows};
use crate::types::{Bank, Cleaned, Transaction};

/// One data row, in source column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PnbRow {
    pub tran_date: String,
    pub withdrawal: String,
    pub deposit: String,
    pub balance: String,
    pub alpha: String,
    pub cheque_no: String,
    pub narration: String,
    pub additional_info: String,
}

impl TableRow for PnbRow {
    const BANK: Bank = Bank::Pnb;
    const SIGNATURE: &'static [&'static str] = &[
        "trandate",
        "withdrawal",
        "deposit",
        "balance",
        "alpha",
        "chqno",
        "narration",
        "additionalinfo",
    ];

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = move || cells.next().unwrap_or_default();
        PnbRow {
            tran_date: next(),
            withdrawal: next(),
            deposit: next(),
            balance: next(),
            alpha: next(),
            cheque_no: next(),
            narration: next(),
            additional_info: next(),
        }
    }

    fn is_separator(&self) -> bool {
        let blank = [&self.tran_date, &self.narration, &self.withdrawal, &self.deposit]
            .iter()
            .all(|c| c.is_empty());
        blank || self.tran_date.to_lowercase().starts_with("page total")
    }
}

/// Punjab National Bank narration grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PnbRules;

impl NarrationRules for PnbRules {
    fn txn_type(&self, narration: &str) -> String {
        let prefix = leading_code(narration);
        if prefix.starts_with("UPI") {
            return "UPI".to_string();
        }
        match rail_marker(&narration.to_uppercase()) {
            Some(rail) => rail.to_string(),
            None => prefix,
        }
    }

    fn txn_ref(&self, narration: &str, txn_type: &str) -> String {
        let text = narration.trim();
        if text.is_empty() {
            return String::new();
        }

        let positional = match txn_type {
            "NEFT" | "RTGS" => {
                let parts: Vec<&str> = text.split(':').collect();
                (parts.len() >= 3).then(|| parts[1].trim())
            }
            "IMPS" => {
                let parts: Vec<&str> = text.split('/').collect();
                (parts.len() >= 3).then(|| parts[1].trim())
            }
            _ => None,
        };

        match positional.filter(|r| !r.is_empty()) {
            Some(reference) => reference.to_string(),
            None => digit_run(text).unwrap_or_default(),
        }
    }

    fn payer(&self, narration: &str, txn_type: &str, _txn_ref: &str) -> String {
        if let Some(payer) = mah_payer(narration, txn_type) {
            return payer;
        }

        let normalized = collapse_whitespace(narration);
        if txn_type == "RTGS" {
            let parts: Vec<&str> = normalized.split(':').collect();
            if parts.len() >= 4 {
                return parts[3..].join(":").trim().to_string();
            }
            return String::new();
        }

        // Everything after the second colon.
        normalized
            .splitn(3, ':')
            .nth(2)
            .map(|rest| rest.trim().to_string())
            .unwrap_or_default()
    }
}

fn to_transaction(row: PnbRow) -> Option<Transaction> {
    let polarity = match from_columns(&row.withdrawal, &row.deposit) {
        Ok(Some(p)) => p,
        Ok(None) => {
            debug!(date = %row.tran_date, "no withdrawal or deposit; skipping row");
            return None;
        }
        Err(e) => {
            debug!(date = %row.tran_date, error = %e, "skipping row");
            return None;
        }
    };

    let mut classified = PnbRules.classify(&row.narration);
    if !row.cheque_no.is_empty() {
        classified.txn_ref = row.cheque_no;
    }

    Some(Transaction::new(
        format_table_date(&row.tran_date),
        polarity,
        classified,
        row.narration,
    ))
}

/// Clean raw PNB table rows (header included) into output records.
pub fn clean_pnb_rows(rows: &[Vec<String>]) -> Result<Cleaned> {
    let table = table_rows::<PnbRow>(rows)?;
    let reconstructed = table.rows.len();
    let mut skipped = table.skipped;
    let mut transactions = Vec::with_capacity(reconstructed);

    for row in table.rows {
        match to_transaction(row) {
            Some(txn) => transactions.push(txn),
            None => skipped += 1,
        }
    }

    Ok(Cleaned {
        transactions,
        read: rows.len(),
        reconstructed,
        skipped,
    })
}
