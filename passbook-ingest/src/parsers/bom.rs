//! Bank of Maharashtra statement parser (table extract)
//!
//! Expected columns after the page/table/row counters:
//!   Sr No | Date | Particulars | Cheque/Reference No | Debit | Credit | Balance | Channel

use tracing::debug;

use crate::error::Result;
use crate::narration::{NarrationRules, digit_run, leading_code, mah_payer, rail_marker, slash_field};
use crate::normalize::format_table_date;
use crate::polarity::from_columns;
use crate::tabular::{TableRow, table_rows};
use crate::types::{Bank, Cleaned, Transaction};

/// One data row, in source column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BomRow {
    pub sr_no: String,
    pub date: String,
    pub particulars: String,
    pub cheque_reference_no: String,
    pub debit: String,
    pub credit: String,
    pub balance: String,
    pub channel: String,
}

impl TableRow for BomRow {
    const BANK: Bank = Bank::Bom;
    const SIGNATURE: &'static [&'static str] = &[
        "srno",
        "date",
        "particulars",
        "chequereferenceno",
        "debit",
        "credit",
        "balance",
        "channel",
    ];

    fn from_cells(cells: Vec<String>) -> Self {
        let mut cells = cells.into_iter();
        let mut next = move || cells.next().unwrap_or_default();
        BomRow {
            sr_no: next(),
            date: next(),
            particulars: next(),
            cheque_reference_no: next(),
            debit: next(),
            credit: next(),
            balance: next(),
            channel: next(),
        }
    }

    fn is_separator(&self) -> bool {
        [&self.date, &self.particulars, &self.debit, &self.credit]
            .iter()
            .all(|c| c.is_empty())
    }
}

/// Bank of Maharashtra narration grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct BomRules;

impl NarrationRules for BomRules {
    fn txn_type(&self, narration: &str) -> String {
        match rail_marker(&narration.to_uppercase()) {
            Some(rail) => rail.to_string(),
            None => leading_code(narration),
        }
    }

    // The statement's own reference column takes precedence; see `clean_bom_rows`.
    fn txn_ref(&self, narration: &str, _txn_type: &str) -> String {
        digit_run(narration).unwrap_or_default()
    }

    fn payer(&self, narration: &str, txn_type: &str, _txn_ref: &str) -> String {
        let payer = match txn_type {
            "IMPS" => slash_field(narration, 4),
            "NEFT" | "RTGS" => mah_payer(narration, txn_type),
            _ => None,
        };
        payer.unwrap_or_default()
    }
}

fn to_transaction(row: BomRow) -> Option<Transaction> {
    let polarity = match from_columns(&row.debit, &row.credit) {
        Ok(Some(p)) => p,
        Ok(None) => {
            debug!(sr_no = %row.sr_no, "no debit or credit; skipping row");
            return None;
        }
        Err(e) => {
            debug!(sr_no = %row.sr_no, error = %e, "skipping row");
            return None;
        }
    };

    let mut classified = BomRules.classify(&row.particulars);
    if !row.cheque_reference_no.is_empty() {
        classified.txn_ref = row.cheque_reference_no;
    }

    Some(Transaction::new(
        format_table_date(&row.date),
        polarity,
        classified,
        row.particulars,
    ))
}

/// Clean raw BOM table rows (header included) into output records.
pub fn clean_bom_rows(rows: &[Vec<String>]) -> Result<Cleaned> {
    let table = table_rows::<BomRow>(rows)?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrCr;
    use rust_decimal::Decimal;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn header(prefix: &[&str]) -> Vec<String> {
        let mut cells = row(prefix);
        cells.extend(row(&[
            "Sr No",
            "Date",
            "Particulars",
            "Cheque/Reference No",
            "Debit",
            "Credit",
            "Balance",
            "Channel",
        ]));
        cells
    }

    #[test]
    fn test_row_from_short_cells() {
        let r = BomRow::from_cells(row(&["1", "01/04/2024"]));
        assert_eq!(r.date, "01/04/2024");
        assert_eq!(r.channel, "");
    }

    #[test]
    fn test_classify_imps_payer() {
        let c = BomRules.classify("IMPS / 412312345678 / P2A / 9988 / RAVI KUMAR / HDFC");
        assert_eq!(c.txn_type, "IMPS");
        assert_eq!(c.txn_ref, "412312345678");
        assert_eq!(c.payer, "RAVI KUMAR");
    }

    #[test]
    fn test_classify_neft_mah_payer() {
        let c = BomRules.classify("NEFT N09612345 ACME TRADERS MAHB0000123");
        assert_eq!(c.txn_type, "NEFT");
        assert_eq!(c.payer, "ACME TRADERS");
    }

    #[test]
    fn test_classify_unknown_shape() {
        let c = BomRules.classify("Chq Clg 45");
        assert_eq!(c.txn_type, "CHQ ");
        assert_eq!(c.txn_ref, "");
        assert_eq!(c.payer, "");
    }

    #[test]
    fn test_clean_rows() {
        let rows = vec![
            row(&["page", "table", "row", "col_1"]),
            row(&["1", "1", "1", "ACCOUNT STATEMENT"]),
            header(&["1", "1", "2"]),
            row(&["1", "1", "3", "1", "01/04/2024", "NEFT N0961 ACME MAH001", "N0961", "-", "2,500.00", "12,500.00", "BRANCH"]),
            row(&["1", "1", "4", "2", "2024-04-02", "ATM CASH", "", "500.00", "-", "12,000.00", "ATM"]),
            header(&["2", "1", "1"]),
            row(&["2", "1", "2", "", "", "", "", "", "", "", ""]),
            row(&["2", "1", "3", "3", "03/04/2024", "B/F", "", "", "", "12,000.00", ""]),
            row(&["2", "1", "4", "4", "04/04/2024", "FEE", "", "abc", "", "", ""]),
        ];

        let cleaned = clean_bom_rows(&rows).unwrap();
        assert_eq!(cleaned.transactions.len(), 2);
        assert_eq!(cleaned.skipped, 3);

        let neft = &cleaned.transactions[0];
        assert_eq!(neft.txn_date, "01-04-2024");
        assert_eq!(neft.dr_cr_flag, Some(DrCr::Credit));
        assert_eq!(neft.amount, Some(Decimal::new(250000, 2)));
        assert_eq!(neft.txn_type, "NEFT");
        assert_eq!(neft.txn_ref, "N0961");
        assert_eq!(neft.payer, "ACME");

        let atm = &cleaned.transactions[1];
        assert_eq!(atm.txn_date, "2024-04-02");
        assert_eq!(atm.dr_cr_flag, Some(DrCr::Debit));
        assert_eq!(atm.txn_type, "ATM ");
    }
}
