//! CSV output with the fixed seven-column header.

use std::fs;
use std::path::Path;

use crate::error::{IngestError, Result};
use crate::types::Transaction;

pub const OUTPUT_HEADERS: [&str; 7] = [
    "txn_date",
    "amount",
    "dr_cr_flag",
    "txn_type",
    "txn_ref",
    "payer",
    "description",
];

/// Serialize records, in order, under the output header.
pub fn to_csv_bytes(transactions: &[Transaction]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(OUTPUT_HEADERS)?;
    for txn in transactions {
        wtr.serialize(txn)?;
    }
    wtr.into_inner().map_err(|e| IngestError::Io(e.into_error()))
}

/// Write the whole file at once; nothing is flushed until every row is rendered.
pub fn write_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    let bytes = to_csv_bytes(transactions)?;
    fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Classified, DrCr, Polarity};
    use rust_decimal::Decimal;

    #[test]
    fn test_header_only_when_empty() {
        let bytes = to_csv_bytes(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "txn_date,amount,dr_cr_flag,txn_type,txn_ref,payer,description\n"
        );
    }

    #[test]
    fn test_row_rendering() {
        let txn = Transaction::new(
            "02-04-2024".to_string(),
            Polarity { flag: DrCr::Debit, amount: Decimal::new(15, 1) },
            Classified { txn_type: "UPI".into(), txn_ref: "1234567".into(), payer: "A, B".into() },
            "UPI/1234567/x".to_string(),
        );
        let text = String::from_utf8(to_csv_bytes(&[txn]).unwrap()).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "02-04-2024,1.50,D,UPI,1234567,\"A, B\",UPI/1234567/x");
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let txn = Transaction {
            txn_date: "x".into(),
            amount: None,
            dr_cr_flag: None,
            txn_type: String::new(),
            txn_ref: String::new(),
            payer: String::new(),
            description: String::new(),
        };
        let text = String::from_utf8(to_csv_bytes(&[txn]).unwrap()).unwrap();
        assert_eq!(text.lines().nth(1), Some("x,,,,,,"));
    }
}
