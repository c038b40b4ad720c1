//! Debit/credit resolution.

use rust_decimal::Decimal;

use crate::error::MalformedAmount;
use crate::normalize::parse_amount;
use crate::types::{DrCr, Polarity};

/// Closing balance of the previous statement entry, carried across a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunningBalance {
    previous: Option<Decimal>,
}

impl RunningBalance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn previous(&self) -> Option<Decimal> {
        self.previous
    }

    /// Resolve one free-text entry and remember its balance.
    ///
    /// The balance is recorded even when nothing could be resolved, so a
    /// dropped entry still moves the reference point for the next one.
    pub fn resolve(&mut self, balance: Decimal, amounts: &[Decimal]) -> Option<Polarity> {
        // An unrepresentable delta is no evidence; the amount tokens decide.
        let from_delta = self
            .previous
            .and_then(|prev| balance.checked_sub(prev))
            .and_then(from_delta);
        self.previous = Some(balance);
        from_delta.or_else(|| from_amount_tokens(amounts))
    }
}

fn from_delta(delta: Decimal) -> Option<Polarity> {
    if delta > Decimal::ZERO {
        Some(Polarity { flag: DrCr::Credit, amount: delta })
    } else if delta < Decimal::ZERO {
        Some(Polarity { flag: DrCr::Debit, amount: -delta })
    } else {
        None
    }
}

/// Trailing amount tokens of a free-text entry, used when the balance says nothing.
///
/// Two or more tokens read as `[debit, credit, ..]`; a single token is a credit.
pub fn from_amount_tokens(amounts: &[Decimal]) -> Option<Polarity> {
    match amounts {
        [debit, credit, ..] => {
            if !debit.is_zero() {
                Some(Polarity { flag: DrCr::Debit, amount: debit.abs() })
            } else if !credit.is_zero() {
                Some(Polarity { flag: DrCr::Credit, amount: credit.abs() })
            } else {
                None
            }
        }
        [single] if !single.is_zero() => Some(Polarity { flag: DrCr::Credit, amount: single.abs() }),
        _ => None,
    }
}

/// Separate debit and credit columns; the debit column wins when both are set.
///
/// A cell counts as populated only when it holds a nonzero amount.
pub fn from_columns(debit: &str, credit: &str) -> Result<Option<Polarity>, MalformedAmount> {
    if let Some(amount) = column_amount(debit)? {
        return Ok(Some(Polarity { flag: DrCr::Debit, amount }));
    }
    if let Some(amount) = column_amount(credit)? {
        return Ok(Some(Polarity { flag: DrCr::Credit, amount }));
    }
    Ok(None)
}

fn column_amount(cell: &str) -> Result<Option<Decimal>, MalformedAmount> {
    if cell.trim().is_empty() {
        return Ok(None);
    }
    let value = parse_amount(cell).ok_or_else(|| MalformedAmount(cell.to_string()))?;
    Ok(Some(value.abs()).filter(|v| !v.is_zero()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_balance_deltas() {
        let mut running = RunningBalance::new();
        let flags: Vec<_> = ["100.00", "150.00", "120.00"]
            .iter()
            .map(|b| running.resolve(dec(b), &[]))
            .collect();

        assert_eq!(flags[0], None);
        assert_eq!(flags[1], Some(Polarity { flag: DrCr::Credit, amount: dec("50.00") }));
        assert_eq!(flags[2], Some(Polarity { flag: DrCr::Debit, amount: dec("30.00") }));
        assert_eq!(running.previous(), Some(dec("120.00")));
    }

    #[test]
    fn test_overflowing_delta_falls_back_to_tokens() {
        let mut running = RunningBalance::new();
        assert_eq!(running.resolve(-Decimal::MAX, &[]), None);

        let resolved = running.resolve(Decimal::MAX, &[dec("12.50")]);
        assert_eq!(resolved, Some(Polarity { flag: DrCr::Credit, amount: dec("12.50") }));
        assert_eq!(running.previous(), Some(Decimal::MAX));

        assert_eq!(RunningBalance::new().resolve(Decimal::MAX, &[]), None);
    }

    #[test]
    fn test_zero_delta_falls_back_to_tokens() {
        let mut running = RunningBalance::new();
        running.resolve(dec("10.00"), &[]);
        let p = running.resolve(dec("10.00"), &[dec("0.00"), dec("4.00")]);
        assert_eq!(p, Some(Polarity { flag: DrCr::Credit, amount: dec("4.00") }));
    }

    #[test]
    fn test_delta_beats_tokens() {
        let mut running = RunningBalance::new();
        running.resolve(dec("10.00"), &[]);
        let p = running.resolve(dec("7.00"), &[dec("99.00")]);
        assert_eq!(p, Some(Polarity { flag: DrCr::Debit, amount: dec("3.00") }));
    }

    #[test]
    fn test_balance_tracked_when_unresolved() {
        let mut running = RunningBalance::new();
        assert_eq!(running.resolve(dec("80.00"), &[]), None);
        assert_eq!(running.previous(), Some(dec("80.00")));
    }

    #[test]
    fn test_amount_tokens() {
        assert_eq!(
            from_amount_tokens(&[dec("12.00"), dec("0.00")]),
            Some(Polarity { flag: DrCr::Debit, amount: dec("12.00") })
        );
        assert_eq!(
            from_amount_tokens(&[dec("500.00")]),
            Some(Polarity { flag: DrCr::Credit, amount: dec("500.00") })
        );
        assert_eq!(from_amount_tokens(&[dec("0.00")]), None);
        assert_eq!(from_amount_tokens(&[]), None);
    }

    #[test]
    fn test_columns() {
        assert_eq!(
            from_columns("1,200.00", "").unwrap(),
            Some(Polarity { flag: DrCr::Debit, amount: dec("1200.00") })
        );
        assert_eq!(
            from_columns("0.00", "75.50").unwrap(),
            Some(Polarity { flag: DrCr::Credit, amount: dec("75.50") })
        );
        assert_eq!(from_columns("", "").unwrap(), None);
        assert_eq!(from_columns("n/a", ""), Err(MalformedAmount("n/a".to_string())));
    }
}
