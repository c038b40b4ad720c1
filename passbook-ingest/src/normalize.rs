//! Canonical formatting of dates, amounts and table cells.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::patterns::{DATE_SEPARATOR, HEADER_CELL_JUNK};

/// Table date layouts, tried in order. The flag marks a year-first layout.
const TABLE_DATE_FORMATS: &[(&str, bool)] = &[
    ("%d/%m/%Y", false),
    ("%d-%m-%Y", false),
    ("%Y-%m-%d", true),
    ("%Y/%m/%d", true),
    ("%d/%m/%y", false),
    ("%Y.%m.%d", true),
    ("%d.%m.%Y", false),
];

/// Two fixed decimal places, half-even rounding.
pub fn format_amount(value: Decimal) -> String {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded.to_string()
}

/// Parse an amount cell or token, ignoring thousands separators.
///
/// Returns `None` for empty and non-numeric text.
pub fn parse_amount(text: &str) -> Option<Decimal> {
    let cleaned = text.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// BOB `dd-mm-yy` to `dd-mm-yyyy`; anything else passes through trimmed.
pub fn format_bob_date(date: &str) -> String {
    let text = date.trim();
    match NaiveDate::parse_from_str(text, "%d-%m-%y") {
        Ok(parsed) => pivot_short_year(parsed).format("%d-%m-%Y").to_string(),
        Err(_) => text.to_string(),
    }
}

// chrono pivots `%y` at 70; statements pivot at 69, so `69` is 1969.
fn pivot_short_year(date: NaiveDate) -> NaiveDate {
    if date.year() >= 2069 {
        date.with_year(date.year() - 100).unwrap_or(date)
    } else {
        date
    }
}

/// Table dates: `yyyy-mm-dd` when the source leads with a four digit year,
/// `dd-mm-yyyy` otherwise. Unparsable text passes through trimmed.
pub fn format_table_date(date: &str) -> String {
    let text = date.trim();
    if text.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = DATE_SEPARATOR.split(text).collect();
    let first_is_year = parts
        .first()
        .is_some_and(|p| p.len() == 4 && p.chars().all(|c| c.is_ascii_digit()));

    let parsed = TABLE_DATE_FORMATS.iter().find_map(|(fmt, year_first)| {
        if !year_width_matches(&parts, fmt, *year_first) {
            return None;
        }
        NaiveDate::parse_from_str(text, fmt).ok()
    });

    match parsed {
        Some(d) if first_is_year => d.format("%Y-%m-%d").to_string(),
        Some(d) => d.format("%d-%m-%Y").to_string(),
        None => text.to_string(),
    }
}

// chrono's %Y accepts short years; the table layouts only allow four digits there.
fn year_width_matches(parts: &[&str], fmt: &str, year_first: bool) -> bool {
    let year = if year_first { parts.first() } else { parts.get(2) };
    let want = if fmt.contains("%Y") { 4 } else { 2 };
    year.is_some_and(|y| y.len() == want)
}

/// Trim, collapse inner whitespace, and read a lone `-` as empty.
pub fn clean_cell(value: &str) -> String {
    let text = value.trim();
    if text == "-" {
        return String::new();
    }
    collapse_whitespace(text)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase and drop everything but ASCII letters and digits.
pub fn normalize_header_cell(text: &str) -> String {
    HEADER_CELL_JUNK.replace_all(&text.to_lowercase(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount_two_places() {
        assert_eq!(format_amount(Decimal::new(500, 0)), "500.00");
        assert_eq!(format_amount(Decimal::new(12345, 3)), "12.34");
        assert_eq!(format_amount(Decimal::new(5, 1)), "0.50");
    }

    #[test]
    fn test_parse_amount_strips_commas() {
        assert_eq!(parse_amount("1,25,000.50"), Some(Decimal::new(12500050, 2)));
        assert_eq!(parse_amount("  "), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_bob_date() {
        assert_eq!(format_bob_date("05-04-24"), "05-04-2024");
        assert_eq!(format_bob_date(" 31-12-99 "), "31-12-1999");
        assert_eq!(format_bob_date("01-01-69"), "01-01-1969");
        assert_eq!(format_bob_date("31-12-68"), "31-12-2068");
        assert_eq!(format_bob_date("32-01-24"), "32-01-24");
        assert_eq!(format_bob_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_table_date_year_first() {
        assert_eq!(format_table_date("2024-04-05"), "2024-04-05");
        assert_eq!(format_table_date("2024/04/05"), "2024-04-05");
        assert_eq!(format_table_date("2024.04.05"), "2024-04-05");
    }

    #[test]
    fn test_table_date_day_first() {
        assert_eq!(format_table_date("05/04/2024"), "05-04-2024");
        assert_eq!(format_table_date("05.04.2024"), "05-04-2024");
        assert_eq!(format_table_date("05/04/24"), "05-04-2024");
    }

    #[test]
    fn test_table_date_passthrough() {
        assert_eq!(format_table_date("05-04-24"), "05-04-24");
        assert_eq!(format_table_date("Opening Balance"), "Opening Balance");
        assert_eq!(format_table_date("   "), "");
    }

    #[test]
    fn test_clean_cell() {
        assert_eq!(clean_cell(" - "), "");
        assert_eq!(clean_cell("  NEFT   ACME\nCORP "), "NEFT ACME CORP");
    }

    #[test]
    fn test_normalize_header_cell() {
        assert_eq!(normalize_header_cell("Cheque/Reference No."), "chequereferenceno");
        assert_eq!(normalize_header_cell("Sr No"), "srno");
    }
}
