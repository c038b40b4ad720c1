//! Narration classification: payment rail, reference and payer.
//!
//! Each bank writes narrations in its own micro-grammar, so every bank
//! supplies its own [`NarrationRules`]; only the interface and a few
//! string helpers are shared.

use crate::normalize::collapse_whitespace;
use crate::patterns::{DIGIT_RUN, NEFT_MAH_PAYER, RTGS_MAH_PAYER, SLASH_SPACING};
use crate::parsers::{BobRules, BomRules, PnbRules};
use crate::types::{Bank, Classified};

/// A bank's rule table for turning narration text into structured fields.
///
/// Every rule degrades to an empty string when its shape does not match.
pub trait NarrationRules {
    fn txn_type(&self, narration: &str) -> String;

    fn txn_ref(&self, narration: &str, txn_type: &str) -> String;

    fn payer(&self, narration: &str, txn_type: &str, txn_ref: &str) -> String;

    fn classify(&self, narration: &str) -> Classified {
        let txn_type = self.txn_type(narration);
        let txn_ref = self.txn_ref(narration, &txn_type);
        let payer = self.payer(narration, &txn_type, &txn_ref);
        Classified { txn_type, txn_ref, payer }
    }
}

impl Bank {
    /// Classify a narration with this bank's rules.
    pub fn classify(self, narration: &str) -> Classified {
        match self {
            Bank::Bob => BobRules.classify(narration),
            Bank::Bom => BomRules.classify(narration),
            Bank::Pnb => PnbRules.classify(narration),
        }
    }
}

/// Rail code for the first marker found in an upper-cased narration.
pub fn rail_marker(upper: &str) -> Option<&'static str> {
    if upper.contains("IMPS/") {
        Some("IMPS")
    } else if upper.contains("UPI/") {
        Some("UPI")
    } else if upper.contains("NEFT") {
        Some("NEFT")
    } else if upper.contains("RTGS") {
        Some("RTGS")
    } else {
        None
    }
}

/// First four characters of the trimmed narration, upper-cased.
pub fn leading_code(narration: &str) -> String {
    narration.trim().chars().take(4).collect::<String>().to_uppercase()
}

/// The first standalone run of six or more digits.
pub fn digit_run(narration: &str) -> Option<String> {
    DIGIT_RUN.find(narration).map(|m| m.as_str().to_string())
}

/// Zero-based slash field after collapsing whitespace around slashes.
pub fn slash_field(narration: &str, index: usize) -> Option<String> {
    let compact = collapse_whitespace(narration);
    let normalized = SLASH_SPACING.replace_all(&compact, "/");
    normalized
        .split('/')
        .nth(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// `<RAIL> <ref> <payer> MAH...` for NEFT and RTGS narrations.
pub fn mah_payer(narration: &str, rail: &str) -> Option<String> {
    let re = match rail {
        "NEFT" => &*NEFT_MAH_PAYER,
        "RTGS" => &*RTGS_MAH_PAYER,
        _ => return None,
    };
    let normalized = collapse_whitespace(narration);
    re.captures(&normalized)
        .map(|caps| caps[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Text after the reference inside the narration, leading separators removed.
pub fn text_after(narration: &str, needle: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let compact = collapse_whitespace(narration);
    // ASCII upper-casing keeps byte offsets valid for slicing `compact`.
    let idx = compact
        .to_ascii_uppercase()
        .find(&needle.to_ascii_uppercase())?;
    let after = compact[idx + needle.len()..]
        .trim_start_matches([' ', '-', '/', ':'])
        .trim();
    Some(after.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rail_marker_priority() {
        assert_eq!(rail_marker("IMPS/P2A/123/UPI/X"), Some("IMPS"));
        assert_eq!(rail_marker("UPI/123/NEFT"), Some("UPI"));
        assert_eq!(rail_marker("BY NEFT RTGS"), Some("NEFT"));
        assert_eq!(rail_marker("RTGS-HDFC"), Some("RTGS"));
        assert_eq!(rail_marker("CASH DEPOSIT"), None);
    }

    #[test]
    fn test_leading_code() {
        assert_eq!(leading_code("  chq paid to x"), "CHQ ");
        assert_eq!(leading_code("ab"), "AB");
        assert_eq!(leading_code(""), "");
    }

    #[test]
    fn test_slash_field_normalizes_spacing() {
        let text = "UPI / 123456789012 /John  Doe/ paytm /Grocery";
        assert_eq!(slash_field(text, 1).as_deref(), Some("123456789012"));
        assert_eq!(slash_field(text, 4).as_deref(), Some("Grocery"));
        assert_eq!(slash_field(text, 5), None);
    }

    #[test]
    fn test_mah_payer() {
        let text = "NEFT  N123456 ACME   TRADERS MAHB0000123";
        assert_eq!(mah_payer(text, "NEFT").as_deref(), Some("ACME TRADERS"));
        assert_eq!(mah_payer(text, "RTGS"), None);
        assert_eq!(mah_payer(text, "IMPS"), None);
    }

    #[test]
    fn test_text_after_is_case_insensitive() {
        assert_eq!(
            text_after("neft-ref998/ ACME CORP", "REF998").as_deref(),
            Some("ACME CORP")
        );
        assert_eq!(text_after("nothing here", "REF998"), None);
        assert_eq!(text_after("anything", ""), None);
    }

    #[test]
    fn test_bank_dispatch_uses_own_grammar() {
        let text = "NEFT:SBIN412345678:ACME CORP";
        assert_eq!(Bank::Pnb.classify(text).txn_ref, "SBIN412345678");
        assert_eq!(Bank::Bom.classify(text).txn_ref, "");
    }

    #[test]
    fn test_digit_run() {
        assert_eq!(digit_run("CHQ NO 00123456 CLEARED").as_deref(), Some("00123456"));
        assert_eq!(digit_run("ATM 12345"), None);
    }
}
