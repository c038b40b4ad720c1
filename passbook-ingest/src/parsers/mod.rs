//! Bank-specific statement parsers.

pub mod bob;
pub mod bom;
pub mod pnb;

pub use bob::{BobRules, clean_bob_text};
pub use bom::{BomRules, clean_bom_rows};
pub use pnb::{PnbRules, clean_pnb_rows};
