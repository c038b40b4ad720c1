//! passbook-ingest: bank statement extracts to normalized transaction CSV.
//!
//! Supports Bank of Baroda page text and Bank of Maharashtra / Punjab
//! National Bank table extracts. Each bank brings its own row layout and
//! narration grammar; all of them emit the same [`Transaction`] record.

pub mod error;
pub mod narration;
pub mod normalize;
pub mod parsers;
pub mod patterns;
pub mod pipeline;
pub mod polarity;
pub mod tabular;
pub mod types;
pub mod writer;

pub use error::{IngestError, Result};
pub use narration::NarrationRules;
pub use pipeline::{clean_content, clean_statement};
pub use types::{Bank, Classified, CleanReport, Cleaned, DrCr, IngestOptions, InputKind, Polarity, Transaction};
pub use writer::OUTPUT_HEADERS;
