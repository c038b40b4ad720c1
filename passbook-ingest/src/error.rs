use std::path::PathBuf;

use thiserror::Error;

use crate::types::Bank;

/// Failures that abort a whole run. Row-level problems never surface here.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("{bank} header row not found in CSV; cannot clean file")]
    HeaderNotFound { bank: Bank },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;

/// A populated amount cell that is not a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed amount {0:?}")]
pub struct MalformedAmount(pub String);
