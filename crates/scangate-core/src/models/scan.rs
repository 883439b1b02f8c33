//! Scan verdicts.

use serde::{Deserialize, Serialize};

/// Outcome of virus-scanning one uploaded file. Exactly one verdict is
/// produced per accepted upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanVerdict {
    Clean,
    /// Detection details, e.g. the signature name reported by the engine.
    VirusFound(String),
}

impl ScanVerdict {
    pub fn is_clean(&self) -> bool {
        matches!(self, ScanVerdict::Clean)
    }
}
