mod bins;
mod hits;
mod loci;
mod markers;
mod profile;
mod repeats;
mod sizes;

pub mod report;
pub mod workflow;

pub use bins::{BinCall, BinTable};
pub use hits::{AlignmentHit, HitStore};
pub use loci::{LocusDef, LocusKind, MARKER_LOCI, MAX_AMPLICON_LEN, SENTINEL, VNTR_LOCI};
pub use profile::LocusCall;
pub use workflow::{analyze_isolate, IsolateInput, IsolateReport};

use std::fmt;

/// Isolate-scoped typing failure. The batch driver reports these per isolate
/// and keeps processing the remaining isolates.
#[derive(Debug, Clone, PartialEq)]
pub enum TypingError {
    /// A locus requiring both primers has no contig carrying hits to both.
    MissingPrimerData { locus: &'static str },
    /// A hit report row could not be parsed.
    InvalidHitRecord { line: usize, reason: String },
    Io(String),
}

impl fmt::Display for TypingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypingError::MissingPrimerData { locus } => {
                write!(f, "Primer pair incomplete for {}: no contig carries both primers", locus)
            }
            TypingError::InvalidHitRecord { line, reason } => {
                write!(f, "Invalid hit record at line {}: {}", line, reason)
            }
            TypingError::Io(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<TypingError> for String {
    fn from(err: TypingError) -> Self {
        err.to_string()
    }
}
