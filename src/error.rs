use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by parsing and clustering.
///
/// Every variant ends the current run: nothing is retried internally and
/// no partial centroid list is returned.
#[derive(Debug, Error)]
pub enum KMeansError {
    /// A run parameter failed the precondition check (k, n, d or the
    /// iteration cap out of range).
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// An input row had the wrong number of fields or a non-numeric
    /// token. `row` is 1-based.
    #[error("malformed input at row {row}: {reason}")]
    MalformedInput { row: usize, reason: String },

    /// Arithmetic between vectors of unequal component counts.
    #[error("dimension mismatch in {op}: {left} vs {right}")]
    DimensionMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    /// A cluster lost all members during an update step. This signals a
    /// degenerate initialization (duplicate seed points, for example),
    /// not a transient condition worth retrying.
    #[error("cluster {cluster} has no members at iteration {iteration}")]
    EmptyCluster { cluster: usize, iteration: usize },

    /// The input file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, KMeansError>;
