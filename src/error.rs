//! Error types for the benchmark harness.

use std::io;

use thiserror::Error;

use crate::harness::RunState;

/// Result type for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that abort a benchmark run.
///
/// Every variant is fatal: the harness never retries and never reports a
/// partial run.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A registered definition is unusable (empty name or zero iterations).
    #[error("invalid test definition #{index} ({name:?}): {reason}")]
    InvalidDefinition {
        index: usize,
        name: String,
        reason: &'static str,
    },

    /// A fallible workload returned an error.
    #[error("workload {name:?} failed: {source}")]
    Workload {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The toolchain the harness was built with is older than required.
    #[error("this harness requires rustc {required} or newer (built with {found})")]
    Precondition { required: String, found: String },

    /// `run` or `report` called in the wrong lifecycle state.
    #[error("harness is {found:?}, expected {expected}")]
    InvalidState {
        expected: &'static str,
        found: RunState,
    },

    /// Writing the report to its sink failed.
    #[error("report output failed: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization of the report failed.
    #[error("report serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
