//! Error types for population-uniqueness estimation

use thiserror::Error;

/// Top-level error type.
///
/// Recoverable numerical conditions (a model being undefined for the given
/// data) are *not* errors; they are [`crate::types::ModelOutcome`] values and
/// drive the selector's fallback chain. Only precondition violations and
/// malformed input surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input (e.g. an equivalence class of size zero).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The sample contains no unique equivalence classes, so population
    /// uniqueness cannot be estimated at all.
    #[error("the sample contains no unique equivalence classes")]
    NoSampleUniques,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
