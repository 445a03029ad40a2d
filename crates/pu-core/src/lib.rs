//! # pu-core
//!
//! Shared building blocks for population-uniqueness risk estimation:
//! - the equivalence-class histogram and the sample statistics derived
//!   from it
//! - typed model outcomes (the replacement for NaN-sentinel signalling)
//! - the `PopulationModel` capability trait implemented by the estimators
//!
//! ## Architecture
//!
//! Estimator crates depend on the data model and traits defined here, not
//! on each other. The histogram is immutable for the lifetime of an
//! estimation run; everything downstream is a pure function of it.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Error types.
pub mod error;
/// Equivalence-class histogram and derived sample statistics.
pub mod histogram;
/// The model capability trait.
pub mod traits;
/// Typed model outcomes and the public estimate type.
pub mod types;

pub use error::{Error, Result};
pub use histogram::{ClassHistogram, SampleStatistics};
pub use traits::PopulationModel;
pub use types::{ModelKind, ModelOutcome, RiskEstimate, UndefinedCause};
