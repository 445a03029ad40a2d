//! # pu-risk
//!
//! Population-uniqueness risk estimation for anonymized microdata.
//!
//! Given a sampling fraction and a histogram of equivalence-class sizes
//! observed in a sample, this crate estimates the fraction of the
//! *population* whose quasi-identifier combination is unique — a key input
//! to re-identification-risk assessment. The estimate comes from a small
//! family of population models (Pitman, Zayatz, SNB) arbitrated by a
//! selection procedure that falls back when a model is numerically
//! undefined for the data at hand.
//!
//! ## Architecture
//!
//! The Pitman and SNB models reduce to root-finding on a two-parameter
//! score system and share the generic Newton-Raphson solver in
//! [`newton`]. The selector in [`selector`] owns the decision procedure
//! and the public entry points.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Sample-level closed forms (average class risk, highest individual risk).
pub mod equivalence;
/// Generic multivariate Newton-Raphson root finder.
pub mod newton;
/// Pitman two-parameter maximum-likelihood estimator.
pub mod pitman;
/// Model selection, fallback chains and public entry points.
pub mod selector;
/// Chen–McNulty shifted-negative-binomial model.
pub mod snb;
/// Zayatz conditional-uniqueness model.
pub mod zayatz;

pub use equivalence::{equivalence_class_risk, highest_individual_risk, highest_risk_affected};
pub use newton::{NewtonConfig, NewtonSolution, NewtonSolver, ScoreSystem, SolveError};
pub use pitman::PitmanModel;
pub use selector::{population_uniques_risk, EstimatorConfig, PopulationUniquenessEstimator};
pub use snb::SnbModel;
pub use zayatz::ZayatzModel;

pub use pu_core::{
    ClassHistogram, Error, ModelKind, ModelOutcome, PopulationModel, Result, RiskEstimate,
    SampleStatistics, UndefinedCause,
};
