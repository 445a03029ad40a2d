//! Typed model outcomes and the public estimate type.
//!
//! Population models signal "inapplicable for this data" as a first-class
//! outcome rather than a NaN sentinel, so the selector's fallback chain is
//! checked by the compiler. The float-with-NaN surface survives only in
//! the convenience wrapper at the crate boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The population model that produced an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Pitman two-parameter sampling model (maximum likelihood).
    Pitman,
    /// Zayatz conditional-uniqueness model.
    Zayatz,
    /// Chen–McNulty shifted-negative-binomial model.
    Snb,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelKind::Pitman => write!(f, "Pitman"),
            ModelKind::Zayatz => write!(f, "Zayatz"),
            ModelKind::Snb => write!(f, "SNB"),
        }
    }
}

/// Why a model could not produce a value for the given data.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndefinedCause {
    /// No size-2 equivalence classes, so the Pitman initial guess cannot
    /// be derived.
    #[error("no equivalence classes of size two in the sample")]
    NoSizeTwoClasses,

    /// The closed-form initial guess evaluated to a non-finite value.
    #[error("initial parameter guess is degenerate")]
    DegenerateInitialGuess,

    /// The root search hit its iteration bound.
    #[error("root search did not converge")]
    NonConvergence,

    /// The linear solve was ill-posed at some iterate.
    #[error("singular Jacobian during root search")]
    SingularJacobian,

    /// The fitted Pitman discount parameter is exactly zero.
    #[error("estimated discount parameter is zero")]
    ZeroAlpha,

    /// The fitted parameters left the model's domain.
    #[error("estimated parameters left the model domain")]
    OutOfDomain,

    /// The model formula evaluated to a non-finite value.
    #[error("model formula produced a non-finite value")]
    NonFinite,

    /// The histogram contains no classes.
    #[error("the histogram is empty")]
    EmptyHistogram,
}

/// Outcome of evaluating one population model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModelOutcome {
    /// The model produced a risk estimate.
    Risk(f64),
    /// The model is undefined for the given data.
    Undefined(UndefinedCause),
}

impl ModelOutcome {
    /// The risk value, if the model was defined.
    pub fn risk(&self) -> Option<f64> {
        match self {
            ModelOutcome::Risk(risk) => Some(*risk),
            ModelOutcome::Undefined(_) => None,
        }
    }

    /// True if the model produced a value.
    pub fn is_defined(&self) -> bool {
        matches!(self, ModelOutcome::Risk(_))
    }

    /// The risk value, or NaN when undefined.
    pub fn value(&self) -> f64 {
        self.risk().unwrap_or(f64::NAN)
    }

    /// Wrap a computed value, demoting non-finite results to `Undefined`.
    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            ModelOutcome::Risk(value)
        } else {
            ModelOutcome::Undefined(UndefinedCause::NonFinite)
        }
    }
}

/// Result of a full population-uniqueness estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RiskEstimate {
    /// A risk estimate, together with the model that produced it.
    Estimate {
        /// Estimated population-uniqueness risk.
        risk: f64,
        /// The model the selector settled on.
        model: ModelKind,
    },
    /// Every applicable model (including fallbacks) was undefined.
    Undefined,
}

impl RiskEstimate {
    /// The risk value, if defined.
    pub fn risk(&self) -> Option<f64> {
        match self {
            RiskEstimate::Estimate { risk, .. } => Some(*risk),
            RiskEstimate::Undefined => None,
        }
    }

    /// The model that produced the estimate, if defined.
    pub fn model(&self) -> Option<ModelKind> {
        match self {
            RiskEstimate::Estimate { model, .. } => Some(*model),
            RiskEstimate::Undefined => None,
        }
    }

    /// True if any model produced a value.
    pub fn is_defined(&self) -> bool {
        matches!(self, RiskEstimate::Estimate { .. })
    }

    /// The risk value, or NaN when undefined.
    pub fn value(&self) -> f64 {
        self.risk().unwrap_or(f64::NAN)
    }
}
