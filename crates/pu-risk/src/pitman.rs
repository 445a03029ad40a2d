//! Pitman two-parameter maximum-likelihood estimator.
//!
//! Estimates the parameters `(theta, alpha)` of the Pitman sampling model
//! by zeroing the partial log-likelihood derivatives (Hoshino, 2001), then
//! converts the fit into a population-uniqueness estimate. The gamma-ratio
//! in the conversion is evaluated in the log domain; the direct ratio
//! overflows for realistic parameter magnitudes.

use nalgebra::DMatrix;
use pu_core::{
    ClassHistogram, ModelKind, ModelOutcome, PopulationModel, SampleStatistics, UndefinedCause,
};
use statrs::function::gamma::ln_gamma;

use crate::newton::{NewtonConfig, NewtonSolver, ScoreSystem};

/// Pitman population model over a sample histogram.
pub struct PitmanModel<'a> {
    histogram: &'a ClassHistogram,
    stats: SampleStatistics,
    newton: NewtonConfig,
}

impl<'a> PitmanModel<'a> {
    /// Create a model with the default solver configuration.
    pub fn new(histogram: &'a ClassHistogram, stats: SampleStatistics) -> Self {
        Self::with_solver(histogram, stats, NewtonConfig::default())
    }

    /// Create a model with an explicit solver configuration.
    pub fn with_solver(
        histogram: &'a ClassHistogram,
        stats: SampleStatistics,
        newton: NewtonConfig,
    ) -> Self {
        Self { histogram, stats, newton }
    }

    /// Closed-form starting point for the solver.
    ///
    /// Requires size-2 classes; without them the derivation divides by
    /// zero and the model is undefined.
    pub fn initial_guess(&self) -> Result<[f64; 2], UndefinedCause> {
        if self.histogram.c2() == 0 {
            return Err(UndefinedCause::NoSizeTwoClasses);
        }

        let c1 = self.histogram.c1() as f64;
        let c2 = self.histogram.c2() as f64;
        let n = self.stats.n() as f64;
        let u = self.stats.u() as f64;

        let c = c1 * (c1 - 1.0) / c2;
        let theta =
            (n * u * c - c1 * (n - 1.0) * (2.0 * u + c)) / (2.0 * c1 * u + c1 * c - n * c);
        let alpha = (theta * (c1 - n) + (n - 1.0) * c1) / (n * u);

        if theta.is_finite() && alpha.is_finite() {
            Ok([theta, alpha])
        } else {
            Err(UndefinedCause::DegenerateInitialGuess)
        }
    }

    /// Convert a fitted `(theta, alpha)` into a uniqueness risk.
    ///
    /// Total uniqueness is `Γ(theta+1)/Γ(theta+alpha) · N^alpha`, evaluated
    /// as `exp(lnΓ(theta+1) − lnΓ(theta+alpha))`; the risk divides by `N`.
    /// `alpha = 0` leaves the total undefined.
    fn risk_from_parameters(&self, theta: f64, alpha: f64) -> ModelOutcome {
        if alpha == 0.0 {
            return ModelOutcome::Undefined(UndefinedCause::ZeroAlpha);
        }
        let population = self.stats.population();
        let total =
            (ln_gamma(theta + 1.0) - ln_gamma(theta + alpha)).exp() * population.powf(alpha);
        ModelOutcome::from_value(total / population)
    }
}

impl PopulationModel for PitmanModel<'_> {
    fn kind(&self) -> ModelKind {
        ModelKind::Pitman
    }

    fn uniqueness_risk(&self) -> ModelOutcome {
        let guess = match self.initial_guess() {
            Ok(guess) => guess,
            Err(cause) => return ModelOutcome::Undefined(cause),
        };

        let score = PitmanScore {
            histogram: self.histogram,
            n: self.stats.n(),
            u: self.stats.u(),
        };
        match NewtonSolver::new(self.newton).solve(&score, &guess) {
            Ok(solution) => self.risk_from_parameters(solution.parameters[0], solution.parameters[1]),
            Err(err) => ModelOutcome::Undefined(err.into()),
        }
    }
}

/// Score equations and Jacobian of the Pitman log-likelihood.
struct PitmanScore<'a> {
    histogram: &'a ClassHistogram,
    n: u64,
    u: u64,
}

impl ScoreSystem for PitmanScore<'_> {
    fn dim(&self) -> usize {
        2
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let (theta, alpha) = (x[0], x[1]);

        // dL/dtheta
        let mut class_terms = 0.0;
        for i in 1..self.u {
            class_terms += 1.0 / (theta + i as f64 * alpha);
        }
        let mut record_terms = 0.0;
        for i in 1..self.n {
            record_terms += 1.0 / (theta + i as f64);
        }
        let score_theta = class_terms - record_terms;

        // dL/dalpha
        let mut weighted_class_terms = 0.0;
        for i in 1..self.u {
            weighted_class_terms += i as f64 / (theta + i as f64 * alpha);
        }
        let mut discount_terms = 0.0;
        for (size, freq) in self.histogram.iter() {
            if size != 1 {
                let mut inner = 0.0;
                for j in 1..size {
                    inner += 1.0 / (j as f64 - alpha);
                }
                discount_terms += freq as f64 * inner;
            }
        }
        let score_alpha = weighted_class_terms - discount_terms;

        vec![score_theta, score_alpha]
    }

    fn jacobian(&self, x: &[f64]) -> DMatrix<f64> {
        let (theta, alpha) = (x[0], x[1]);

        // d²L/dtheta²
        let mut size_terms = 0.0;
        for (size, freq) in self.histogram.iter() {
            let denom = theta + size as f64;
            size_terms += freq as f64 / (denom * denom);
        }
        let mut class_terms = 0.0;
        for i in 1..self.u {
            let denom = theta + i as f64 * alpha;
            class_terms += 1.0 / (denom * denom);
        }
        let d_theta_theta = size_terms - class_terms;

        // d²L/dalpha²
        let mut weighted_class_terms = 0.0;
        for i in 1..self.u {
            let denom = theta + i as f64 * alpha;
            weighted_class_terms += (i * i) as f64 / (denom * denom);
        }
        let mut discount_terms = 0.0;
        for (size, freq) in self.histogram.iter() {
            if size != 1 {
                let mut inner = 0.0;
                for j in 1..size {
                    let denom = j as f64 - alpha;
                    inner += 1.0 / (denom * denom);
                }
                discount_terms += freq as f64 * inner;
            }
        }
        let d_alpha_alpha = -weighted_class_terms - discount_terms;

        // d²L/dtheta dalpha (symmetric)
        let mut mixed = 0.0;
        for i in 1..self.u {
            let denom = theta + i as f64 * alpha;
            mixed += i as f64 / (denom * denom);
        }
        let d_theta_alpha = -mixed;

        DMatrix::from_row_slice(
            2,
            2,
            &[d_theta_theta, d_theta_alpha, d_theta_alpha, d_alpha_alpha],
        )
    }
}
