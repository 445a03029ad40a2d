//! Chen–McNulty shifted-negative-binomial (SNB) model.
//!
//! Models population equivalence-class sizes as a shifted negative
//! binomial with parameters `(eta, p)`. The number of population classes
//! comes from the Shlosser estimator; `(eta, p)` are then fitted so that
//! the expected numbers of sample singletons and doubletons under
//! binomial subsampling match the observed `c1` and `c2`. Both
//! expectations are derivatives of the shifted-NB probability generating
//! function `G(x) = x·(p / (1 − (1−p)x))^eta` evaluated at `1 − pi`.

use pu_core::{
    ClassHistogram, ModelKind, ModelOutcome, PopulationModel, SampleStatistics, UndefinedCause,
};

use crate::newton::{NewtonConfig, NewtonSolver, ScoreSystem};

/// SNB population model over a sample histogram.
pub struct SnbModel<'a> {
    histogram: &'a ClassHistogram,
    stats: SampleStatistics,
    newton: NewtonConfig,
}

impl<'a> SnbModel<'a> {
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

    /// Shlosser estimate of the number of non-empty population classes.
    pub fn population_class_count(&self) -> f64 {
        let pi = self.stats.pi();
        let mut unseen_weight = 0.0;
        let mut seen_weight = 0.0;
        for (size, freq) in self.histogram.iter() {
            let freq = freq as f64;
            let size_f = size as f64;
            unseen_weight += freq * (1.0 - pi).powf(size_f);
            seen_weight += freq * size_f * pi * (1.0 - pi).powf(size_f - 1.0);
        }
        self.stats.u() as f64 + self.histogram.c1() as f64 * unseen_weight / seen_weight
    }
}

impl PopulationModel for SnbModel<'_> {
    fn kind(&self) -> ModelKind {
        ModelKind::Snb
    }

    fn uniqueness_risk(&self) -> ModelOutcome {
        let class_count = self.population_class_count();
        if !class_count.is_finite() {
            return ModelOutcome::Undefined(UndefinedCause::DegenerateInitialGuess);
        }

        let score = SnbScore {
            class_count,
            pi: self.stats.pi(),
            c1: self.histogram.c1() as f64,
            c2: self.histogram.c2() as f64,
        };

        // Geometric start (eta = 1); p from matching the mean population
        // class size N / K.
        let p0 = (class_count / self.stats.population()).clamp(1e-6, 1.0 - 1e-6);
        let solution = match NewtonSolver::new(self.newton).solve(&score, &[1.0, p0]) {
            Ok(solution) => solution,
            Err(err) => return ModelOutcome::Undefined(err.into()),
        };

        let (eta, p) = (solution.parameters[0], solution.parameters[1]);
        if eta <= 0.0 || p <= 0.0 || p >= 1.0 {
            return ModelOutcome::Undefined(UndefinedCause::OutOfDomain);
        }

        let uniques_total = class_count * p.powf(eta);
        ModelOutcome::from_value(uniques_total / self.stats.population())
    }
}

/// Moment equations matching expected sample singletons and doubletons.
///
/// Uses the solver's default finite-difference Jacobian.
struct SnbScore {
    class_count: f64,
    pi: f64,
    c1: f64,
    c2: f64,
}

impl ScoreSystem for SnbScore {
    fn dim(&self) -> usize {
        2
    }

    fn value(&self, x: &[f64]) -> Vec<f64> {
        let (eta, p) = (x[0], x[1]);
        if eta <= 0.0 || p <= 0.0 || p >= 1.0 {
            // Outside the model domain; the solver treats the non-finite
            // score as an ill-posed system.
            return vec![f64::NAN, f64::NAN];
        }

        let q = 1.0 - self.pi;
        let s = 1.0 - (1.0 - p) * q;

        // G'(q) and G''(q) for G(x) = x · (p / (1 − (1−p)x))^eta
        let g1 = p.powf(eta) * (s.powf(-eta) + q * eta * (1.0 - p) * s.powf(-eta - 1.0));
        let g2 = p.powf(eta)
            * (2.0 * eta * (1.0 - p) * s.powf(-eta - 1.0)
                + q * eta * (eta + 1.0) * (1.0 - p) * (1.0 - p) * s.powf(-eta - 2.0));

        vec![
            self.class_count * self.pi * g1 - self.c1,
            0.5 * self.class_count * self.pi * self.pi * g2 - self.c2,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn histogram(counts: &[(u64, u64)]) -> ClassHistogram {
        ClassHistogram::from_counts(counts.iter().copied()).unwrap()
    }

    #[test]
    fn test_shlosser_count_full_sample() {
        // pi = 1 means nothing was unseen; the estimate collapses to u.
        let hist = histogram(&[(1, 30), (2, 15), (3, 8), (4, 4), (5, 2), (6, 1)]);
        let stats = SampleStatistics::new(1.0, &hist);
        let model = SnbModel::new(&hist, stats);
        assert_relative_eq!(model.population_class_count(), 60.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shlosser_count_half_sample() {
        let hist = histogram(&[(1, 30), (2, 15), (3, 8), (4, 4), (5, 2), (6, 1)]);
        let stats = SampleStatistics::new(0.5, &hist);
        let model = SnbModel::new(&hist, stats);
        assert_relative_eq!(model.population_class_count(), 82.38675958188153, max_relative = 1e-12);
    }

    #[test]
    fn test_converged_fit_risk() {
        let hist = histogram(&[(1, 30), (2, 15), (3, 8), (4, 4), (5, 2), (6, 1)]);
        let stats = SampleStatistics::new(0.5, &hist);
        let outcome = SnbModel::new(&hist, stats).uniqueness_risk();
        let risk = outcome.risk().expect("fit should converge");
        assert!((0.0..=1.0).contains(&risk));
        assert_relative_eq!(risk, 0.11783156357426282, max_relative = 1e-6);
    }

    #[test]
    fn test_undefined_when_fit_leaves_domain() {
        // The first Newton step for this shape jumps out of (0, 1) in p;
        // the model degrades to undefined rather than reporting garbage.
        let hist = histogram(&[(1, 100), (2, 40), (3, 15), (4, 5), (5, 2)]);
        let stats = SampleStatistics::new(0.2, &hist);
        let outcome = SnbModel::new(&hist, stats).uniqueness_risk();
        assert!(!outcome.is_defined());
    }
}
