//! Zayatz conditional-uniqueness model.
//!
//! Estimates the probability that a sample-unique equivalence class is
//! also unique in the population, by comparing the hypergeometric chance
//! of drawing exactly one member from a class of each observed size. The
//! expected number of population uniques is then the number of sample
//! uniques scaled by that probability and the sampling fraction.

use pu_core::{
    ClassHistogram, ModelKind, ModelOutcome, PopulationModel, SampleStatistics,
};
use statrs::distribution::{Discrete, Hypergeometric};

/// Zayatz population model over a sample histogram.
pub struct ZayatzModel<'a> {
    histogram: &'a ClassHistogram,
    stats: SampleStatistics,
}

impl<'a> ZayatzModel<'a> {
    /// Create a model over the given histogram and sample statistics.
    pub fn new(histogram: &'a ClassHistogram, stats: SampleStatistics) -> Self {
        Self { histogram, stats }
    }

    /// Probability that a sample unique was drawn from a population unique.
    ///
    /// For each class size `k`, weights the hypergeometric probability of
    /// seeing exactly one of `k` population members in `n` draws by the
    /// share of classes of that size; the conditional probability is the
    /// singleton share of that mixture.
    pub fn conditional_uniqueness_probability(&self) -> f64 {
        let population = self.stats.population() as u64;
        let draws = self.stats.n();
        let u = self.stats.u() as f64;

        let mut mixture = 0.0;
        let mut singleton_share = 0.0;
        for (size, freq) in self.histogram.iter() {
            let pmf = match Hypergeometric::new(population, size, draws) {
                Ok(distribution) => distribution.pmf(1),
                Err(_) => 0.0,
            };
            let share = freq as f64 / u * pmf;
            mixture += share;
            if size == 1 {
                singleton_share = share;
            }
        }

        singleton_share / mixture
    }
}

impl PopulationModel for ZayatzModel<'_> {
    fn kind(&self) -> ModelKind {
        ModelKind::Zayatz
    }

    fn uniqueness_risk(&self) -> ModelOutcome {
        let probability = self.conditional_uniqueness_probability();
        let total = self.histogram.c1() as f64 * probability / self.stats.pi();
        ModelOutcome::from_value(total / self.stats.population())
    }
}
