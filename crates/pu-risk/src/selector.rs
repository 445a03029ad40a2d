//! Model selection, fallback chains and public entry points.
//!
//! The selection rule follows Dankar et al. (2012), adapted for practical
//! use: the histogram's shape decides which population model to trust, and
//! a model that turns out to be numerically undefined hands over to the
//! next in its chain. The procedure is a pure function of its inputs —
//! the same `(pi, histogram)` always walks the same chain and returns the
//! same bits.

use pu_core::{
    ClassHistogram, Error, ModelKind, ModelOutcome, PopulationModel, Result, RiskEstimate,
    SampleStatistics,
};

use crate::newton::NewtonConfig;
use crate::pitman::PitmanModel;
use crate::snb::SnbModel;
use crate::zayatz::ZayatzModel;

/// Sampling fraction above which the Pitman model is no longer preferred.
const PITMAN_PI_CEILING: f64 = 0.1;

/// Configuration for the population-uniqueness estimator.
#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// Also evaluate the SNB model for comparison when `pi` exceeds the
    /// Pitman ceiling, returning the smaller of the SNB and Zayatz
    /// estimates (conservative minimum selection).
    pub include_snb: bool,
    /// Substitute for a caller-supplied sampling fraction outside (0, 1].
    pub pi_default: f64,
    /// Solver configuration handed to the iterative models.
    pub newton: NewtonConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self { include_snb: false, pi_default: 0.1, newton: NewtonConfig::default() }
    }
}

/// Estimates the fraction of population-unique records from a sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationUniquenessEstimator {
    config: EstimatorConfig,
}

impl PopulationUniquenessEstimator {
    /// Create an estimator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with a custom configuration.
    pub fn with_config(config: EstimatorConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate the population-uniqueness risk for a sample histogram.
    ///
    /// Returns [`Error::NoSampleUniques`] when the histogram has no size-1
    /// classes; otherwise walks the model chain for the (sanitized)
    /// sampling fraction and returns either an estimate tagged with the
    /// model that produced it, or [`RiskEstimate::Undefined`] when every
    /// model in the chain was inapplicable.
    pub fn estimate(&self, pi: f64, histogram: &ClassHistogram) -> Result<RiskEstimate> {
        let pi = self.effective_pi(pi);
        let stats = SampleStatistics::new(pi, histogram);

        // Without size-2 classes the Pitman guess cannot be derived, so
        // the Zayatz model is used exclusively.
        if histogram.c1() > 0 && histogram.c2() == 0 {
            let zayatz = ZayatzModel::new(histogram, stats);
            return Ok(settle(zayatz.kind(), zayatz.uniqueness_risk()));
        }

        if histogram.c1() == 0 {
            return Err(Error::NoSampleUniques);
        }

        if pi <= PITMAN_PI_CEILING {
            let pitman = PitmanModel::with_solver(histogram, stats, self.config.newton);
            let zayatz = ZayatzModel::new(histogram, stats);
            Ok(run_chain(&pitman, &zayatz))
        } else if self.config.include_snb {
            Ok(self.minimum_comparison(histogram, stats))
        } else {
            let zayatz = ZayatzModel::new(histogram, stats);
            let pitman = PitmanModel::with_solver(histogram, stats, self.config.newton);
            Ok(run_chain(&zayatz, &pitman))
        }
    }

    /// Zayatz/SNB comparison branch for `pi` above the Pitman ceiling.
    fn minimum_comparison(
        &self,
        histogram: &ClassHistogram,
        stats: SampleStatistics,
    ) -> RiskEstimate {
        let zayatz = ZayatzModel::new(histogram, stats).uniqueness_risk();
        let snb = SnbModel::with_solver(histogram, stats, self.config.newton).uniqueness_risk();

        match minimum_of(zayatz, snb) {
            Some((risk, model)) => RiskEstimate::Estimate { risk, model },
            None => {
                log::debug!("Zayatz and SNB both undefined, falling back to Pitman");
                let pitman = PitmanModel::with_solver(histogram, stats, self.config.newton);
                settle(pitman.kind(), pitman.uniqueness_risk())
            }
        }
    }

    fn effective_pi(&self, pi: f64) -> f64 {
        if pi > 0.0 && pi <= 1.0 {
            pi
        } else {
            log::warn!(
                "sampling fraction {pi} outside (0, 1]; using default {}",
                self.config.pi_default
            );
            self.config.pi_default
        }
    }
}

/// Conservative minimum selection between the Zayatz and SNB estimates.
///
/// Both defined: the smaller wins, ties going to SNB. One defined: that
/// one. Neither: `None`, which sends the caller to the Pitman fallback.
fn minimum_of(zayatz: ModelOutcome, snb: ModelOutcome) -> Option<(f64, ModelKind)> {
    match (zayatz.risk(), snb.risk()) {
        (Some(z), Some(s)) => {
            if s > z {
                Some((z, ModelKind::Zayatz))
            } else {
                Some((s, ModelKind::Snb))
            }
        }
        (Some(z), None) => Some((z, ModelKind::Zayatz)),
        (None, Some(s)) => Some((s, ModelKind::Snb)),
        (None, None) => None,
    }
}

/// Run a two-model chain: the fallback is only evaluated when the
/// preferred model is undefined.
fn run_chain(preferred: &dyn PopulationModel, fallback: &dyn PopulationModel) -> RiskEstimate {
    match preferred.uniqueness_risk() {
        ModelOutcome::Risk(risk) => RiskEstimate::Estimate { risk, model: preferred.kind() },
        ModelOutcome::Undefined(cause) => {
            log::debug!(
                "{} model undefined ({cause}), falling back to {}",
                preferred.kind(),
                fallback.kind()
            );
            settle(fallback.kind(), fallback.uniqueness_risk())
        }
    }
}

/// Terminal step of a chain: a still-undefined outcome becomes
/// [`RiskEstimate::Undefined`].
fn settle(model: ModelKind, outcome: ModelOutcome) -> RiskEstimate {
    match outcome {
        ModelOutcome::Risk(risk) => RiskEstimate::Estimate { risk, model },
        ModelOutcome::Undefined(cause) => {
            log::warn!("{model} model undefined ({cause}); no estimate available");
            RiskEstimate::Undefined
        }
    }
}

/// Estimate the population-uniqueness risk, NaN-style.
///
/// Float-only convenience surface over
/// [`PopulationUniquenessEstimator::estimate`] with the default
/// configuration: returns the risk in [0, 1], or NaN when the histogram
/// has no sample uniques or every model is undefined.
pub fn population_uniques_risk(pi: f64, histogram: &ClassHistogram) -> f64 {
    match PopulationUniquenessEstimator::new().estimate(pi, histogram) {
        Ok(estimate) => estimate.value(),
        Err(err) => {
            log::warn!("population uniqueness not estimable: {err}");
            f64::NAN
        }
    }
}
