//! Sample-level closed-form risk measures.
//!
//! These need no population model: they read directly off the histogram.

use pu_core::{ClassHistogram, ModelOutcome, UndefinedCause};

/// Average per-record re-identification risk across the sample.
///
/// Each record in a class of size `k` carries risk `1/k`, so the average
/// over all `n` records is `u / n` (file-level journalist risk).
pub fn equivalence_class_risk(histogram: &ClassHistogram) -> ModelOutcome {
    if histogram.is_empty() {
        return ModelOutcome::Undefined(UndefinedCause::EmptyHistogram);
    }
    ModelOutcome::from_value(histogram.u() as f64 / histogram.n() as f64)
}

/// Highest individual re-identification risk in the sample.
///
/// The records in the smallest equivalence class are the most exposed;
/// their risk is the reciprocal of that class size. Note this measure
/// usually overestimates actual risk, since not every sample unique is a
/// population unique.
pub fn highest_individual_risk(histogram: &ClassHistogram) -> ModelOutcome {
    match histogram.min_class_size() {
        Some(size) => ModelOutcome::from_value(1.0 / size as f64),
        None => ModelOutcome::Undefined(UndefinedCause::EmptyHistogram),
    }
}

/// Number of records in the highest-risk category.
///
/// Counts the classes of minimal size; `None` on an empty histogram.
pub fn highest_risk_affected(histogram: &ClassHistogram) -> Option<u64> {
    histogram.min_class_size().map(|size| histogram.frequency(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn histogram(counts: &[(u64, u64)]) -> ClassHistogram {
        ClassHistogram::from_counts(counts.iter().copied()).unwrap()
    }

    #[test]
    fn test_average_risk() {
        let hist = histogram(&[(1, 30), (2, 15), (3, 8), (4, 4), (5, 2), (6, 1)]);
        assert_relative_eq!(
            equivalence_class_risk(&hist).risk().unwrap(),
            60.0 / 116.0,
            epsilon = 1e-12
        );

        // All singletons: everyone is fully exposed within the sample.
        let singletons = histogram(&[(1, 7)]);
        assert_eq!(equivalence_class_risk(&singletons).risk(), Some(1.0));
    }

    #[test]
    fn test_highest_individual_risk() {
        let hist = histogram(&[(2, 3), (5, 1)]);
        assert_eq!(highest_individual_risk(&hist).risk(), Some(0.5));
        assert_eq!(highest_risk_affected(&hist), Some(3));
    }

    #[test]
    fn test_empty_histogram_is_undefined() {
        let empty = ClassHistogram::default();
        assert!(!equivalence_class_risk(&empty).is_defined());
        assert!(!highest_individual_risk(&empty).is_defined());
        assert_eq!(highest_risk_affected(&empty), None);
    }
}
