//! Equivalence-class histogram and derived sample statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Histogram of equivalence-class sizes observed in a sample.
///
/// Maps a class size (the number of records sharing identical
/// quasi-identifier values) to the number of classes of that size. Built
/// once by the ingestion side and immutable for the lifetime of an
/// estimation run.
///
/// Keys are ≥ 1 and zero frequencies are never stored, so "frequency at
/// size" and "size present" always agree. The ordered map also fixes the
/// iteration order of every floating-point reduction over the histogram,
/// which makes repeated estimates bit-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassHistogram {
    classes: BTreeMap<u64, u64>,
}

impl ClassHistogram {
    /// Build a histogram from `(class size, frequency)` pairs.
    ///
    /// Frequencies for a repeated size accumulate. Zero frequencies are
    /// dropped; a size of zero is rejected.
    pub fn from_counts<I>(counts: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        let mut classes = BTreeMap::new();
        for (size, frequency) in counts {
            if size == 0 {
                return Err(Error::Validation(
                    "equivalence class size must be at least 1".to_string(),
                ));
            }
            if frequency == 0 {
                continue;
            }
            *classes.entry(size).or_insert(0) += frequency;
        }
        Ok(Self { classes })
    }

    /// Build a histogram from the size of each observed equivalence class.
    ///
    /// This is the seam the ingestion collaborator feeds after run-length
    /// grouping a sorted dataset.
    pub fn from_class_sizes(sizes: &[u64]) -> Result<Self> {
        Self::from_counts(sizes.iter().map(|&s| (s, 1)))
    }

    /// Number of classes of exactly the given size (0 if absent).
    pub fn frequency(&self, size: u64) -> u64 {
        self.classes.get(&size).copied().unwrap_or(0)
    }

    /// Number of sample-unique classes (size 1).
    pub fn c1(&self) -> u64 {
        self.frequency(1)
    }

    /// Number of size-2 classes.
    pub fn c2(&self) -> u64 {
        self.frequency(2)
    }

    /// Sample size: total number of records, `Σ size·frequency`.
    pub fn n(&self) -> u64 {
        self.classes.iter().map(|(size, freq)| size * freq).sum()
    }

    /// Number of distinct equivalence classes, `Σ frequency`.
    pub fn u(&self) -> u64 {
        self.classes.values().sum()
    }

    /// Smallest class size present, if any.
    pub fn min_class_size(&self) -> Option<u64> {
        self.classes.keys().next().copied()
    }

    /// Largest class size present, if any.
    pub fn max_class_size(&self) -> Option<u64> {
        self.classes.keys().next_back().copied()
    }

    /// True if no classes were recorded.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Iterate over `(size, frequency)` pairs in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.classes.iter().map(|(&size, &freq)| (size, freq))
    }
}

/// Sample statistics shared by every population model.
///
/// Constructed once per estimation from the histogram and the (already
/// sanitized) sampling fraction, then passed by value into each model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistics {
    pi: f64,
    n: u64,
    u: u64,
    population: f64,
}

impl SampleStatistics {
    /// Derive statistics for a sampling fraction `pi` in (0, 1].
    pub fn new(pi: f64, histogram: &ClassHistogram) -> Self {
        let n = histogram.n();
        let u = histogram.u();
        Self { pi, n, u, population: n as f64 / pi }
    }

    /// Sampling fraction.
    pub fn pi(&self) -> f64 {
        self.pi
    }

    /// Sample size (number of records).
    pub fn n(&self) -> u64 {
        self.n
    }

    /// Number of distinct equivalence classes in the sample.
    pub fn u(&self) -> u64 {
        self.u
    }

    /// Estimated population size `n / pi` (non-integral).
    pub fn population(&self) -> f64 {
        self.population
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_quantities() {
        let hist = ClassHistogram::from_counts([(1, 5), (2, 1), (4, 2)]).unwrap();
        assert_eq!(hist.n(), 15);
        assert_eq!(hist.u(), 8);
        assert_eq!(hist.c1(), 5);
        assert_eq!(hist.c2(), 1);
        assert_eq!(hist.frequency(4), 2);
        assert_eq!(hist.frequency(3), 0);
        assert_eq!(hist.min_class_size(), Some(1));
        assert_eq!(hist.max_class_size(), Some(4));
    }

    #[test]
    fn test_zero_frequency_entries_are_absent() {
        let hist = ClassHistogram::from_counts([(1, 0), (2, 3)]).unwrap();
        assert_eq!(hist.c1(), 0);
        assert_eq!(hist.frequency(1), 0);
        assert_eq!(hist.u(), 3);
        assert!(hist.iter().all(|(size, _)| size != 1));
    }

    #[test]
    fn test_zero_class_size_rejected() {
        assert!(ClassHistogram::from_counts([(0, 2)]).is_err());
        assert!(ClassHistogram::from_class_sizes(&[1, 0]).is_err());
    }

    #[test]
    fn test_from_class_sizes_accumulates() {
        let hist = ClassHistogram::from_class_sizes(&[1, 1, 1, 2, 3, 3]).unwrap();
        assert_eq!(hist.c1(), 3);
        assert_eq!(hist.frequency(2), 1);
        assert_eq!(hist.frequency(3), 2);
        assert_eq!(hist.n(), 11);
    }

    #[test]
    fn test_empty_histogram() {
        let hist = ClassHistogram::default();
        assert!(hist.is_empty());
        assert_eq!(hist.n(), 0);
        assert_eq!(hist.u(), 0);
        assert_eq!(hist.min_class_size(), None);
    }

    #[test]
    fn test_sample_statistics() {
        let hist = ClassHistogram::from_counts([(1, 5), (2, 1)]).unwrap();
        let stats = SampleStatistics::new(0.05, &hist);
        assert_eq!(stats.n(), 7);
        assert_eq!(stats.u(), 6);
        assert!((stats.population() - 140.0).abs() < 1e-9);
    }
}
