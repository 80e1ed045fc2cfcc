//! Shared fixtures for the end-to-end tests.

use renewal_core::{GammaPrior, IncidenceSeries, SerialInterval};

/// Serial interval used across the end-to-end tests, peaking at three days.
///
/// # Panics
///
/// Never; the weights are valid.
#[must_use]
pub fn serial_interval() -> SerialInterval {
    SerialInterval::new([1.0, 2.0, 3.0, 2.0, 1.0]).expect("weights are valid")
}

/// Weakly informative prior with mean 5.
///
/// # Panics
///
/// Never; the parameters are valid.
#[must_use]
pub fn prior() -> GammaPrior {
    GammaPrior::new(1.0, 0.2).expect("parameters are valid")
}

/// Daily series starting at day 0 from simulated counts.
///
/// # Panics
///
/// Panics if `counts` is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn incidence(counts: &[u64]) -> IncidenceSeries {
    IncidenceSeries::from_counts(0, counts.iter().map(|&count| count as f64))
        .expect("simulated counts form a non-empty series")
}
