//! Renewal-equation kernel applied to observed incidence.

use std::ops::RangeInclusive;

use renewal_core::SerialInterval;

/// Inclusive range of offsets from the start of a series over which the
/// reproduction number is held constant.
///
/// Windows are only handed out by the update drivers, which keep them inside
/// the strategy's series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    first: usize,
    last: usize,
}

impl Window {
    /// The window of `tau + 1` offsets ending at `last`; `last` must be at
    /// least `tau`.
    pub(crate) fn ending_at(last: usize, tau: usize) -> Self {
        Self {
            first: last - tau,
            last,
        }
    }

    #[must_use]
    pub fn first(&self) -> usize {
        self.first
    }

    #[must_use]
    pub fn last(&self) -> usize {
        self.last
    }

    #[must_use]
    pub fn offsets(&self) -> RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Offsets of the times that can be inferred with window `tau` on a series
/// of the given span.
///
/// The first `tau + 1` points are kept as history, so inference starts at
/// offset `tau + 2`. The range is empty when the series is too short.
pub(crate) fn inference_offsets(span: usize, tau: usize) -> RangeInclusive<usize> {
    tau + 2..=span
}

/// Total observed cases over the window.
pub(crate) fn cases_in(counts: &[f64], window: Window) -> f64 {
    counts[window.offsets()].iter().sum()
}

/// Serial-interval-weighted cases preceding `offset`, normalized by the
/// kernel's total weight.
///
/// From offset `L` onwards the whole kernel applies to the previous `L`
/// counts; before that only the first `offset` weights have history to act on.
pub(crate) fn infectiousness(
    counts: &[f64],
    serial_interval: &SerialInterval,
    offset: usize,
) -> f64 {
    let weights = serial_interval.weights();
    let lags = weights.len();

    let (history, kernel) = if offset >= lags {
        (&counts[offset - lags..offset], weights)
    } else {
        (&counts[..offset], &weights[..offset])
    };

    let load: f64 = history
        .iter()
        .rev()
        .zip(kernel)
        .map(|(cases, weight)| cases * weight)
        .sum();

    load / serial_interval.normalizing_constant()
}

/// Sum of [`infectiousness`] over every offset in the window.
pub(crate) fn infectiousness_in(
    counts: &[f64],
    serial_interval: &SerialInterval,
    window: Window,
) -> f64 {
    window
        .offsets()
        .map(|offset| infectiousness(counts, serial_interval, offset))
        .sum()
}
