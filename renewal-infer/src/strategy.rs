use renewal_core::{GammaPrior, IncidenceSeries, SerialInterval, ValidationError};

use crate::{
    GammaPosterior, Window,
    kernel::{cases_in, infectiousness_in},
};

/// Computes the conjugate posterior for one window under one serial interval.
///
/// A strategy captures which case series feed the update. The single-interval
/// update and the Monte Carlo driver both work with any strategy, so local-only
/// and local-plus-imported inference share the same window arithmetic.
pub trait ShapeRate {
    /// Span of the case series the strategy reads, in days.
    ///
    /// The drivers only pass windows that end at or before this offset.
    fn span(&self) -> usize;

    /// Returns the posterior shape and rate for `window`.
    fn shape_rate(
        &self,
        serial_interval: &SerialInterval,
        prior: &GammaPrior,
        window: Window,
    ) -> GammaPosterior;
}

/// Every case is assumed to be locally transmitted.
#[derive(Debug, Clone, Copy)]
pub struct LocalOnly<'a> {
    local: &'a IncidenceSeries,
}

impl<'a> LocalOnly<'a> {
    #[must_use]
    pub fn new(local: &'a IncidenceSeries) -> Self {
        Self { local }
    }
}

impl ShapeRate for LocalOnly<'_> {
    fn span(&self) -> usize {
        self.local.span()
    }

    fn shape_rate(
        &self,
        serial_interval: &SerialInterval,
        prior: &GammaPrior,
        window: Window,
    ) -> GammaPosterior {
        let counts = self.local.counts();
        GammaPosterior {
            shape: prior.shape() + cases_in(counts, window),
            rate: prior.rate() + infectiousness_in(counts, serial_interval, window),
        }
    }
}

/// Local cases are infected by both local and imported cases, with imported
/// cases transmitting at `(1 + epsilon)` times the local reproduction number.
///
/// Only local cases count as new observations; imported cases add to the
/// infectious pressure.
#[derive(Debug, Clone, Copy)]
pub struct LocalImported<'a> {
    local: &'a IncidenceSeries,
    imported: &'a IncidenceSeries,
    epsilon: f64,
}

impl<'a> LocalImported<'a> {
    /// Pairs local and imported cases covering the same times.
    ///
    /// Use [`IncidenceSeries::reindexed`] to align the imported series first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MisalignedSeries`] if the two series cover
    /// different times.
    pub fn new(
        local: &'a IncidenceSeries,
        imported: &'a IncidenceSeries,
        epsilon: f64,
    ) -> Result<Self, ValidationError> {
        if local.start() != imported.start() || local.end() != imported.end() {
            return Err(ValidationError::MisalignedSeries {
                expected_start: local.start(),
                expected_end: local.end(),
                start: imported.start(),
                end: imported.end(),
            });
        }
        Ok(Self {
            local,
            imported,
            epsilon,
        })
    }
}

impl ShapeRate for LocalImported<'_> {
    fn span(&self) -> usize {
        self.local.span()
    }

    fn shape_rate(
        &self,
        serial_interval: &SerialInterval,
        prior: &GammaPrior,
        window: Window,
    ) -> GammaPosterior {
        let local = self.local.counts();
        let imported = self.imported.counts();
        GammaPosterior {
            shape: prior.shape() + cases_in(local, window),
            rate: prior.rate()
                + infectiousness_in(local, serial_interval, window)
                + (1.0 + self.epsilon) * infectiousness_in(imported, serial_interval, window),
        }
    }
}
