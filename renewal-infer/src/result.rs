use renewal_core::ValidationError;

use crate::{CredibleIntervalRow, GammaPosterior, SamplePool, report::validate_central_probability};

/// Posterior for the reproduction number across the inference times.
#[derive(Debug, Clone, PartialEq)]
pub enum Posterior {
    /// One exact Gamma posterior per time.
    ClosedForm(Vec<GammaPosterior>),
    /// Monte Carlo draws pooled over serial interval candidates.
    Empirical(SamplePool),
}

/// Immutable outcome of one inference run.
///
/// Holds the times at which the reproduction number was inferred and the
/// posterior at each, and turns them into [`CredibleIntervalRow`]s on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceResult {
    tau: usize,
    times: Vec<i64>,
    posterior: Posterior,
}

impl InferenceResult {
    pub(crate) fn new(tau: usize, times: Vec<i64>, posterior: Posterior) -> Self {
        Self {
            tau,
            times,
            posterior,
        }
    }

    /// Window length the run used.
    #[must_use]
    pub fn tau(&self) -> usize {
        self.tau
    }

    /// Times with an inferred reproduction number, in ascending order.
    #[must_use]
    pub fn times(&self) -> &[i64] {
        &self.times
    }

    #[must_use]
    pub fn posterior(&self) -> &Posterior {
        &self.posterior
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Posterior mean at each inference time.
    #[must_use]
    pub fn means(&self) -> Vec<f64> {
        match &self.posterior {
            Posterior::ClosedForm(posteriors) => {
                posteriors.iter().map(GammaPosterior::mean).collect()
            }
            Posterior::Empirical(pool) => pool.means(),
        }
    }

    /// Summarizes the posterior at every inference time.
    ///
    /// Closed-form posteriors report the equal-tailed Gamma quantile interval;
    /// pooled draws report the `(1 - p) / 2` and `(1 + p) / 2` percentiles.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::CentralProbabilityOutOfRange`] unless
    /// `central_probability` lies strictly between 0 and 1.
    pub fn intervals(
        &self,
        central_probability: f64,
    ) -> Result<Vec<CredibleIntervalRow>, ValidationError> {
        let p = validate_central_probability(central_probability)?;

        let bounds: Vec<(f64, f64)> = match &self.posterior {
            Posterior::ClosedForm(posteriors) => posteriors
                .iter()
                .map(|posterior| posterior.interval(p))
                .collect::<Result<_, _>>()?,
            Posterior::Empirical(pool) => pool.percentiles((1.0 - p) / 2.0, (1.0 + p) / 2.0),
        };

        Ok(self
            .times
            .iter()
            .zip(self.means())
            .zip(bounds)
            .map(|((&time, mean), (lower, upper))| CredibleIntervalRow {
                time,
                mean,
                lower,
                upper,
                central_probability: p,
            })
            .collect())
    }
}
