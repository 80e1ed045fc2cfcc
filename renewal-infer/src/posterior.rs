use rand_distr::Gamma as GammaSampler;
use renewal_core::ValidationError;
use statrs::distribution::{ContinuousCDF, Gamma};

/// Gamma posterior for the reproduction number at one time, in shape-rate form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaPosterior {
    pub shape: f64,
    pub rate: f64,
}

impl GammaPosterior {
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.shape / self.rate
    }

    /// Equal-tailed interval holding `central_probability` of the mass.
    ///
    /// `central_probability` must already lie in `(0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPosterior`] unless shape and rate are
    /// finite and positive, as happens when window sums overflow.
    pub fn interval(&self, central_probability: f64) -> Result<(f64, f64), ValidationError> {
        self.validate()?;
        let distribution =
            Gamma::new(self.shape, self.rate).map_err(|_| self.invalid())?;
        let tail = (1.0 - central_probability) / 2.0;
        Ok((
            quantile(&distribution, self.mean(), tail),
            quantile(&distribution, self.mean(), 1.0 - tail),
        ))
    }

    /// Returns a sampler for this posterior.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPosterior`] unless shape and rate are
    /// finite and positive.
    pub fn sampler(&self) -> Result<GammaSampler<f64>, ValidationError> {
        self.validate()?;
        GammaSampler::new(self.shape, 1.0 / self.rate).map_err(|_| self.invalid())
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if valid(self.shape) && valid(self.rate) {
            Ok(())
        } else {
            Err(self.invalid())
        }
    }

    fn invalid(&self) -> ValidationError {
        ValidationError::InvalidPosterior {
            shape: self.shape,
            rate: self.rate,
        }
    }
}

/// Bisection on the CDF, bracketing from the mean outwards.
///
/// Converges to within a few ulps of the true quantile for `p` in `(0, 1)`.
fn quantile(distribution: &Gamma, mean: f64, p: f64) -> f64 {
    const MAX_ITERS: usize = 200;

    let mut low = 0.0;
    let mut high = mean.max(f64::MIN_POSITIVE);
    while distribution.cdf(high) < p && high.is_finite() {
        low = high;
        high *= 2.0;
    }

    for _ in 0..MAX_ITERS {
        let mid = 0.5 * (low + high);
        if mid <= low || mid >= high {
            break;
        }
        if distribution.cdf(mid) < p {
            low = mid;
        } else {
            high = mid;
        }
    }
    0.5 * (low + high)
}
