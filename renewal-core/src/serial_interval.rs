use statrs::distribution::{Continuous, Gamma};

use crate::ValidationError;

/// Unnormalized distribution of the time between successive cases in a
/// transmission chain.
///
/// Weight `i` (zero-based) is the relative probability that a secondary case
/// appears `i + 1` days after its infector. Weights need not sum to one; the
/// normalizing constant is kept alongside them and applied wherever the kernel
/// is used.
///
/// # Examples
///
/// ```
/// use renewal_core::SerialInterval;
///
/// let si = SerialInterval::new([1.0, 2.0, 1.0]).unwrap();
/// assert_eq!(si.max_lag(), 3);
/// assert_eq!(si.normalizing_constant(), 4.0);
/// assert_eq!(si.weight(2), 2.0);
/// assert_eq!(si.weight(4), 0.0);
///
/// assert!(SerialInterval::new([0.0, 0.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct SerialInterval {
    weights: Vec<f64>,
    normalizing_constant: f64,
}

impl SerialInterval {
    /// Creates a serial interval from its daily weights.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `weights` is empty, contains a
    /// negative or non-finite value, or sums to zero.
    pub fn new(weights: impl Into<Vec<f64>>) -> Result<Self, ValidationError> {
        let weights = weights.into();
        let normalizing_constant = validate_weights(&weights)?;
        Ok(Self {
            weights,
            normalizing_constant,
        })
    }

    /// Discretizes a Gamma distribution with the given mean and standard
    /// deviation by evaluating its density at lags `1..=max_lag`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `mean` or `sd` is not finite and
    /// positive, if `max_lag` is zero, or if every density value underflows.
    pub fn discretized_gamma(mean: f64, sd: f64, max_lag: usize) -> Result<Self, ValidationError> {
        if !mean.is_finite() || mean <= 0.0 {
            return Err(ValidationError::InvalidGammaSerialInterval {
                reason: "mean must be finite and positive",
            });
        }
        if !sd.is_finite() || sd <= 0.0 {
            return Err(ValidationError::InvalidGammaSerialInterval {
                reason: "standard deviation must be finite and positive",
            });
        }
        if max_lag == 0 {
            return Err(ValidationError::InvalidGammaSerialInterval {
                reason: "at least one lag is required",
            });
        }

        let variance = sd * sd;
        let shape = mean * mean / variance;
        let rate = mean / variance;
        let density = Gamma::new(shape, rate).map_err(|_| {
            ValidationError::InvalidGammaSerialInterval {
                reason: "mean and standard deviation do not define a gamma distribution",
            }
        })?;

        #[allow(clippy::cast_precision_loss)]
        let weights: Vec<f64> = (1..=max_lag).map(|lag| density.pdf(lag as f64)).collect();
        Self::new(weights)
    }

    /// Returns the daily weights, lag 1 first.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Returns the weight for a one-based `lag`, or zero beyond the kernel.
    #[must_use]
    pub fn weight(&self, lag: usize) -> f64 {
        lag.checked_sub(1)
            .and_then(|index| self.weights.get(index))
            .copied()
            .unwrap_or(0.0)
    }

    /// Returns the longest lag covered by the kernel.
    #[must_use]
    pub fn max_lag(&self) -> usize {
        self.weights.len()
    }

    /// Returns the sum of all weights.
    #[must_use]
    pub fn normalizing_constant(&self) -> f64 {
        self.normalizing_constant
    }

    /// Replaces the weights and recomputes the normalizing constant.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] under the same conditions as
    /// [`SerialInterval::new`], in which case `self` is left unchanged.
    pub fn replace(&mut self, weights: impl Into<Vec<f64>>) -> Result<(), ValidationError> {
        *self = Self::new(weights)?;
        Ok(())
    }
}

fn validate_weights(weights: &[f64]) -> Result<f64, ValidationError> {
    if weights.is_empty() {
        return Err(ValidationError::EmptySerialInterval);
    }

    if let Some((index, &value)) = weights
        .iter()
        .enumerate()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(ValidationError::InvalidSerialWeight {
            lag: index + 1,
            value,
        });
    }

    let sum: f64 = weights.iter().sum();
    if sum > 0.0 {
        Ok(sum)
    } else {
        Err(ValidationError::NonPositiveSerialSum { sum })
    }
}

impl TryFrom<Vec<f64>> for SerialInterval {
    type Error = ValidationError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(weights)
    }
}

impl From<SerialInterval> for Vec<f64> {
    fn from(serial_interval: SerialInterval) -> Self {
        serial_interval.weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn keeps_weights_and_sum() {
        let si = SerialInterval::new(vec![1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();

        assert_eq!(si.weights(), &[1.0, 2.0, 3.0, 2.0, 1.0]);
        assert_eq!(si.max_lag(), 5);
        assert_relative_eq!(si.normalizing_constant(), 9.0);
    }

    #[test]
    fn weight_is_one_based() {
        let si = SerialInterval::new([0.5, 0.3, 0.2]).unwrap();

        assert_eq!(si.weight(0), 0.0);
        assert_eq!(si.weight(1), 0.5);
        assert_eq!(si.weight(3), 0.2);
        assert_eq!(si.weight(10), 0.0);
    }

    #[test]
    fn rejects_empty_weights() {
        assert_eq!(
            SerialInterval::new(Vec::<f64>::new()),
            Err(ValidationError::EmptySerialInterval)
        );
    }

    #[test]
    fn rejects_negative_or_non_finite_weights() {
        assert!(matches!(
            SerialInterval::new([1.0, -0.5]),
            Err(ValidationError::InvalidSerialWeight { lag: 2, .. })
        ));
        assert!(matches!(
            SerialInterval::new([f64::NAN]),
            Err(ValidationError::InvalidSerialWeight { lag: 1, .. })
        ));
        assert!(matches!(
            SerialInterval::new([1.0, f64::INFINITY]),
            Err(ValidationError::InvalidSerialWeight { lag: 2, .. })
        ));
    }

    #[test]
    fn rejects_zero_sum() {
        assert!(matches!(
            SerialInterval::new([0.0]),
            Err(ValidationError::NonPositiveSerialSum { .. })
        ));
    }

    #[test]
    fn replace_is_atomic() {
        let mut si = SerialInterval::new([1.0, 1.0]).unwrap();

        assert!(si.replace([0.0, 0.0, 0.0]).is_err());
        assert_eq!(si.weights(), &[1.0, 1.0]);
        assert_relative_eq!(si.normalizing_constant(), 2.0);

        si.replace([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(si.max_lag(), 3);
        assert_relative_eq!(si.normalizing_constant(), 6.0);
    }

    #[test]
    fn discretized_gamma_peaks_near_the_mode() {
        // mean 2.6, sd 1.5: shape ~3.0, so the mode sits just below 2 days
        let si = SerialInterval::discretized_gamma(2.6, 1.5, 30).unwrap();

        assert_eq!(si.max_lag(), 30);
        let peak = si
            .weights()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(index, _)| index + 1)
            .unwrap();
        assert_eq!(peak, 2);
        assert!(si.weights().iter().all(|w| *w >= 0.0));
    }

    #[test]
    fn discretized_gamma_rejects_bad_parameters() {
        assert!(SerialInterval::discretized_gamma(0.0, 1.0, 10).is_err());
        assert!(SerialInterval::discretized_gamma(2.0, -1.0, 10).is_err());
        assert!(SerialInterval::discretized_gamma(2.0, 1.0, 0).is_err());
    }
}
