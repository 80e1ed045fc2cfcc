use crate::ValidationError;

/// Gamma prior on the reproduction number, in shape-rate form.
///
/// The density is `rate^shape / Γ(shape) · x^(shape-1) · e^(-rate·x)`, which is
/// conjugate to the Poisson likelihood of daily case counts.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "(f64, f64)", into = "(f64, f64)")
)]
pub struct GammaPrior {
    shape: f64,
    rate: f64,
}

impl GammaPrior {
    /// Creates a prior with the given shape (α) and rate (β).
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPrior`] unless both parameters are
    /// finite and strictly positive.
    pub fn new(shape: f64, rate: f64) -> Result<Self, ValidationError> {
        let valid = |x: f64| x.is_finite() && x > 0.0;
        if valid(shape) && valid(rate) {
            Ok(Self { shape, rate })
        } else {
            Err(ValidationError::InvalidPrior { shape, rate })
        }
    }

    #[must_use]
    pub fn shape(&self) -> f64 {
        self.shape
    }

    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl TryFrom<(f64, f64)> for GammaPrior {
    type Error = ValidationError;

    fn try_from((shape, rate): (f64, f64)) -> Result<Self, Self::Error> {
        Self::new(shape, rate)
    }
}

impl From<GammaPrior> for (f64, f64) {
    fn from(prior: GammaPrior) -> Self {
        (prior.shape, prior.rate)
    }
}
