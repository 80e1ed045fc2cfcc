use renewal_core::ValidationError;

/// Posterior summary of the reproduction number at one time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct CredibleIntervalRow {
    pub time: i64,
    pub mean: f64,
    pub lower: f64,
    pub upper: f64,
    pub central_probability: f64,
}

impl CredibleIntervalRow {
    /// Width of the interval, `upper - lower`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Checks that `value` lies strictly between 0 and 1.
pub(crate) fn validate_central_probability(value: f64) -> Result<f64, ValidationError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(ValidationError::CentralProbabilityOutOfRange { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_probability_must_be_open_unit_interval() {
        assert_eq!(validate_central_probability(0.95), Ok(0.95));
        for value in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(
                validate_central_probability(value).is_err(),
                "{value} should be rejected"
            );
        }
    }
}
