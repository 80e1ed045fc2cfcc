use renewal_core::ValidationError;

/// Threshold below which [`RProfile::value_at`] uses linear search.
///
/// Profiles are usually a handful of steps; longer ones fall back to binary
/// search on the start times.
const LINEAR_SEARCH_THRESHOLD: usize = 32;

/// A reproduction number that takes effect from `start` onwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RStep {
    pub start: i64,
    pub value: f64,
}

/// Piecewise-constant reproduction number over time.
///
/// Each [`RStep`] holds from its start time until the next step begins; the
/// last step holds forever. Times before the first start take the first value.
///
/// # Examples
///
/// ```
/// use renewal_sim::RProfile;
///
/// let profile = RProfile::new(&[3.0, 0.5], &[0, 15]).unwrap();
///
/// assert_eq!(profile.value_at(0), 3.0);
/// assert_eq!(profile.value_at(14), 3.0);
/// assert_eq!(profile.value_at(15), 0.5);
/// assert_eq!(profile.value_at(400), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RProfile {
    steps: Vec<RStep>,
}

impl RProfile {
    /// Creates a profile holding `value` from time 0 onwards.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRProfile`] if `value` is negative or
    /// not finite.
    pub fn constant(value: f64) -> Result<Self, ValidationError> {
        Self::new(&[value], &[0])
    }

    /// Creates a profile from parallel sequences of values and start times.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRProfile`] if the sequences are empty
    /// or differ in length, a value is negative or not finite, or the start
    /// times are not strictly ascending.
    pub fn new(values: &[f64], start_times: &[i64]) -> Result<Self, ValidationError> {
        if values.is_empty() {
            return Err(ValidationError::InvalidRProfile {
                reason: "at least one value is required",
            });
        }
        if values.len() != start_times.len() {
            return Err(ValidationError::InvalidRProfile {
                reason: "values and start times differ in length",
            });
        }
        if values.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(ValidationError::InvalidRProfile {
                reason: "values must be finite and non-negative",
            });
        }
        if start_times.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ValidationError::InvalidRProfile {
                reason: "start times must be strictly ascending",
            });
        }

        let steps = start_times
            .iter()
            .zip(values)
            .map(|(&start, &value)| RStep { start, value })
            .collect();

        Ok(Self { steps })
    }

    /// Returns the steps in order of increasing start time.
    #[must_use]
    pub fn steps(&self) -> &[RStep] {
        &self.steps
    }

    /// Returns the reproduction number in effect at `time`.
    #[must_use]
    pub fn value_at(&self, time: i64) -> f64 {
        let index = if self.steps.len() < LINEAR_SEARCH_THRESHOLD {
            self.steps
                .iter()
                .rposition(|step| step.start <= time)
                .unwrap_or(0)
        } else {
            self.steps
                .partition_point(|step| step.start <= time)
                .saturating_sub(1)
        };
        self.steps[index].value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_profile_is_flat() {
        let profile = RProfile::constant(2.0).unwrap();

        assert_eq!(profile.steps().len(), 1);
        assert_eq!(profile.value_at(-5), 2.0);
        assert_eq!(profile.value_at(0), 2.0);
        assert_eq!(profile.value_at(1_000), 2.0);
    }

    #[test]
    fn times_before_first_start_use_first_value() {
        let profile = RProfile::new(&[1.5, 0.7], &[10, 20]).unwrap();

        assert_eq!(profile.value_at(0), 1.5);
        assert_eq!(profile.value_at(19), 1.5);
        assert_eq!(profile.value_at(20), 0.7);
    }

    #[test]
    fn rejects_invalid_profiles() {
        assert!(RProfile::new(&[], &[]).is_err());
        assert!(RProfile::new(&[1.0, 2.0], &[0]).is_err());
        assert!(RProfile::new(&[1.0, -2.0], &[0, 5]).is_err());
        assert!(RProfile::new(&[1.0, f64::NAN], &[0, 5]).is_err());
        assert!(RProfile::new(&[1.0, 2.0], &[5, 5]).is_err());
        assert!(RProfile::new(&[1.0, 2.0], &[5, 1]).is_err());
        assert!(RProfile::constant(-1.0).is_err());
    }

    #[test]
    fn value_at_works_for_long_profiles() {
        let values: Vec<f64> = (0..100_u32).map(f64::from).collect();
        let starts: Vec<i64> = (0..100).map(|i| i * 10).collect();
        let profile = RProfile::new(&values, &starts).unwrap();

        assert_eq!(profile.value_at(-1), 0.0);
        assert_eq!(profile.value_at(0), 0.0);
        assert_eq!(profile.value_at(42), 4.0);
        assert_eq!(profile.value_at(999), 99.0);
        assert_eq!(profile.value_at(5_000), 99.0);
    }
}
