use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Poisson};
use renewal_core::{ForwardModel, SerialInterval, ValidationError};
use tracing::debug;

use crate::{RProfile, SimulationError};

/// Branching-process simulator driven by the renewal equation.
///
/// On day `t` the expected number of new cases is
/// `R(t) · Σ_s w_s · I(t - s) / Σ w`, where `w` is the serial interval and `I`
/// the cases drawn so far. The day's count is a Poisson draw with that mean.
/// Simulations always start at day 0 with the caller's initial count.
///
/// Randomness comes from an owned [`StdRng`]. A simulator built with
/// [`ForwardSimulator::with_seed`] (or reseeded) produces the same sequence of
/// simulations every time.
#[derive(Debug, Clone)]
pub struct ForwardSimulator {
    r_profile: RProfile,
    serial_interval: SerialInterval,
    rng: StdRng,
}

impl ForwardSimulator {
    /// Creates a simulator with a constant reproduction number, seeded from
    /// operating system entropy.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if `initial_r` is negative or not finite.
    pub fn new(initial_r: f64, serial_interval: SerialInterval) -> Result<Self, ValidationError> {
        Ok(Self {
            r_profile: RProfile::constant(initial_r)?,
            serial_interval,
            rng: StdRng::from_entropy(),
        })
    }

    /// Replaces the random number generator with one seeded from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// Reseeds the random number generator.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    #[must_use]
    pub fn r_profile(&self) -> &RProfile {
        &self.r_profile
    }

    /// Replaces the reproduction number profile.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the profile is invalid; see
    /// [`RProfile::new`].
    pub fn set_r_profile(
        &mut self,
        values: &[f64],
        start_times: &[i64],
    ) -> Result<(), ValidationError> {
        self.r_profile = RProfile::new(values, start_times)?;
        Ok(())
    }

    #[must_use]
    pub fn serial_interval(&self) -> &SerialInterval {
        &self.serial_interval
    }

    pub fn set_serial_interval(&mut self, serial_interval: SerialInterval) {
        self.serial_interval = serial_interval;
    }

    /// Returns the reproduction number in effect on each day `1..=last_day`.
    ///
    /// This is the ground truth a simulation was generated under, for
    /// comparison against inferred values.
    #[must_use]
    pub fn r_trajectory(&self, last_day: i64) -> Vec<f64> {
        (1..=last_day).map(|day| self.r_profile.value_at(day)).collect()
    }

    /// Simulates daily cases and returns the counts at the requested `times`.
    ///
    /// Every day from 1 to the largest requested time is simulated, since each
    /// day depends on all earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Validation`] if `times` contains a negative
    /// value or is not strictly ascending, and
    /// [`SimulationError::DivergentMean`] if the expected count is not finite
    /// or a drawn count does not fit in a `u64`.
    pub fn simulate(
        &mut self,
        initial_count: u64,
        times: &[i64],
    ) -> Result<Vec<u64>, SimulationError> {
        let requested = validate_times(times)?;
        let Some(&last_day) = requested.last() else {
            return Ok(Vec::new());
        };

        let mut incidences = Vec::with_capacity(last_day + 1);
        incidences.push(initial_count);

        for day in 1..=last_day {
            let mean = self.normalised_daily_mean(day, &incidences);
            let count = poisson_draw(mean, &mut self.rng)
                .ok_or(SimulationError::DivergentMean { day, mean })?;
            incidences.push(count);
        }

        debug!(
            days = last_day,
            initial_count,
            requested = requested.len(),
            "simulated incidence"
        );

        Ok(requested.iter().map(|&day| incidences[day]).collect())
    }

    /// Expected new cases on `day` given the cases drawn for earlier days.
    ///
    /// Beyond the kernel length the full serial interval applies to the last
    /// `L` days; up to it, only the first `day` weights are used.
    #[allow(clippy::cast_precision_loss)]
    fn normalised_daily_mean(&self, day: usize, incidences: &[u64]) -> f64 {
        let weights = self.serial_interval.weights();
        let lags = weights.len();

        let history = if day > lags {
            &incidences[day - lags..day]
        } else {
            &incidences[..day]
        };

        // walking the history backwards pairs the most recent day with lag 1
        let load: f64 = history
            .iter()
            .rev()
            .zip(weights)
            .map(|(&cases, weight)| cases as f64 * weight)
            .sum();

        let r = self.r_profile.value_at(i64::try_from(day).unwrap_or(i64::MAX));
        r * load / self.serial_interval.normalizing_constant()
    }
}

impl ForwardModel for ForwardSimulator {
    type Error = SimulationError;

    fn simulate(&mut self, initial_count: u64, times: &[i64]) -> Result<Vec<u64>, Self::Error> {
        ForwardSimulator::simulate(self, initial_count, times)
    }
}

/// 2^64, the smallest `f64` above `u64::MAX`.
const COUNT_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Draws a Poisson count, or `None` if `mean` is not finite or the draw does
/// not fit in a `u64`.
///
/// A mean of zero has no Poisson distribution but always yields zero cases.
fn poisson_draw(mean: f64, rng: &mut StdRng) -> Option<u64> {
    if !mean.is_finite() {
        return None;
    }
    if mean <= 0.0 {
        return Some(0);
    }
    let distribution = Poisson::new(mean).ok()?;
    to_count(distribution.sample(rng))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(value: f64) -> Option<u64> {
    (value >= 0.0 && value < COUNT_LIMIT).then(|| value as u64)
}

/// Converts requested times into day indices, checking order and sign.
fn validate_times(times: &[i64]) -> Result<Vec<usize>, ValidationError> {
    if times.windows(2).any(|pair| pair[0] >= pair[1]) {
        return Err(ValidationError::InvalidTimes {
            reason: "times must be strictly ascending without duplicates",
        });
    }
    times
        .iter()
        .map(|&time| {
            usize::try_from(time).map_err(|_| ValidationError::InvalidTimes {
                reason: "times must be non-negative",
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator(initial_r: f64) -> ForwardSimulator {
        let si = SerialInterval::new([1.0, 2.0, 3.0, 2.0, 1.0]).unwrap();
        ForwardSimulator::new(initial_r, si).unwrap().with_seed(42)
    }

    #[test]
    fn returns_counts_at_requested_times() {
        let mut sim = simulator(2.0);

        let counts = sim.simulate(1, &[0, 2, 4]).unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts[0], 1);
    }

    #[test]
    fn day_zero_is_the_initial_count() {
        for r in [0.0, 0.5, 2.0, 10.0] {
            let mut sim = simulator(r);
            for initial in [0, 1, 17, 10_000] {
                assert_eq!(sim.simulate(initial, &[0]).unwrap(), vec![initial]);
            }
        }
    }

    #[test]
    fn day_zero_is_exact_beyond_float_precision() {
        let initial = (1_u64 << 53) + 1;

        assert_eq!(simulator(2.0).simulate(initial, &[0]).unwrap(), vec![initial]);
        assert_eq!(simulator(0.0).simulate(u64::MAX, &[0, 1]).unwrap(), vec![u64::MAX, 0]);
    }

    #[test]
    fn overflowing_mean_is_divergent() {
        let mut sim = simulator(1e300);

        let result = sim.simulate(u64::MAX / 2, &[0, 1, 2]);

        assert!(matches!(
            result,
            Err(SimulationError::DivergentMean { day: 1, .. })
        ));
    }

    #[test]
    fn count_conversion_rejects_out_of_range_draws() {
        assert_eq!(to_count(0.0), Some(0));
        assert_eq!(to_count(9_007_199_254_740_992.0), Some(1 << 53));
        assert_eq!(to_count(COUNT_LIMIT), None);
        assert_eq!(to_count(f64::INFINITY), None);
        assert_eq!(to_count(-1.0), None);
    }

    #[test]
    fn same_seed_reproduces_simulation() {
        let times: Vec<i64> = (0..30).collect();

        let first = simulator(1.8).simulate(5, &times).unwrap();
        let second = simulator(1.8).simulate(5, &times).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn zero_reproduction_number_ends_the_outbreak() {
        let mut sim = simulator(0.0);

        let counts = sim.simulate(50, &[0, 1, 5, 20]).unwrap();

        assert_eq!(counts, vec![50, 0, 0, 0]);
    }

    #[test]
    fn skipped_days_are_still_simulated() {
        // requesting a late day alone must match that day in a full run
        let times: Vec<i64> = (0..=12).collect();
        let full = simulator(1.5).simulate(3, &times).unwrap();
        let sparse = simulator(1.5).simulate(3, &[12]).unwrap();

        assert_eq!(sparse, vec![full[12]]);
    }

    #[test]
    fn empty_request_returns_nothing() {
        assert!(simulator(2.0).simulate(1, &[]).unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_times() {
        let mut sim = simulator(2.0);

        for times in [&[2, 1][..], &[1, 1][..], &[-1, 2][..]] {
            assert!(matches!(
                sim.simulate(1, times),
                Err(SimulationError::Validation(ValidationError::InvalidTimes { .. }))
            ));
        }
    }

    #[test]
    fn daily_mean_truncates_kernel_at_the_start() {
        let si = SerialInterval::new([1.0, 2.0, 3.0]).unwrap();
        let sim = ForwardSimulator::new(2.0, si).unwrap();

        // day 1 sees only day 0 at lag 1
        assert!((sim.normalised_daily_mean(1, &[6]) - 2.0 * 6.0 / 6.0).abs() < 1e-12);
        // day 2: day 1 at lag 1, day 0 at lag 2
        let mean = sim.normalised_daily_mean(2, &[6, 3]);
        assert!((mean - 2.0 * (3.0 + 2.0 * 6.0) / 6.0).abs() < 1e-12);
        // day 5: only days 2..=4 fall inside the kernel
        let mean = sim.normalised_daily_mean(5, &[100, 100, 1, 2, 3]);
        assert!((mean - 2.0 * (3.0 + 2.0 * 2.0 + 3.0 * 1.0) / 6.0).abs() < 1e-12);
    }

    #[test]
    fn trajectory_follows_profile() {
        let mut sim = simulator(3.0);
        sim.set_r_profile(&[3.0, 0.5], &[0, 3]).unwrap();

        assert_eq!(sim.r_trajectory(5), vec![3.0, 3.0, 0.5, 0.5, 0.5]);
        assert!(sim.set_r_profile(&[1.0], &[0, 1]).is_err());
        assert_eq!(sim.r_profile().steps().len(), 2);
    }
}
