use renewal_core::{ForwardModel, ValidationError};

/// Runs a [`ForwardModel`] over a fixed window of times.
///
/// The controller owns the model and a closed time window `[start, end]`. The
/// times it simulates (its *regime*) default to every integer in the window;
/// [`SimulationController::switch_resolution`] replaces them with evenly
/// spaced points.
#[derive(Debug, Clone)]
pub struct SimulationController<M> {
    model: M,
    start: i64,
    end: i64,
    regime: Vec<i64>,
}

impl<M: ForwardModel> SimulationController<M> {
    /// Creates a controller over `start..=end` at full daily resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTimeBounds`] unless
    /// `0 <= start <= end`.
    pub fn new(model: M, start: i64, end: i64) -> Result<Self, ValidationError> {
        if start < 0 || start > end {
            return Err(ValidationError::InvalidTimeBounds { start, end });
        }
        Ok(Self {
            model,
            start,
            end,
            regime: (start..=end).collect(),
        })
    }

    /// Resets the regime to `num_points` evenly spaced times across the
    /// window, each rounded to the nearest integer (ties to even).
    ///
    /// With few points or a short window neighbouring times can round to the
    /// same day. They stay in the regime and receive the same simulated count.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroResolution`] if `num_points` is zero.
    pub fn switch_resolution(&mut self, num_points: usize) -> Result<(), ValidationError> {
        if num_points == 0 {
            return Err(ValidationError::ZeroResolution);
        }
        self.regime = linspace_rounded(self.start, self.end, num_points);
        Ok(())
    }

    /// Returns the times the next [`run`](Self::run) will report.
    #[must_use]
    pub fn regime(&self) -> &[i64] {
        &self.regime
    }

    /// Returns the window as `(start, end)`.
    #[must_use]
    pub fn time_bounds(&self) -> (i64, i64) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Simulates the model from `initial_count` and returns one count per
    /// regime time.
    ///
    /// # Errors
    ///
    /// Propagates any error from the model.
    pub fn run(&mut self, initial_count: u64) -> Result<Vec<u64>, M::Error> {
        let mut distinct = self.regime.clone();
        distinct.dedup();

        let counts = self.model.simulate(initial_count, &distinct)?;

        // the regime is sorted, so each time maps to the next distinct slot
        let mut slot = 0;
        Ok(self
            .regime
            .iter()
            .map(|time| {
                while distinct[slot] != *time {
                    slot += 1;
                }
                counts[slot]
            })
            .collect())
    }
}

/// `num_points` evenly spaced values over `start..=end`, rounded to integers.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn linspace_rounded(start: i64, end: i64, num_points: usize) -> Vec<i64> {
    if num_points == 1 {
        return vec![start];
    }
    let first = start as f64;
    let step = (end - start) as f64 / (num_points - 1) as f64;
    (0..num_points)
        .map(|i| {
            let point = if i == num_points - 1 {
                end as f64
            } else {
                first + step * i as f64
            };
            point.round_ties_even() as i64
        })
        .collect()
}
