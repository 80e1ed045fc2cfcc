use rand::{SeedableRng, rngs::StdRng};

/// Monte Carlo settings for engines with several serial interval candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Sampling {
    /// Posterior draws per candidate and time step.
    pub num_samples: usize,
    /// Seed for the draws; `None` seeds from operating system entropy.
    pub seed: Option<u64>,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            num_samples: 1000,
            seed: None,
        }
    }
}

impl Sampling {
    /// Validates that at least one draw is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `num_samples` is zero.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.num_samples == 0 {
            return Err("num_samples must be at least one");
        }
        Ok(())
    }

    pub(crate) fn rng(&self) -> StdRng {
        self.seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
    }
}
