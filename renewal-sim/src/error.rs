use renewal_core::ValidationError;
use thiserror::Error;

/// Errors that can occur while simulating incidence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("expected cases diverged on day {day}: {mean}")]
    DivergentMean { day: usize, mean: f64 },
}
