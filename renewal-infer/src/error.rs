use renewal_core::ValidationError;
use thiserror::Error;

/// Errors from querying an engine in the wrong state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("no inference has been run yet")]
    NotInferred,
}

/// Errors returned by the posterior engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    State(#[from] StateError),
}
