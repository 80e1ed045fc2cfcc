//! Bayesian inference of the time-varying reproduction number.
//!
//! [`PosteriorEngine`] holds the reproduction number constant over a sliding
//! window of observed incidence and applies a Poisson-Gamma conjugate update
//! at each inferable time. The engine covers:
//!
//! - a single known serial interval, giving exact Gamma posteriors;
//! - several candidate serial intervals, giving Monte Carlo draws pooled with
//!   equal weight across candidates;
//! - local cases alone, or local cases driven by both local and imported
//!   infectors.
//!
//! Every run produces an immutable [`InferenceResult`], summarized as
//! [`CredibleIntervalRow`]s.

mod config;
pub mod conjugate;
mod engine;
mod error;
mod kernel;
pub mod monte_carlo;
mod posterior;
mod report;
mod result;
mod strategy;

pub use config::Sampling;
pub use engine::{
    CaseMode, PosteriorEngine, SerialIntervalCandidates, SerialIntervalMode, SerialIntervals,
    Variant,
};
pub use error::{Error, StateError};
pub use kernel::Window;
pub use monte_carlo::SamplePool;
pub use posterior::GammaPosterior;
pub use report::CredibleIntervalRow;
pub use result::{InferenceResult, Posterior};
pub use strategy::{LocalImported, LocalOnly, ShapeRate};

pub use renewal_core::ValidationError;
