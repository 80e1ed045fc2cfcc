//! Core data types for renewal-equation epidemic models.
//!
//! A branching-process model relates new cases to past cases through a
//! [`SerialInterval`] kernel. This crate holds the validated inputs shared by
//! the forward simulator and the posterior engine: the kernel itself, the
//! observed [`IncidenceSeries`], the [`GammaPrior`] on the reproduction
//! number, and the [`ForwardModel`] trait that simulators implement.

mod error;
mod incidence;
mod model;
mod prior;
mod serial_interval;

pub use error::ValidationError;
pub use incidence::IncidenceSeries;
pub use model::ForwardModel;
pub use prior::GammaPrior;
pub use serial_interval::SerialInterval;
