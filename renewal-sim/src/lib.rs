//! Forward simulation of branching-process epidemics.
//!
//! [`ForwardSimulator`] draws daily case counts from the renewal equation
//! under a piecewise-constant [`RProfile`], and [`SimulationController`] runs
//! any [`ForwardModel`](renewal_core::ForwardModel) over a fixed window of
//! times at a chosen resolution.

mod controller;
mod error;
mod r_profile;
mod simulator;

pub use controller::SimulationController;
pub use error::SimulationError;
pub use r_profile::{RProfile, RStep};
pub use simulator::ForwardSimulator;
