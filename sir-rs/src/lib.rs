//! Deterministic SIR compartmental model: a forward-Euler day loop over the
//! susceptible/infected/recovered counts, with an optional one-time
//! intervention on the transmission coefficient, plus the run-protocol
//! plumbing to drive it from a run description and write its trajectory.

pub mod error;
pub mod metrics;
pub mod output;
pub mod parameters;
pub mod runner;
pub mod sir;

pub use error::InvalidParameterError;
pub use output::SirOutput;
pub use parameters::{Intervention, Parameters};
pub use runner::Environment;
pub use sir::{SimulationState, SirModel};
