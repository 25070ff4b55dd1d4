// Scheduling layer - the per-timestep orchestration described in spec
// components D-H: priority policy, assignment engine, cargo scheduler,
// auth solver coordinator, timestep driver.

pub mod assignment;
pub mod auth;
pub mod cargo;
pub mod driver;
pub mod priority;

pub use driver::{run_tick, AuthWriter, HarborContext, SolverPool};
