// Infrastructure layer - technical concerns: raw IPC, wire format, config.

pub mod config;
pub mod ipc;
pub mod messages;

pub use config::HarborConfig;
pub use ipc::{MainChannel, SolverChannel, TickMessage};
