//! Crate-wide typed error. Library code returns `CoreError`; the binary
//! wraps it with `anyhow::Context` at each fallible boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IPC setup failed: {0}")]
    IpcSetup(String),

    #[error("main queue I/O failed: {0}")]
    MainQueueIo(String),

    #[error("solver queue {index} I/O failed")]
    SolverQueueIo { index: usize },

    #[error("allocation failed: {0}")]
    Allocation(String),

    #[error("invalid config: {0}")]
    Config(String),
}
