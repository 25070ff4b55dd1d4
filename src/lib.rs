// Harbor scheduling core - coordinates a container-port simulation over
// System V shared memory and message queues.
// Architecture: layered (domain -> scheduling -> infrastructure), the same
// shape the teacher crate uses (domain -> application -> infrastructure).

pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod scheduling;

pub use error::CoreError;
