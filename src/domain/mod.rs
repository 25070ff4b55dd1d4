// Domain layer - pure business logic, no IPC or external dependencies.

pub mod dockyard;
pub mod entities;
pub mod fleet;
pub mod keyspace;
pub mod value_objects;

pub use dockyard::{DockRegistry, DockSpec};
pub use entities::{CraneUsage, Dock, DockOccupancy, Ship, ShipStatus};
pub use fleet::{FleetRegistry, ShipRequest};
pub use keyspace::AuthKeyspace;
pub use value_objects::{CraneIndex, Direction, DockId, ShipId};
