// Value objects - small, type-safe identifiers used across the domain layer.

use std::fmt;

/// Stable identity of a ship as assigned by the driver. A ship is uniquely
/// identified by `(ShipId, Direction)`, not by `ShipId` alone — the same id
/// may reappear with the opposite direction as a distinct ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShipId(pub i32);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ship#{}", self.0)
    }
}

/// Stable identity of a dock, assigned at load time in input-file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockId(pub usize);

impl fmt::Display for DockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dock#{}", self.0)
    }
}

/// Index of a crane within its owning dock's `craneCapacities` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CraneIndex(pub usize);

impl fmt::Display for CraneIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Crane#{}", self.0)
    }
}

/// A ship's travel direction. Only inbound ships may carry `emergency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    /// Decode the wire representation (`+1` inbound, `-1` outbound).
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            1 => Some(Direction::Inbound),
            -1 => Some(Direction::Outbound),
            _ => None,
        }
    }

    pub fn to_wire(self) -> i32 {
        match self {
            Direction::Inbound => 1,
            Direction::Outbound => -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "inbound"),
            Direction::Outbound => write!(f, "outbound"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ship_id_display() {
        assert_eq!(ShipId(42).to_string(), "Ship#42");
    }

    #[test]
    fn ship_identity_is_id_and_direction() {
        let a = (ShipId(7), Direction::Inbound);
        let b = (ShipId(7), Direction::Outbound);
        assert_ne!(a, b);
    }

    #[test]
    fn direction_wire_round_trip() {
        assert_eq!(Direction::from_wire(1), Some(Direction::Inbound));
        assert_eq!(Direction::from_wire(-1), Some(Direction::Outbound));
        assert_eq!(Direction::from_wire(0), None);
        assert_eq!(Direction::Inbound.to_wire(), 1);
        assert_eq!(Direction::Outbound.to_wire(), -1);
    }
}
