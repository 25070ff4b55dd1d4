//! Domain entities: `Ship` and `Dock`.

use super::value_objects::{CraneIndex, Direction, DockId, ShipId};

/// A ship's lifecycle status. `Docked` carries the dock it occupies so a
/// `Ship` never needs its own copy of `dockId` — the dock is the single
/// authoritative side of the relationship (see DESIGN.md, "cyclic
/// ship↔dock reference").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipStatus {
    Waiting,
    Docked(DockId),
    Serviced,
}

/// Ship entity. Identity is `(id, direction)`. Once admitted, a ship is
/// never removed from the fleet registry — `serviced` is the retention
/// marker (invariant 1).
#[derive(Debug, Clone)]
pub struct Ship {
    pub id: ShipId,
    pub direction: Direction,
    pub category: i32,
    pub emergency: bool,
    pub arrival_timestep: i32,
    pub waiting_time: i32,
    pub cargo_weights: Vec<i32>,
    pub remaining_cargo: i32,
    pub deadline: i64,
    pub status: ShipStatus,
}

impl Ship {
    pub fn new(
        id: ShipId,
        direction: Direction,
        category: i32,
        emergency: bool,
        arrival_timestep: i32,
        waiting_time: i32,
        cargo_weights: Vec<i32>,
    ) -> Self {
        let remaining_cargo = cargo_weights.len() as i32;
        let deadline = if matches!(direction, Direction::Inbound) && !emergency {
            (arrival_timestep as i64) + (waiting_time as i64)
        } else {
            i64::MAX
        };

        Self {
            id,
            direction,
            category,
            emergency,
            arrival_timestep,
            waiting_time,
            cargo_weights,
            remaining_cargo,
            deadline,
            status: ShipStatus::Waiting,
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self.status, ShipStatus::Waiting)
    }

    pub fn is_docked(&self) -> bool {
        matches!(self.status, ShipStatus::Docked(_))
    }

    pub fn is_serviced(&self) -> bool {
        matches!(self.status, ShipStatus::Serviced)
    }

    pub fn docked_at(&self) -> Option<DockId> {
        match self.status {
            ShipStatus::Docked(dock) => Some(dock),
            _ => None,
        }
    }

    pub fn dock(&mut self, dock_id: DockId) {
        self.status = ShipStatus::Docked(dock_id);
    }

    pub fn mark_serviced(&mut self) {
        self.status = ShipStatus::Serviced;
    }

    pub fn missed_deadline(&self, current_timestep: i32) -> bool {
        matches!(self.direction, Direction::Inbound)
            && !self.emergency
            && (current_timestep as i64) > self.deadline
    }

    pub fn decrement_remaining_cargo(&mut self) {
        self.remaining_cargo = self.remaining_cargo.saturating_sub(1);
    }
}

/// Transient state of an occupied dock. Authoritative reference to the
/// docked ship — the ship side only stores `ShipStatus::Docked(dock_id)`.
#[derive(Debug, Clone)]
pub struct DockOccupancy {
    pub ship_id: ShipId,
    pub direction: Direction,
    pub docking_timestep: i32,
    pub last_cargo_moved_timestep: Option<i32>,
    pub remaining_cargo: i32,
    /// Parallel to the ship's `cargo_weights`; a zero slot means "moved".
    pub remaining_cargo_weights: Vec<i32>,
}

/// Dock entity. Exists for the program lifetime; `occupancy` is populated
/// while a ship is docked and cleared on release.
#[derive(Debug, Clone)]
pub struct Dock {
    pub id: DockId,
    pub category: i32,
    pub crane_capacities: Vec<i32>,
    pub occupancy: Option<DockOccupancy>,
}

impl Dock {
    pub fn new(id: DockId, crane_capacities: Vec<i32>) -> Self {
        let category = crane_capacities.len() as i32;
        Self {
            id,
            category,
            crane_capacities,
            occupancy: None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupancy.is_some()
    }

    /// Occupy this dock with `ship`. Asserts `category >= ship.category`
    /// (assignment invariant 4).
    pub fn occupy(&mut self, ship: &Ship, current_timestep: i32) {
        assert!(
            self.category >= ship.category,
            "dock {} (category {}) cannot host ship {} (category {})",
            self.id,
            self.category,
            ship.id,
            ship.category
        );
        self.occupancy = Some(DockOccupancy {
            ship_id: ship.id,
            direction: ship.direction,
            docking_timestep: current_timestep,
            last_cargo_moved_timestep: None,
            remaining_cargo: ship.cargo_weights.len() as i32,
            remaining_cargo_weights: ship.cargo_weights.clone(),
        });
    }

    pub fn release(&mut self) {
        self.occupancy = None;
    }

    pub fn auth_length(&self) -> Option<i32> {
        let occ = self.occupancy.as_ref()?;
        let last_move = occ.last_cargo_moved_timestep?;
        Some(last_move - occ.docking_timestep)
    }
}

/// Per-tick crane-usage bitmap for a single dock. Reset at the start of
/// every tick (spec §3: "usage is tracked by a per-tick bitmap").
#[derive(Debug, Clone, Default)]
pub struct CraneUsage {
    used: Vec<bool>,
}

impl CraneUsage {
    pub fn for_category(category: usize) -> Self {
        Self {
            used: vec![false; category],
        }
    }

    pub fn is_used(&self, crane: CraneIndex) -> bool {
        self.used.get(crane.0).copied().unwrap_or(true)
    }

    pub fn mark_used(&mut self, crane: CraneIndex) {
        if let Some(slot) = self.used.get_mut(crane.0) {
            *slot = true;
        }
    }

    pub fn reset(&mut self) {
        self.used.iter_mut().for_each(|slot| *slot = false);
    }

    pub fn snapshot(&self) -> Vec<bool> {
        self.used.clone()
    }
}
