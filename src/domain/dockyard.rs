//! Dock registry: dock occupancy, crane inventory, and per-dock cargo
//! state.

use tracing::info;

use super::entities::{CraneUsage, Dock, Ship};
use super::value_objects::DockId;

/// Static dock configuration read from the input file.
#[derive(Debug, Clone)]
pub struct DockSpec {
    pub category: i32,
    pub crane_capacities: Vec<i32>,
}

/// Maintains dock occupancy, crane inventory, and per-dock cargo state.
#[derive(Debug)]
pub struct DockRegistry {
    docks: Vec<Dock>,
    crane_usage: Vec<CraneUsage>,
}

impl DockRegistry {
    pub fn from_specs(specs: Vec<DockSpec>) -> Self {
        let docks: Vec<Dock> = specs
            .into_iter()
            .enumerate()
            .map(|(id, spec)| Dock::new(DockId(id), spec.crane_capacities))
            .collect();
        let crane_usage = docks
            .iter()
            .map(|d| CraneUsage::for_category(d.category as usize))
            .collect();
        Self { docks, crane_usage }
    }

    pub fn len(&self) -> usize {
        self.docks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docks.is_empty()
    }

    pub fn dock(&self, index: usize) -> &Dock {
        &self.docks[index]
    }

    pub fn dock_mut(&mut self, index: usize) -> &mut Dock {
        &mut self.docks[index]
    }

    pub fn crane_usage(&self, index: usize) -> &CraneUsage {
        &self.crane_usage[index]
    }

    pub fn crane_usage_mut(&mut self, index: usize) -> &mut CraneUsage {
        &mut self.crane_usage[index]
    }

    /// Indices of docks with no current occupant.
    pub fn free_docks(&self) -> Vec<usize> {
        self.docks
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_occupied())
            .map(|(i, _)| i)
            .collect()
    }

    /// The unoccupied dock with the smallest `category >= ship.category`,
    /// tied broken by smallest `dockId` (scan order, since docks are
    /// indexed in ascending id order).
    pub fn best_dock_for(&self, ship: &Ship) -> Option<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (idx, dock) in self.docks.iter().enumerate() {
            if dock.is_occupied() || dock.category < ship.category {
                continue;
            }
            match best {
                Some((_, best_category)) if dock.category >= best_category => {}
                _ => best = Some((idx, dock.category)),
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Occupy dock `index` with `ship`, resetting its crane-usage bitmap
    /// for the current tick (a freshly occupied dock starts with every
    /// crane free).
    pub fn occupy(&mut self, index: usize, ship: &Ship, current_timestep: i32) {
        self.docks[index].occupy(ship, current_timestep);
        self.crane_usage[index].reset();
        info!(dock = %self.docks[index].id, ship = %ship.id, timestep = current_timestep, "ship docked");
    }

    pub fn release(&mut self, index: usize) {
        info!(dock = %self.docks[index].id, "dock released");
        self.docks[index].release();
    }

    pub fn reset_all_crane_usage(&mut self) {
        for usage in &mut self.crane_usage {
            usage.reset();
        }
    }

    pub fn iter_indices(&self) -> std::ops::Range<usize> {
        0..self.docks.len()
    }
}
