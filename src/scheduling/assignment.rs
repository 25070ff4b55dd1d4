//! Assignment engine (spec §4.E): emergency pass + general pass, each
//! tick choosing the best dock per ship.

use tracing::debug;

use crate::domain::{DockRegistry, FleetRegistry};
use crate::error::CoreError;
use crate::infrastructure::ipc::MainChannel;

use super::priority;

/// Iterate unserviced, undocked, inbound, emergency ships in registry
/// order; dock each immediately if a dock is available. Never skipped
/// because of deadline. Returns whether any emergency ship was docked
/// (the driver re-sorts when this is true).
pub fn run_emergency_pass(
    fleet: &mut FleetRegistry,
    docks: &mut DockRegistry,
    channel: &mut dyn MainChannel,
    current_timestep: i32,
) -> Result<bool, CoreError> {
    let mut any_docked = false;
    for idx in fleet.waiting_indices() {
        let ship = fleet.get(idx);
        if !ship.emergency || !matches!(ship.direction, crate::domain::Direction::Inbound) {
            continue;
        }
        if let Some(dock_idx) = docks.best_dock_for(ship) {
            dock_ship(fleet, docks, channel, idx, dock_idx, current_timestep)?;
            any_docked = true;
        }
    }
    Ok(any_docked)
}

/// Sort unserviced ships by the priority policy; dock each in order,
/// skipping non-emergency inbound ships that have missed their deadline.
pub fn run_general_pass(
    fleet: &mut FleetRegistry,
    docks: &mut DockRegistry,
    channel: &mut dyn MainChannel,
    current_timestep: i32,
) -> Result<(), CoreError> {
    let order = fleet.sorted_indices_by(priority::compare);
    for idx in order {
        let ship = fleet.get(idx);
        if !ship.is_waiting() {
            continue;
        }
        if ship.missed_deadline(current_timestep) {
            debug!(ship = %ship.id, deadline = ship.deadline, timestep = current_timestep, "deadline missed, skipping this tick");
            continue;
        }
        if let Some(dock_idx) = docks.best_dock_for(ship) {
            dock_ship(fleet, docks, channel, idx, dock_idx, current_timestep)?;
        }
    }
    Ok(())
}

fn dock_ship(
    fleet: &mut FleetRegistry,
    docks: &mut DockRegistry,
    channel: &mut dyn MainChannel,
    ship_idx: usize,
    dock_idx: usize,
    current_timestep: i32,
) -> Result<(), CoreError> {
    let ship = fleet.get(ship_idx).clone();
    let dock_id = docks.dock(dock_idx).id;
    channel.send_dock(ship.id, ship.direction, dock_id)?;
    docks.occupy(dock_idx, &ship, current_timestep);
    fleet.get_mut(ship_idx).dock(dock_id);
    Ok(())
}
