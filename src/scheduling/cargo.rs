//! Cargo scheduler (spec §4.F): per-dock, per-timestep crane→cargo
//! matching.

use crate::domain::value_objects::CraneIndex;
use crate::domain::DockRegistry;
use crate::error::CoreError;
use crate::infrastructure::ipc::MainChannel;

/// Attempt exactly one cargo move on dock `dock_idx`. Returns whether a
/// move was made. Callers loop this until it returns `false` to drain
/// every move possible this tick.
pub fn try_move_one(
    docks: &mut DockRegistry,
    channel: &mut dyn MainChannel,
    dock_idx: usize,
    current_timestep: i32,
) -> Result<bool, CoreError> {
    let dock_id = docks.dock(dock_idx).id;

    let (remaining_weights, direction, ship_id) = {
        let dock = docks.dock(dock_idx);
        let Some(occ) = dock.occupancy.as_ref() else {
            return Ok(false);
        };
        if occ.remaining_cargo == 0 {
            return Ok(false);
        }
        if occ.docking_timestep == current_timestep {
            return Ok(false);
        }
        (
            occ.remaining_cargo_weights.clone(),
            occ.direction,
            occ.ship_id,
        )
    };

    let crane_capacities = docks.dock(dock_idx).crane_capacities.clone();
    let usage = docks.crane_usage(dock_idx).snapshot();

    let mut best: Option<(usize, i32, i32)> = None; // (cargo_id, crane_idx, slack)
    for (cargo_id, &weight) in remaining_weights.iter().enumerate() {
        if weight <= 0 {
            continue;
        }
        let mut picked: Option<(usize, i32)> = None; // (crane_idx, slack)
        for (crane_idx, &capacity) in crane_capacities.iter().enumerate() {
            if usage[crane_idx] {
                continue;
            }
            if capacity >= weight {
                let slack = capacity - weight;
                match picked {
                    Some((_, best_slack)) if slack >= best_slack => {}
                    _ => picked = Some((crane_idx, slack)),
                }
            }
        }
        if let Some((crane_idx, slack)) = picked {
            best = Some((cargo_id, crane_idx, slack));
            break;
        }
    }

    let Some((cargo_id, crane_idx, _)) = best else {
        return Ok(false);
    };

    channel.send_cargo_move(ship_id, direction, dock_id, cargo_id as i32, crane_idx as i32)?;

    docks
        .crane_usage_mut(dock_idx)
        .mark_used(CraneIndex(crane_idx));
    let occ = docks.dock_mut(dock_idx).occupancy.as_mut().unwrap();
    occ.remaining_cargo_weights[cargo_id] = 0;
    occ.remaining_cargo -= 1;
    occ.last_cargo_moved_timestep = Some(current_timestep);

    Ok(true)
}

/// Keep moving cargo from `dock_idx` until no further move is possible
/// this tick, as required by spec §4.H.
pub fn drain_dock(
    docks: &mut DockRegistry,
    channel: &mut dyn MainChannel,
    dock_idx: usize,
    current_timestep: i32,
) -> Result<(), CoreError> {
    while try_move_one(docks, channel, dock_idx, current_timestep)? {}
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Direction, DockId, ShipId};
    use crate::domain::{DockSpec, Ship};
    use crate::infrastructure::ipc::tests::RecordingChannel;

    fn docks_with(caps: Vec<i32>, cargo: Vec<i32>) -> DockRegistry {
        let mut docks = DockRegistry::from_specs(vec![DockSpec {
            category: caps.len() as i32,
            crane_capacities: caps,
        }]);
        let ship = Ship::new(ShipId(1), Direction::Inbound, 1, false, 0, 10, cargo);
        docks.occupy(0, &ship, 0);
        docks
    }

    #[test]
    fn tightest_fit_crane_selected() {
        let mut docks = docks_with(vec![10, 5, 7], vec![6]);
        let mut channel = RecordingChannel::default();

        let moved = try_move_one(&mut docks, &mut channel, 0, 1).unwrap();
        assert!(moved);
        assert_eq!(channel.cargo_moves.len(), 1);
        let (_, _, dock_id, cargo_id, crane_id) = channel.cargo_moves[0];
        assert_eq!(dock_id, DockId(0));
        assert_eq!(cargo_id, 0);
        assert_eq!(crane_id, 2, "capacity 7 has the smallest slack (1) over weight 6");
    }

    #[test]
    fn no_move_on_docking_tick() {
        let mut docks = docks_with(vec![10], vec![5]);
        let mut channel = RecordingChannel::default();
        let moved = try_move_one(&mut docks, &mut channel, 0, 0).unwrap();
        assert!(!moved);
    }

    #[test]
    fn no_crane_fits_then_nothing_moves() {
        let mut docks = docks_with(vec![3], vec![6]);
        let mut channel = RecordingChannel::default();
        let moved = try_move_one(&mut docks, &mut channel, 0, 1).unwrap();
        assert!(!moved);
    }

    #[test]
    fn drain_dock_moves_all_cargo_over_repeated_calls() {
        let mut docks = docks_with(vec![10, 10], vec![6, 8]);
        let mut channel = RecordingChannel::default();
        drain_dock(&mut docks, &mut channel, 0, 1).unwrap();
        assert_eq!(channel.cargo_moves.len(), 2);
        assert_eq!(docks.dock(0).occupancy.as_ref().unwrap().remaining_cargo, 0);
    }

    #[test]
    fn crane_used_once_per_tick() {
        let mut docks = docks_with(vec![10], vec![5, 5]);
        let mut channel = RecordingChannel::default();
        assert!(try_move_one(&mut docks, &mut channel, 0, 1).unwrap());
        assert!(!try_move_one(&mut docks, &mut channel, 0, 1).unwrap(), "crane already used this tick");
    }
}
