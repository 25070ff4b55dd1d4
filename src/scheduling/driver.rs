//! Timestep driver (spec §4.H): orchestrates the keyspace generator,
//! registries, priority policy, assignment engine, cargo scheduler and
//! auth coordinator against the main IPC handshake.

use tracing::{debug, info};

use crate::domain::value_objects::DockId;
use crate::domain::{DockRegistry, FleetRegistry, ShipRequest};
use crate::error::CoreError;
use crate::infrastructure::ipc::{MainChannel, SolverChannel};

use super::{assignment, auth, cargo};

/// Owns the fleet and dock registries plus the current timestep — the
/// single context threaded through the driver loop (spec §9, "global
/// mutable state" resolution). Constructed once at startup.
pub struct HarborContext {
    pub fleet: FleetRegistry,
    pub docks: DockRegistry,
    pub current_timestep: i32,
}

impl HarborContext {
    pub fn new(docks: DockRegistry) -> Self {
        Self {
            fleet: FleetRegistry::new(),
            docks,
            current_timestep: 0,
        }
    }
}

/// Produces one `SolverChannel` per worker for a given dock's auth search.
/// Implemented by the binary's real IPC wiring; a test double is used in
/// the integration tests.
pub trait SolverPool {
    fn open_channels(&mut self, num_solvers: usize) -> Vec<Box<dyn SolverChannel>>;
}

/// Writes a winning auth string into the shared-memory `authStrings`
/// slot for a dock, prior to the undock message being sent (spec §4.G
/// handoff step 1). Kept behind a trait so the scheduling layer never
/// touches the shared-memory segment directly.
pub trait AuthWriter {
    fn write(&mut self, dock_id: DockId, value: &str);
}

/// Run a single timestep: ingest arrivals, assign, move cargo, attempt
/// auth+undock, acknowledge. Returns `true` if the driver should keep
/// running (the tick message did not signal finish). A main-queue send
/// failure is fatal (spec §7, error kind 2) and propagates out.
pub fn run_tick(
    ctx: &mut HarborContext,
    channel: &mut dyn MainChannel,
    solver_pool: &mut dyn SolverPool,
    auth_writer: &mut dyn AuthWriter,
    num_solvers: usize,
    new_requests: Vec<ShipRequest>,
    timestep: i32,
    is_finished: bool,
) -> Result<bool, CoreError> {
    ctx.current_timestep = timestep;
    ctx.docks.reset_all_crane_usage();

    if is_finished {
        info!(timestep, "driver signaled finish");
        return Ok(false);
    }

    for req in new_requests {
        ctx.fleet.admit(req);
    }

    assignment::run_emergency_pass(&mut ctx.fleet, &mut ctx.docks, channel, timestep)?;

    // The assignment attempt itself always runs, or a ship left waiting
    // because docks were full would starve once one frees up on a tick
    // with no new arrival or emergency docking. Only `scheduler.c`'s
    // `qsort` call is gated on new arrivals/emergency dockings, as a perf
    // optimization over an already-sorted list; re-sorting here is cheap
    // and idempotent, so it isn't worth replicating that gate.
    assignment::run_general_pass(&mut ctx.fleet, &mut ctx.docks, channel, timestep)?;

    for dock_idx in ctx.docks.iter_indices() {
        cargo::drain_dock(&mut ctx.docks, channel, dock_idx, timestep)?;
    }

    for dock_idx in ctx.docks.iter_indices() {
        try_undock(
            ctx,
            channel,
            solver_pool,
            auth_writer,
            num_solvers,
            dock_idx,
            timestep,
        )?;
    }

    channel.send_tick_complete()?;
    Ok(true)
}

/// Attempt the authentication search and undock for one dock, matching
/// the preconditions in spec §4.G. A no-op if the dock isn't eligible
/// this tick.
fn try_undock(
    ctx: &mut HarborContext,
    channel: &mut dyn MainChannel,
    solver_pool: &mut dyn SolverPool,
    auth_writer: &mut dyn AuthWriter,
    num_solvers: usize,
    dock_idx: usize,
    current_timestep: i32,
) -> Result<(), CoreError> {
    let dock_id = DockId(dock_idx);

    let eligible = {
        let dock = ctx.docks.dock(dock_idx);
        match &dock.occupancy {
            Some(occ) => {
                occ.remaining_cargo == 0
                    && occ
                        .last_cargo_moved_timestep
                        .is_some_and(|t| t < current_timestep)
            }
            None => false,
        }
    };
    if !eligible {
        return Ok(());
    }

    let length = match ctx.docks.dock(dock_idx).auth_length() {
        Some(l) if (1..=10).contains(&l) => l as usize,
        _ => {
            debug!(dock = %dock_id, "auth length out of range, dock stays occupied");
            return Ok(());
        }
    };

    let channels = solver_pool.open_channels(num_solvers);
    match auth::search(dock_id, length, channels) {
        auth::AuthResult::Found(value) => {
            let (ship_id, direction) = {
                let occ = ctx.docks.dock(dock_idx).occupancy.as_ref().unwrap();
                (occ.ship_id, occ.direction)
            };
            auth_writer.write(dock_id, &value);
            channel.send_undock(ship_id, direction, dock_id)?;
            if let Some(ship) = ctx.fleet.find_by_id_dir_mut(ship_id, direction) {
                ship.mark_serviced();
            }
            ctx.docks.release(dock_idx);
        }
        auth::AuthResult::NotFound => {
            debug!(dock = %dock_id, "auth search failed this tick, retrying next tick");
        }
    }
    Ok(())
}
