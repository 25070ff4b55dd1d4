use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use harbor_core::cli::Cli;
use harbor_core::domain::value_objects::{Direction, DockId, ShipId};
use harbor_core::domain::{DockRegistry, ShipRequest};
use harbor_core::infrastructure::ipc::{
    MainChannel, MessageQueue, SharedMemorySegment, SolverChannel, SysvMainChannel,
    SysvSolverChannel,
};
use harbor_core::infrastructure::messages::{
    read_fixed_str, write_fixed_str, MainSharedMemoryWire, ShipRequestWire, MAX_AUTH_STRING_LEN,
};
use harbor_core::infrastructure::HarborConfig;
use harbor_core::scheduling::{run_tick, AuthWriter, HarborContext, SolverPool};

fn main() -> Result<()> {
    harbor_core::logging::init();

    let cli = Cli::parse();
    if let Err(err) = run(cli.testcase) {
        error!(%err, "harbor core exiting with error");
        return Err(err);
    }
    Ok(())
}

fn run(testcase: u32) -> Result<()> {
    let config = HarborConfig::load(testcase).context("loading testcase input file")?;

    let shm = SharedMemorySegment::attach(config.shm_key, std::mem::size_of::<MainSharedMemoryWire>())
        .context("attaching shared memory segment")?;
    let mut main_channel =
        SysvMainChannel::new(MessageQueue::open(config.main_queue_key).context("opening main queue")?);

    let docks = DockRegistry::from_specs(config.docks.clone());
    let mut ctx = HarborContext::new(docks);

    let mut solver_pool = RealSolverPool {
        keys: config.solver_queue_keys.clone(),
    };
    let mut auth_writer = RealAuthWriter { shm: &shm };
    let num_solvers = config.solver_queue_keys.len();

    info!(testcase, num_solvers, num_docks = config.docks.len(), "harbor core started");

    loop {
        let tick = main_channel.recv_tick().context("receiving tick message")?;
        let new_requests = read_new_requests(&shm, tick.num_ship_requests as usize);

        let keep_going = run_tick(
            &mut ctx,
            &mut main_channel,
            &mut solver_pool,
            &mut auth_writer,
            num_solvers,
            new_requests,
            tick.timestep,
            tick.is_finished,
        )
        .context("running timestep")?;

        if !keep_going {
            break;
        }
    }

    info!("harbor core finished cleanly");
    Ok(())
}

/// Reads the first `count` records of `shmPtr->newShipRequests` and
/// converts them into domain `ShipRequest`s, skipping any with an
/// unrecognized direction code.
fn read_new_requests(shm: &SharedMemorySegment, count: usize) -> Vec<ShipRequest> {
    // SAFETY: the segment was sized to `MainSharedMemoryWire` on attach,
    // and the driver writes at most `MAX_NEW_REQUESTS` records before
    // signalling `count` in the tick message.
    let shared = unsafe { &*(shm.as_ptr() as *const MainSharedMemoryWire) };

    shared
        .new_ship_requests
        .iter()
        .take(count)
        .filter_map(wire_to_request)
        .collect()
}

fn wire_to_request(wire: &ShipRequestWire) -> Option<ShipRequest> {
    let direction = Direction::from_wire(wire.direction)?;
    let num_cargo = wire.num_cargo.max(0) as usize;
    Some(ShipRequest {
        ship_id: ShipId(wire.ship_id),
        direction,
        category: wire.category,
        emergency: wire.emergency != 0,
        arrival_timestep: wire.timestep,
        waiting_time: wire.waiting_time,
        cargo_weights: wire.cargo[..num_cargo.min(wire.cargo.len())].to_vec(),
    })
}

/// Opens one `SysvSolverChannel` per configured solver key on demand —
/// cheap, since `msgget` on an already-created queue just returns its id.
struct RealSolverPool {
    keys: Vec<i32>,
}

impl SolverPool for RealSolverPool {
    fn open_channels(&mut self, num_solvers: usize) -> Vec<Box<dyn SolverChannel>> {
        self.keys
            .iter()
            .take(num_solvers)
            .filter_map(|&key| MessageQueue::open(key).ok())
            .map(|queue| Box::new(SysvSolverChannel::new(queue)) as Box<dyn SolverChannel>)
            .collect()
    }
}

/// Writes a winning auth string directly into the attached shared-memory
/// segment's `authStrings[dockId]` slot.
struct RealAuthWriter<'a> {
    shm: &'a SharedMemorySegment,
}

impl AuthWriter for RealAuthWriter<'_> {
    fn write(&mut self, dock_id: DockId, value: &str) {
        // SAFETY: the core is the sole writer of `authStrings`, and only
        // writes once all solver threads for this dock have quiesced
        // (spec §5, "shared resources").
        let shared = unsafe { &mut *(self.shm.as_ptr() as *mut MainSharedMemoryWire) };
        if let Some(slot) = shared.auth_strings.get_mut(dock_id.0) {
            let mut buf = [0u8; MAX_AUTH_STRING_LEN];
            write_fixed_str(&mut buf, value);
            *slot = buf;
        }
    }
}

#[allow(dead_code)]
fn _read_auth_slot(shared: &MainSharedMemoryWire, dock_id: DockId) -> String {
    read_fixed_str(&shared.auth_strings[dock_id.0])
}
