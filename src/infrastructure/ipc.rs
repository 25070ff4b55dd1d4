//! Safe wrappers over System V shared memory and message queues, plus the
//! `MainChannel`/`SolverChannel` traits the scheduling layer programs
//! against. Keeping the scheduling core behind a trait (rather than
//! calling `libc` directly) is the same dependency-inversion shape the
//! teacher uses for its event store: production code gets the real
//! syscall-backed implementation, tests get an in-memory recorder.

use std::ffi::c_void;
use std::ptr;

use tracing::warn;

use crate::domain::value_objects::{Direction, DockId, ShipId};
use crate::error::CoreError;
use crate::infrastructure::messages::{
    mtype, read_fixed_str, solver_mtype, write_fixed_str, GuessOutcome, MessageWire,
    SolverRequestWire, SolverResponseWire, MAX_AUTH_STRING_LEN, SOLVER_RESPONSE_MTYPE,
};

/// The core's view of the main message queue: send the four outbound
/// message kinds (dock, cargo-move, undock, tick-complete) and receive
/// tick messages. Implemented for real IPC by `SysvMainChannel`.
pub trait MainChannel: Send {
    fn recv_tick(&mut self) -> Result<TickMessage, CoreError>;
    fn send_dock(&mut self, ship_id: ShipId, direction: Direction, dock_id: DockId) -> Result<(), CoreError>;
    fn send_cargo_move(
        &mut self,
        ship_id: ShipId,
        direction: Direction,
        dock_id: DockId,
        cargo_id: i32,
        crane_id: i32,
    ) -> Result<(), CoreError>;
    fn send_undock(&mut self, ship_id: ShipId, direction: Direction, dock_id: DockId) -> Result<(), CoreError>;
    fn send_tick_complete(&mut self) -> Result<(), CoreError>;
}

/// A tick-start message (mtype=1) from the driver.
#[derive(Debug, Clone, Copy)]
pub struct TickMessage {
    pub timestep: i32,
    pub num_ship_requests: i32,
    pub is_finished: bool,
}

/// One worker's private channel to its solver process.
pub trait SolverChannel: Send {
    fn set_dock(&mut self, dock_id: DockId) -> Result<(), CoreError>;
    fn guess(&mut self, candidate: &str) -> Result<GuessOutcome, CoreError>;
}

// ---------------------------------------------------------------------
// Real System V implementation
// ---------------------------------------------------------------------

/// Shared-memory segment attached over `shmget`/`shmat`. Detached on drop.
pub struct SharedMemorySegment {
    id: i32,
    ptr: *mut c_void,
    size: usize,
}

// SAFETY: the segment is only ever accessed from the single main thread
// that owns a `SharedMemorySegment`; no internal mutability is exposed
// across threads.
unsafe impl Send for SharedMemorySegment {}

impl SharedMemorySegment {
    pub fn attach(key: i32, size: usize) -> Result<Self, CoreError> {
        // SAFETY: thin wrapper around the shmget/shmat syscalls; the
        // returned pointer is only dereferenced through the typed
        // accessor below, which bounds every offset to `size`.
        unsafe {
            let id = libc::shmget(key, size, 0o666);
            if id == -1 {
                return Err(CoreError::IpcSetup("shmget failed".into()));
            }
            let ptr = libc::shmat(id, ptr::null(), 0);
            if ptr as isize == -1 {
                return Err(CoreError::IpcSetup("shmat failed".into()));
            }
            Ok(Self { id, ptr, size })
        }
    }

    /// Raw pointer to the attached segment, valid for `size` bytes.
    pub fn as_ptr(&self) -> *mut c_void {
        self.ptr
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn shm_id(&self) -> i32 {
        self.id
    }
}

impl Drop for SharedMemorySegment {
    fn drop(&mut self) {
        // SAFETY: detaching a previously-attached segment exactly once.
        unsafe {
            if libc::shmdt(self.ptr) == -1 {
                warn!("shmdt failed during shared memory teardown");
            }
        }
    }
}

/// A System V message queue opened over `msgget`.
pub struct MessageQueue {
    id: i32,
}

// SAFETY: each `MessageQueue` is owned by exactly one thread at a time in
// this crate's usage (main thread for the main queue, one worker thread
// per solver queue); the underlying fd is safe to use from any single
// thread.
unsafe impl Send for MessageQueue {}

impl MessageQueue {
    pub fn open(key: i32) -> Result<Self, CoreError> {
        // SAFETY: thin wrapper around msgget.
        let id = unsafe { libc::msgget(key, 0o666) };
        if id == -1 {
            return Err(CoreError::IpcSetup("msgget failed".into()));
        }
        Ok(Self { id })
    }

    fn send<T>(&self, msg: &T) -> Result<(), CoreError> {
        // `msgsnd` expects the payload beginning with a `long mtype`
        // field, exactly as `T`'s `#[repr(C)]` layout guarantees here.
        let size = std::mem::size_of::<T>() - std::mem::size_of::<i64>();
        // SAFETY: `msg` is `#[repr(C)]` with `mtype: i64` as its first
        // field, matching the layout msgsnd expects; `size` excludes
        // that field per the msgsnd contract.
        let rc = unsafe {
            libc::msgsnd(
                self.id,
                msg as *const T as *const c_void,
                size,
                0,
            )
        };
        if rc == -1 {
            return Err(CoreError::MainQueueIo("msgsnd failed".into()));
        }
        Ok(())
    }

    fn recv<T: Default>(&self, want_mtype: i64) -> Result<T, CoreError> {
        let mut buf = T::default();
        let size = std::mem::size_of::<T>() - std::mem::size_of::<i64>();
        // SAFETY: see `send`; `buf` is a valid, owned `T` receiving the
        // message body in place.
        let rc = unsafe {
            libc::msgrcv(
                self.id,
                &mut buf as *mut T as *mut c_void,
                size,
                want_mtype,
                0,
            )
        };
        if rc == -1 {
            return Err(CoreError::MainQueueIo("msgrcv failed".into()));
        }
        Ok(buf)
    }
}

impl Default for MessageWire {
    fn default() -> Self {
        Self {
            mtype: 0,
            timestep: 0,
            ship_id: 0,
            direction: 0,
            dock_id: 0,
            cargo_id: 0,
            is_finished: 0,
            payload: 0,
        }
    }
}

impl Default for SolverResponseWire {
    fn default() -> Self {
        Self {
            mtype: 0,
            guess_is_correct: 0,
        }
    }
}

/// Real `MainChannel` backed by a System V message queue.
pub struct SysvMainChannel {
    queue: MessageQueue,
}

impl SysvMainChannel {
    pub fn new(queue: MessageQueue) -> Self {
        Self { queue }
    }
}

impl MainChannel for SysvMainChannel {
    fn recv_tick(&mut self) -> Result<TickMessage, CoreError> {
        let msg: MessageWire = self.queue.recv(mtype::TICK)?;
        Ok(TickMessage {
            timestep: msg.timestep,
            num_ship_requests: msg.payload,
            is_finished: msg.is_finished != 0,
        })
    }

    fn send_dock(&mut self, ship_id: ShipId, direction: Direction, dock_id: DockId) -> Result<(), CoreError> {
        let msg = MessageWire {
            mtype: mtype::DOCK,
            timestep: 0,
            ship_id: ship_id.0,
            direction: direction.to_wire(),
            dock_id: dock_id.0 as i32,
            cargo_id: 0,
            is_finished: 0,
            payload: 0,
        };
        self.queue.send(&msg)
    }

    fn send_cargo_move(
        &mut self,
        ship_id: ShipId,
        direction: Direction,
        dock_id: DockId,
        cargo_id: i32,
        crane_id: i32,
    ) -> Result<(), CoreError> {
        let msg = MessageWire {
            mtype: mtype::CARGO_MOVE,
            timestep: 0,
            ship_id: ship_id.0,
            direction: direction.to_wire(),
            dock_id: dock_id.0 as i32,
            cargo_id,
            is_finished: 0,
            payload: crane_id,
        };
        self.queue.send(&msg)
    }

    fn send_undock(&mut self, ship_id: ShipId, direction: Direction, dock_id: DockId) -> Result<(), CoreError> {
        let msg = MessageWire {
            mtype: mtype::UNDOCK,
            timestep: 0,
            ship_id: ship_id.0,
            direction: direction.to_wire(),
            dock_id: dock_id.0 as i32,
            cargo_id: 0,
            is_finished: 0,
            payload: 0,
        };
        self.queue.send(&msg)
    }

    fn send_tick_complete(&mut self) -> Result<(), CoreError> {
        let msg = MessageWire {
            mtype: mtype::TICK_COMPLETE,
            ..Default::default()
        };
        self.queue.send(&msg)
    }
}

/// Real `SolverChannel` backed by one worker's System V message queue.
pub struct SysvSolverChannel {
    queue: MessageQueue,
}

impl SysvSolverChannel {
    pub fn new(queue: MessageQueue) -> Self {
        Self { queue }
    }
}

impl SolverChannel for SysvSolverChannel {
    fn set_dock(&mut self, dock_id: DockId) -> Result<(), CoreError> {
        let req = SolverRequestWire {
            mtype: solver_mtype::SET_DOCK,
            dock_id: dock_id.0 as i32,
            auth_string_guess: [0u8; MAX_AUTH_STRING_LEN],
        };
        self.queue
            .send(&req)
            .map_err(|_| CoreError::SolverQueueIo { index: 0 })
    }

    fn guess(&mut self, candidate: &str) -> Result<GuessOutcome, CoreError> {
        let mut buf = [0u8; MAX_AUTH_STRING_LEN];
        write_fixed_str(&mut buf, candidate);
        let req = SolverRequestWire {
            mtype: solver_mtype::GUESS,
            dock_id: 0,
            auth_string_guess: buf,
        };
        self.queue
            .send(&req)
            .map_err(|_| CoreError::SolverQueueIo { index: 0 })?;

        let resp: SolverResponseWire = self
            .queue
            .recv(SOLVER_RESPONSE_MTYPE)
            .map_err(|_| CoreError::SolverQueueIo { index: 0 })?;

        GuessOutcome::from_wire(resp.guess_is_correct)
            .ok_or(CoreError::SolverQueueIo { index: 0 })
    }
}

// Silence "unused" for the read helper when only used in test doubles /
// future diagnostics; it documents the symmetric decode of `write_fixed_str`.
#[allow(dead_code)]
fn _use_read_fixed_str(buf: &[u8; MAX_AUTH_STRING_LEN]) -> String {
    read_fixed_str(buf)
}

// ---------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------
