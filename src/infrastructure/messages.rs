//! Wire structs mirroring the original C layouts byte-for-byte, so the
//! shared-memory segment and message queues stay binary compatible with
//! the driver and solver processes. Field order matches
//! `original_source/scheduler.c`'s struct definitions exactly.

pub const MAX_DOCKS: usize = 30;
pub const MAX_CARGO_COUNT: usize = 200;
pub const MAX_AUTH_STRING_LEN: usize = 100;
pub const MAX_NEW_REQUESTS: usize = 100;
pub const MAX_SHIPS: usize = 1100;
pub const MAX_SOLVERS: usize = 8;
pub const MAX_CRANES: usize = 25;

/// Mirrors `ShipRequest` in the original source.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ShipRequestWire {
    pub ship_id: i32,
    pub timestep: i32,
    pub category: i32,
    pub direction: i32,
    pub emergency: i32,
    pub waiting_time: i32,
    pub num_cargo: i32,
    pub cargo: [i32; MAX_CARGO_COUNT],
}

impl Default for ShipRequestWire {
    fn default() -> Self {
        Self {
            ship_id: 0,
            timestep: 0,
            category: 0,
            direction: 0,
            emergency: 0,
            waiting_time: 0,
            num_cargo: 0,
            cargo: [0; MAX_CARGO_COUNT],
        }
    }
}

/// Mirrors `MainSharedMemory`. The full shared-memory segment attached
/// over `shmget`/`shmat`.
#[repr(C)]
pub struct MainSharedMemoryWire {
    pub auth_strings: [[u8; MAX_AUTH_STRING_LEN]; MAX_DOCKS],
    pub new_ship_requests: [ShipRequestWire; MAX_NEW_REQUESTS],
}

/// Mirrors `MessageStruct` on the main queue. `payload` is the C union of
/// `numShipRequests` (tick messages) / `craneId` (cargo-move messages).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct MessageWire {
    pub mtype: i64,
    pub timestep: i32,
    pub ship_id: i32,
    pub direction: i32,
    pub dock_id: i32,
    pub cargo_id: i32,
    pub is_finished: i32,
    pub payload: i32,
}

pub mod mtype {
    pub const TICK: i64 = 1;
    pub const DOCK: i64 = 2;
    pub const UNDOCK: i64 = 3;
    pub const CARGO_MOVE: i64 = 4;
    pub const TICK_COMPLETE: i64 = 5;
}

/// Mirrors `SolverRequest`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SolverRequestWire {
    pub mtype: i64,
    pub dock_id: i32,
    pub auth_string_guess: [u8; MAX_AUTH_STRING_LEN],
}

pub mod solver_mtype {
    pub const SET_DOCK: i64 = 1;
    pub const GUESS: i64 = 2;
}

/// Mirrors `SolverResponse`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct SolverResponseWire {
    pub mtype: i64,
    pub guess_is_correct: i32,
}

pub const SOLVER_RESPONSE_MTYPE: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    Correct,
    Wrong,
    Abort,
}

impl GuessOutcome {
    pub fn from_wire(value: i32) -> Option<Self> {
        match value {
            1 => Some(GuessOutcome::Correct),
            0 => Some(GuessOutcome::Wrong),
            -1 => Some(GuessOutcome::Abort),
            _ => None,
        }
    }
}

/// Copies a Rust `&str` into a fixed, null-terminated byte buffer for the
/// wire format. Truncates rather than panics — callers only ever pass
/// generated auth strings well under `MAX_AUTH_STRING_LEN`.
pub fn write_fixed_str<const N: usize>(buf: &mut [u8; N], s: &str) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(N - 1);
    buf[..n].copy_from_slice(&bytes[..n]);
    buf[n] = 0;
}

pub fn read_fixed_str<const N: usize>(buf: &[u8; N]) -> String {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(N);
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_str_round_trips() {
        let mut buf = [0u8; 16];
        write_fixed_str(&mut buf, "567.9");
        assert_eq!(read_fixed_str(&buf), "567.9");
    }

    #[test]
    fn guess_outcome_decodes() {
        assert_eq!(GuessOutcome::from_wire(1), Some(GuessOutcome::Correct));
        assert_eq!(GuessOutcome::from_wire(0), Some(GuessOutcome::Wrong));
        assert_eq!(GuessOutcome::from_wire(-1), Some(GuessOutcome::Abort));
        assert_eq!(GuessOutcome::from_wire(7), None);
    }
}
