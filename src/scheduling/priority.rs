//! Total order over ships used for assignment (spec §4.D).
//!
//! Serviced or already-docked ships sort to the end. Among remaining
//! ships, the first rule below that differentiates two ships decides:
//! 1. higher `emergency` first;
//! 2. among two inbound ships, earlier `deadline` first;
//! 3. inbound before outbound;
//! 4. earlier `arrivalTimestep` first.

use std::cmp::Ordering;

use crate::domain::entities::Ship;
use crate::domain::value_objects::Direction;

pub fn compare(a: &Ship, b: &Ship) -> Ordering {
    let a_out = a.is_serviced() || a.is_docked();
    let b_out = b.is_serviced() || b.is_docked();
    match (a_out, b_out) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    match (a.emergency, b.emergency) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    match (a.direction, b.direction) {
        (Direction::Inbound, Direction::Inbound) => a.deadline.cmp(&b.deadline),
        (Direction::Inbound, Direction::Outbound) => Ordering::Less,
        (Direction::Outbound, Direction::Inbound) => Ordering::Greater,
        (Direction::Outbound, Direction::Outbound) => {
            a.arrival_timestep.cmp(&b.arrival_timestep)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::ShipId;

    fn ship(
        id: i32,
        direction: Direction,
        emergency: bool,
        arrival: i32,
        waiting: i32,
    ) -> Ship {
        Ship::new(ShipId(id), direction, 1, emergency, arrival, waiting, vec![])
    }

    #[test]
    fn emergency_beats_everything() {
        let emergency = ship(1, Direction::Inbound, true, 100, 0);
        let normal = ship(2, Direction::Inbound, false, 0, 5);
        assert_eq!(compare(&emergency, &normal), Ordering::Less);
    }

    #[test]
    fn earlier_deadline_first_among_inbound() {
        let tight = ship(1, Direction::Inbound, false, 0, 5);
        let loose = ship(2, Direction::Inbound, false, 0, 20);
        assert_eq!(compare(&tight, &loose), Ordering::Less);
    }

    #[test]
    fn inbound_beats_outbound() {
        let inbound = ship(1, Direction::Inbound, false, 5, 10);
        let outbound = ship(2, Direction::Outbound, false, 3, 0);
        assert_eq!(compare(&inbound, &outbound), Ordering::Less);
    }

    #[test]
    fn outbound_ties_broken_by_arrival() {
        let earlier = ship(1, Direction::Outbound, false, 1, 0);
        let later = ship(2, Direction::Outbound, false, 5, 0);
        assert_eq!(compare(&earlier, &later), Ordering::Less);
    }

    #[test]
    fn serviced_sorts_to_end() {
        let mut serviced = ship(1, Direction::Inbound, true, 0, 0);
        serviced.mark_serviced();
        let waiting = ship(2, Direction::Inbound, false, 0, 5);
        assert_eq!(compare(&serviced, &waiting), Ordering::Greater);
    }
}
