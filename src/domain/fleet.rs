//! Fleet registry: the current population of ships and their lifecycle
//! state. Never shrinks — `serviced` ships are retained, not removed.

use tracing::debug;

use super::entities::Ship;
use super::value_objects::{Direction, ShipId};

/// A freshly admitted ship arrival, as read off the shared-memory
/// `newShipRequests` table.
#[derive(Debug, Clone)]
pub struct ShipRequest {
    pub ship_id: ShipId,
    pub direction: Direction,
    pub category: i32,
    pub emergency: bool,
    pub arrival_timestep: i32,
    pub waiting_time: i32,
    pub cargo_weights: Vec<i32>,
}

/// Maintains the current population of ships and their lifecycle state.
#[derive(Debug, Default)]
pub struct FleetRegistry {
    ships: Vec<Ship>,
}

impl FleetRegistry {
    pub fn new() -> Self {
        Self { ships: Vec::new() }
    }

    /// Idempotent upsert keyed by `(shipId, direction)`, restricted to
    /// non-serviced rows: a still-unserviced ship with a matching key is
    /// updated in place; otherwise a new record is appended.
    pub fn admit(&mut self, req: ShipRequest) -> usize {
        let existing = self.ships.iter().position(|ship| {
            ship.id == req.ship_id && ship.direction == req.direction && !ship.is_serviced()
        });

        let index = match existing {
            Some(idx) => idx,
            None => {
                self.ships.push(Ship::new(
                    req.ship_id,
                    req.direction,
                    req.category,
                    req.emergency,
                    req.arrival_timestep,
                    req.waiting_time,
                    req.cargo_weights.clone(),
                ));
                let idx = self.ships.len() - 1;
                debug!(ship = %req.ship_id, direction = %req.direction, "admitted new ship");
                return idx;
            }
        };

        let ship = Ship::new(
            req.ship_id,
            req.direction,
            req.category,
            req.emergency,
            req.arrival_timestep,
            req.waiting_time,
            req.cargo_weights,
        );
        self.ships[index] = ship;
        debug!(ship = %self.ships[index].id, "updated in-place (retransmitted arrival)");
        index
    }

    pub fn find_by_id_dir(&self, ship_id: ShipId, direction: Direction) -> Option<&Ship> {
        self.ships
            .iter()
            .find(|ship| ship.id == ship_id && ship.direction == direction)
    }

    pub fn find_by_id_dir_mut(
        &mut self,
        ship_id: ShipId,
        direction: Direction,
    ) -> Option<&mut Ship> {
        self.ships
            .iter_mut()
            .find(|ship| ship.id == ship_id && ship.direction == direction)
    }

    pub fn get(&self, index: usize) -> &Ship {
        &self.ships[index]
    }

    pub fn get_mut(&mut self, index: usize) -> &mut Ship {
        &mut self.ships[index]
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    /// Indices of ships that are unserviced and undocked, in registry
    /// (admission) order — the order the emergency pass iterates in.
    pub fn waiting_indices(&self) -> Vec<usize> {
        self.ships
            .iter()
            .enumerate()
            .filter(|(_, ship)| ship.is_waiting())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Sort indices by the priority policy. Serviced/docked ships sort to
    /// the end and are filtered out by the caller if not needed.
    pub fn sorted_indices_by(&self, cmp: impl Fn(&Ship, &Ship) -> std::cmp::Ordering) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.ships.len()).collect();
        indices.sort_by(|&a, &b| cmp(&self.ships[a], &self.ships[b]));
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(id: i32, emergency: bool) -> ShipRequest {
        ShipRequest {
            ship_id: ShipId(id),
            direction: Direction::Inbound,
            category: 1,
            emergency,
            arrival_timestep: 0,
            waiting_time: 10,
            cargo_weights: vec![5],
        }
    }

    #[test]
    fn admit_appends_new_ship() {
        let mut fleet = FleetRegistry::new();
        fleet.admit(req(1, false));
        assert_eq!(fleet.len(), 1);
    }

    #[test]
    fn admit_is_idempotent_for_unserviced_ships() {
        let mut fleet = FleetRegistry::new();
        fleet.admit(req(1, false));
        fleet.admit(req(1, false));
        assert_eq!(fleet.len(), 1, "retransmission must update in place, not append");
    }

    #[test]
    fn admit_appends_again_after_servicing() {
        let mut fleet = FleetRegistry::new();
        let idx = fleet.admit(req(1, false));
        fleet.get_mut(idx).mark_serviced();
        fleet.admit(req(1, false));
        assert_eq!(fleet.len(), 2, "a serviced ship id may be reused by a fresh arrival");
    }

    #[test]
    fn find_by_id_dir_distinguishes_direction() {
        let mut fleet = FleetRegistry::new();
        fleet.admit(req(1, false));
        let mut outbound = req(1, false);
        outbound.direction = Direction::Outbound;
        fleet.admit(outbound);

        assert!(fleet.find_by_id_dir(ShipId(1), Direction::Inbound).is_some());
        assert!(fleet.find_by_id_dir(ShipId(1), Direction::Outbound).is_some());
        assert_eq!(fleet.len(), 2);
    }
}
