use crate::error::StoreError;
use crate::trip::{Trip, TripId};
use crate::vehicle::{Vehicle, VehicleId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

/// Vehicle persistence consumed by the fleet registry. `list_all` must
/// return vehicles in a stable order; assignment scans depend on it.
pub trait VehicleStore: Send + Sync {
    fn list_all(&self) -> Result<Vec<Vehicle>, StoreError>;
    fn get(&self, id: &str) -> Result<Option<Vehicle>, StoreError>;
    fn upsert(&self, vehicle: Vehicle) -> Result<(), StoreError>;
}

pub trait TripStore: Send + Sync {
    fn get(&self, id: &str) -> Result<Option<Trip>, StoreError>;
    fn upsert(&self, trip: Trip) -> Result<(), StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Keyed by id, so `list_all` yields vehicles in ascending id order.
#[derive(Debug, Default)]
pub struct InMemoryVehicleStore {
    vehicles: RwLock<BTreeMap<VehicleId, Vehicle>>,
}

impl InMemoryVehicleStore {
    pub fn new(vehicles: Vec<Vehicle>) -> InMemoryVehicleStore {
        let vehicles = vehicles
            .into_iter()
            .map(|v| (v.id.clone(), v))
            .collect::<BTreeMap<VehicleId, Vehicle>>();
        InMemoryVehicleStore {
            vehicles: RwLock::new(vehicles),
        }
    }
}

impl VehicleStore for InMemoryVehicleStore {
    fn list_all(&self) -> Result<Vec<Vehicle>, StoreError> {
        Ok(self.vehicles.read().values().cloned().collect())
    }

    fn get(&self, id: &str) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.vehicles.read().get(id).cloned())
    }

    fn upsert(&self, vehicle: Vehicle) -> Result<(), StoreError> {
        self.vehicles.write().insert(vehicle.id.clone(), vehicle);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTripStore {
    trips: RwLock<HashMap<TripId, Trip>>,
}

impl InMemoryTripStore {
    pub fn new() -> InMemoryTripStore {
        InMemoryTripStore::default()
    }
}

impl TripStore for InMemoryTripStore {
    fn get(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        Ok(self.trips.read().get(id).cloned())
    }

    fn upsert(&self, trip: Trip) -> Result<(), StoreError> {
        self.trips.write().insert(trip.id.clone(), trip);
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.trips.write().remove(id);
        Ok(())
    }
}
