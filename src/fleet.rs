use crate::airport::AirportId;
use crate::error::StoreError;
use crate::store::VehicleStore;
use crate::trip::Trip;
use crate::vehicle::Vehicle;
use jiff::Timestamp;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    Released,
    Reassigned,
    Missing,
}

/// Vehicle picked for a trip and the instant it can actually leave.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub vehicle: Vehicle,
    pub departure: Timestamp,
}

pub struct FleetRegistry {
    vehicles: Box<dyn VehicleStore>,
}

impl FleetRegistry {
    pub fn new(vehicles: Box<dyn VehicleStore>) -> FleetRegistry {
        FleetRegistry { vehicles }
    }

    pub fn vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        self.vehicles.list_all()
    }

    pub fn vehicle(&self, id: &str) -> Result<Option<Vehicle>, StoreError> {
        self.vehicles.get(id)
    }

    /// First vehicle in store order that is parked at `origin`, available and
    /// free by `requested` leaves on time. Otherwise the vehicle at `origin`
    /// that frees up first is taken and the departure slips to that instant.
    /// Vehicles elsewhere are never considered.
    pub fn find_best_vehicle(
        &self,
        origin: &str,
        requested: Timestamp,
    ) -> Result<Option<Candidate>, StoreError> {
        let vehicles = self.vehicles.list_all()?;
        Ok(Self::select(vehicles, origin, requested))
    }

    fn select(vehicles: Vec<Vehicle>, origin: &str, requested: Timestamp) -> Option<Candidate> {
        let mut fallback: Option<Vehicle> = None;
        for vehicle in vehicles {
            if vehicle.is_ready_at(origin, requested) {
                debug!(vehicle = %vehicle.id, origin, "vehicle ready at requested time");
                return Some(Candidate {
                    vehicle,
                    departure: requested,
                });
            }
            // strictly earlier only, so the first one seen wins ties
            let is_earlier = fallback
                .as_ref()
                .map_or(true, |best| vehicle.next_available_time < best.next_available_time);
            if *vehicle.current_location == *origin && is_earlier {
                fallback = Some(vehicle);
            }
        }

        fallback.map(|vehicle| {
            let departure = vehicle.next_available_time.max(requested);
            debug!(vehicle = %vehicle.id, origin, %departure, "departure delayed until vehicle frees up");
            Candidate { vehicle, departure }
        })
    }

    /// Minimum `next_available_time` across the whole fleet.
    pub fn earliest_availability(&self) -> Result<Option<Timestamp>, StoreError> {
        Ok(self
            .vehicles
            .list_all()?
            .iter()
            .map(|v| v.next_available_time)
            .min())
    }

    pub fn apply_assignment(
        &self,
        vehicle: &Vehicle,
        destination: &AirportId,
        arrival: Timestamp,
    ) -> Result<Vehicle, StoreError> {
        let assigned = Vehicle {
            current_location: destination.clone(),
            is_available: false,
            next_available_time: arrival,
            ..vehicle.clone()
        };
        self.vehicles.upsert(assigned.clone())?;
        Ok(assigned)
    }

    /// Frees the vehicle from `at` on, provided it still sits where `trip`
    /// leaves it and is held until the trip's arrival. A vehicle booked
    /// onward since then keeps its later assignment.
    pub fn release_vehicle(&self, trip: &Trip, at: Timestamp) -> Result<Release, StoreError> {
        let Some(vehicle) = self.vehicles.get(&trip.vehicle_id)? else {
            return Ok(Release::Missing);
        };
        if vehicle.current_location != trip.destination_id
            || vehicle.next_available_time != trip.arrival_time
        {
            debug!(vehicle = %vehicle.id, trip = %trip.id, "vehicle already booked onward, not released");
            return Ok(Release::Reassigned);
        }
        self.vehicles.upsert(Vehicle {
            is_available: true,
            next_available_time: at,
            ..vehicle
        })?;
        Ok(Release::Released)
    }

    /// Writes back a previously read record verbatim.
    pub fn restore(&self, vehicle: Vehicle) -> Result<(), StoreError> {
        self.vehicles.upsert(vehicle)
    }
}
