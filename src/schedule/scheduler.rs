use crate::airport::{AirportId, RouteTable};
use crate::error::{SchedulerError, StoreError};
use crate::fleet::{FleetRegistry, Release};
use crate::schedule::trip_id::TripIdGenerator;
use crate::store::TripStore;
use crate::time::{Clock, parse_instant, travel_time};
use crate::trip::{Trip, TripId, TripStatus};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const CANCELLED_MESSAGE: &str = "Trip canceled successfully";

/// Books trips onto the fleet and answers status queries.
///
/// Requests and cancellations run as exclusive transactions over both
/// stores, so picking a vehicle and committing its assignment cannot
/// interleave with another booking. Status queries share the guard.
pub struct TripScheduler {
    fleet: FleetRegistry,
    trips: Box<dyn TripStore>,
    routes: RouteTable,
    clock: Arc<dyn Clock>,
    ids: Box<dyn TripIdGenerator>,
    guard: RwLock<()>,
}

impl TripScheduler {
    const MAX_ID_ATTEMPTS: usize = 8;

    pub fn new(
        fleet: FleetRegistry,
        trips: Box<dyn TripStore>,
        routes: RouteTable,
        clock: Arc<dyn Clock>,
        ids: Box<dyn TripIdGenerator>,
    ) -> TripScheduler {
        TripScheduler {
            fleet,
            trips,
            routes,
            clock,
            ids,
            guard: RwLock::new(()),
        }
    }

    pub fn fleet(&self) -> &FleetRegistry {
        &self.fleet
    }

    pub fn request_trip(
        &self,
        origin: &str,
        destination: &str,
        departure_iso: &str,
    ) -> Result<TripStatus, SchedulerError> {
        let invalid_route = || SchedulerError::InvalidRoute {
            origin: Arc::from(origin),
            destination: Arc::from(destination),
        };
        let distance = self
            .routes
            .distance(origin, destination)
            .ok_or_else(invalid_route)?;
        let requested = parse_instant(departure_iso)
            .ok_or_else(|| SchedulerError::InvalidTime(departure_iso.to_string()))?;
        let duration =
            travel_time(distance, self.routes.speed_mph()).ok_or_else(invalid_route)?;

        let _tx = self.guard.write();

        let Some(candidate) = self.fleet.find_best_vehicle(origin, requested)? else {
            let earliest = self.fleet.earliest_availability()?;
            info!(origin, destination, ?earliest, "no vehicle can serve trip");
            return Err(SchedulerError::NoCapacity(earliest));
        };

        let arrival = candidate
            .departure
            .checked_add(duration)
            .map_err(|_| SchedulerError::InvalidTime(departure_iso.to_string()))?;
        let trip_id = self.next_trip_id()?;
        let destination_id: AirportId = Arc::from(destination);

        self.fleet
            .apply_assignment(&candidate.vehicle, &destination_id, arrival)?;

        let trip = Trip {
            id: trip_id,
            vehicle_id: candidate.vehicle.id.clone(),
            origin_id: candidate.vehicle.current_location.clone(),
            destination_id,
            departure_time: candidate.departure,
            arrival_time: arrival,
        };

        if let Err(err) = self.trips.upsert(trip.clone()) {
            warn!(trip = %trip.id, vehicle = %trip.vehicle_id, %err, "trip not persisted, rolling back assignment");
            if let Err(restore_err) = self.fleet.restore(candidate.vehicle) {
                error!(vehicle = %trip.vehicle_id, %restore_err, "failed to roll back vehicle assignment");
            }
            return Err(err.into());
        }

        info!(
            trip = %trip.id,
            vehicle = %trip.vehicle_id,
            origin,
            destination,
            departure = %trip.departure_time,
            arrival = %trip.arrival_time,
            "trip scheduled"
        );
        Ok(trip.status(None))
    }

    fn next_trip_id(&self) -> Result<TripId, StoreError> {
        for _ in 0..Self::MAX_ID_ATTEMPTS {
            let id = self.ids.next_id();
            if self.trips.get(&id)?.is_none() {
                return Ok(id);
            }
            debug!(%id, "trip id already taken");
        }
        Err(StoreError::Conflict(
            "could not allocate a unique trip id".to_string(),
        ))
    }

    /// Deletes the trip. A vehicle whose trip has not departed yet is freed
    /// from now on, unless it has been booked onward since; after departure
    /// it is left as scheduled. Freeing the vehicle is best effort once the
    /// trip is gone.
    pub fn cancel_trip(&self, trip_id: &str) -> Result<String, SchedulerError> {
        let _tx = self.guard.write();

        let trip = self.find_trip(trip_id)?;
        let now = self.clock.now();

        self.trips.delete(&trip.id)?;

        if !trip.has_departed(now) {
            match self.fleet.release_vehicle(&trip, now) {
                Ok(Release::Released) => {
                    debug!(trip = %trip.id, vehicle = %trip.vehicle_id, "vehicle released")
                }
                Ok(Release::Reassigned) => {}
                Ok(Release::Missing) => {
                    warn!(trip = %trip.id, vehicle = %trip.vehicle_id, "assigned vehicle no longer exists")
                }
                Err(err) => {
                    error!(trip = %trip.id, vehicle = %trip.vehicle_id, %err, "failed to release vehicle")
                }
            }
        }

        info!(trip = %trip.id, departed = trip.has_departed(now), "trip cancelled");
        Ok(CANCELLED_MESSAGE.to_string())
    }

    pub fn trip_status(&self, trip_id: &str) -> Result<TripStatus, SchedulerError> {
        let _tx = self.guard.read();

        let trip = self.find_trip(trip_id)?;
        let now = self.clock.now();
        debug!(trip = %trip.id, phase = %trip.phase_at(now), "status computed");
        Ok(trip.status(Some(now)))
    }

    fn find_trip(&self, trip_id: &str) -> Result<Trip, SchedulerError> {
        self.trips
            .get(trip_id)?
            .ok_or_else(|| SchedulerError::TripNotFound(Arc::from(trip_id)))
    }
}
