use crate::airport::{Route, RouteTable};
use crate::error::StoreError;
use crate::fleet::FleetRegistry;
use crate::schedule::scheduler::TripScheduler;
use crate::schedule::trip_id::{RandomTripIds, TripIdGenerator};
use crate::store::{InMemoryTripStore, InMemoryVehicleStore, TripStore};
use crate::time::SimClock;
use crate::trip::{Trip, TripId};
use crate::vehicle::Vehicle;
use jiff::Timestamp;
use parking_lot::Mutex;
use proptest::prop_oneof;
use proptest::strategy::{Just, Strategy};
use std::sync::Arc;

pub const AIRPORTS: [&str; 3] = ["JFK", "LAX", "MIA"];

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

pub fn vehicle(vehicle_id: &str, location: &str, is_available: bool, next: &str) -> Vehicle {
    Vehicle {
        id: id(vehicle_id),
        name: format!("Ship {}", vehicle_id),
        current_location: id(location),
        is_available,
        next_available_time: ts(next),
    }
}

pub fn routes() -> RouteTable {
    let route = |from: &str, to: &str, miles: u64| Route {
        from: id(from),
        to: id(to),
        miles,
    };
    RouteTable::new(
        &[
            route("JFK", "LAX", 2475),
            route("JFK", "MIA", 1090),
            route("LAX", "JFK", 2475),
            route("LAX", "MIA", 2342),
            route("MIA", "JFK", 1090),
            route("MIA", "LAX", 2342),
        ],
        1000,
    )
}

pub fn scheduler_with(
    vehicles: Vec<Vehicle>,
    trips: Box<dyn TripStore>,
    ids: Box<dyn TripIdGenerator>,
    now: &str,
) -> (TripScheduler, Arc<SimClock>) {
    let clock = Arc::new(SimClock::frozen_at(ts(now)));
    let scheduler = TripScheduler::new(
        FleetRegistry::new(Box::new(InMemoryVehicleStore::new(vehicles))),
        trips,
        routes(),
        clock.clone(),
        ids,
    );
    (scheduler, clock)
}

pub fn scheduler(vehicles: Vec<Vehicle>, now: &str) -> (TripScheduler, Arc<SimClock>) {
    scheduler_with(
        vehicles,
        Box::new(InMemoryTripStore::new()),
        Box::new(RandomTripIds::seeded(1)),
        now,
    )
}

pub fn vehicle_of(scheduler: &TripScheduler, vehicle_id: &str) -> Vehicle {
    scheduler.fleet().vehicle(vehicle_id).unwrap().unwrap()
}

/// Trip store whose writes always fail.
pub struct FailingTripStore;

impl TripStore for FailingTripStore {
    fn get(&self, _id: &str) -> Result<Option<Trip>, StoreError> {
        Ok(None)
    }

    fn upsert(&self, _trip: Trip) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }

    fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

/// In-memory trip store whose deletes always fail.
#[derive(Default)]
pub struct UndeletableTripStore {
    trips: InMemoryTripStore,
}

impl TripStore for UndeletableTripStore {
    fn get(&self, id: &str) -> Result<Option<Trip>, StoreError> {
        self.trips.get(id)
    }

    fn upsert(&self, trip: Trip) -> Result<(), StoreError> {
        self.trips.upsert(trip)
    }

    fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("down".to_string()))
    }
}

/// Hands out a fixed list of ids, repeating the last one forever.
pub struct ScriptedTripIds {
    ids: Mutex<Vec<TripId>>,
}

impl ScriptedTripIds {
    pub fn new(ids: &[&str]) -> ScriptedTripIds {
        ScriptedTripIds {
            ids: Mutex::new(ids.iter().rev().map(|s| id(s)).collect()),
        }
    }
}

impl TripIdGenerator for ScriptedTripIds {
    fn next_id(&self) -> TripId {
        let mut ids = self.ids.lock();
        if ids.len() > 1 {
            ids.pop().unwrap()
        } else {
            ids.last().cloned().unwrap()
        }
    }
}

pub fn arb_airport() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just(AIRPORTS[0]), Just(AIRPORTS[1]), Just(AIRPORTS[2])]
}

pub fn arb_departure() -> impl Strategy<Value = Timestamp> {
    // 2025-01-01T00:00:00Z .. roughly 2030
    (1_735_689_600i64..1_893_456_000i64).prop_map(|secs| Timestamp::from_second(secs).unwrap())
}
