use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub type AirportId = Arc<str>;

/// Directional distance entry of the route table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: AirportId,
    pub to: AirportId,
    pub miles: u64,
}

/// Static distance lookup plus cruise speed. Lookups are directional; a
/// pair that is not listed is not a supported route.
#[derive(Clone, Debug)]
pub struct RouteTable {
    distances: HashMap<AirportId, HashMap<AirportId, u64>>,
    speed_mph: u64,
}

impl RouteTable {
    pub fn new(routes: &[Route], speed_mph: u64) -> RouteTable {
        let mut distances: HashMap<AirportId, HashMap<AirportId, u64>> = HashMap::new();
        for route in routes {
            distances
                .entry(route.from.clone())
                .or_default()
                .insert(route.to.clone(), route.miles);
        }
        RouteTable {
            distances,
            speed_mph,
        }
    }

    pub fn distance(&self, origin: &str, destination: &str) -> Option<u64> {
        self.distances.get(origin)?.get(destination).copied()
    }

    pub fn speed_mph(&self) -> u64 {
        self.speed_mph
    }

    pub fn serves(&self, airport: &str) -> bool {
        self.distances.contains_key(airport)
            || self.distances.values().any(|to| to.contains_key(airport))
    }
}
