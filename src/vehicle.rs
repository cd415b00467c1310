use crate::airport::AirportId;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

pub type VehicleId = Arc<str>;

/// A fleet unit. `next_available_time` is always concrete; while
/// `is_available` holds the vehicle can take any trip departing at or after it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Vehicle {
    pub id: VehicleId,
    pub name: String,
    pub current_location: AirportId,
    pub is_available: bool,
    pub next_available_time: Timestamp,
}

impl Vehicle {
    /// Ready at `location` for a departure at `at` without waiting.
    pub fn is_ready_at(&self, location: &str, at: Timestamp) -> bool {
        *self.current_location == *location && self.is_available && self.next_available_time <= at
    }
}
