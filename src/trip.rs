use crate::airport::AirportId;
use crate::time::progress_percent;
use crate::vehicle::VehicleId;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type TripId = Arc<str>;

/// Persisted trip. Immutable once created; status is derived from the
/// timestamps and never stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub vehicle_id: VehicleId,
    pub origin_id: AirportId,
    pub destination_id: AirportId,
    pub departure_time: Timestamp,
    pub arrival_time: Timestamp,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TripPhase {
    Scheduled,
    EnRoute { percent: u8 },
    Arrived,
}

impl Trip {
    pub fn phase_at(&self, now: Timestamp) -> TripPhase {
        if now < self.departure_time {
            TripPhase::Scheduled
        } else if now < self.arrival_time {
            TripPhase::EnRoute {
                percent: progress_percent(self.departure_time, self.arrival_time, now),
            }
        } else {
            TripPhase::Arrived
        }
    }

    pub fn has_departed(&self, now: Timestamp) -> bool {
        now >= self.departure_time
    }

    pub fn location_at(&self, now: Timestamp) -> String {
        match self.phase_at(now) {
            TripPhase::Scheduled => self.origin_id.to_string(),
            TripPhase::EnRoute { percent } => {
                format!("En route: {}% to {}", percent, self.destination_id)
            }
            TripPhase::Arrived => self.destination_id.to_string(),
        }
    }

    /// Status view; `now` fills in the current location.
    pub fn status(&self, now: Option<Timestamp>) -> TripStatus {
        TripStatus {
            trip_id: self.id.clone(),
            spaceship_id: self.vehicle_id.clone(),
            departure_location_code: self.origin_id.clone(),
            destination_location_code: self.destination_id.clone(),
            departure_at: self.departure_time.to_string(),
            arrival_at: self.arrival_time.to_string(),
            current_location: now.map(|at| self.location_at(at)),
        }
    }
}

impl fmt::Display for TripPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TripPhase::Scheduled => write!(f, "SCHEDULED"),
            TripPhase::EnRoute { percent } => write!(f, "EN ROUTE {}%", percent),
            TripPhase::Arrived => write!(f, "ARRIVED"),
        }
    }
}

/// Wire view of a trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStatus {
    pub trip_id: TripId,
    pub spaceship_id: VehicleId,
    pub departure_location_code: AirportId,
    pub destination_location_code: AirportId,
    pub departure_at: String,
    pub arrival_at: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub current_location: Option<String>,
}
