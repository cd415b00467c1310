use crate::airport::AirportId;
use crate::trip::TripId;
use jiff::Timestamp;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid airport codes: no route from {origin} to {destination}")]
    InvalidRoute {
        origin: AirportId,
        destination: AirportId,
    },
    #[error("Invalid departure time: {0}")]
    InvalidTime(String),
    #[error("No spaceships available, {}", describe_earliest(.0))]
    NoCapacity(Option<Timestamp>),
    #[error("Trip not found: {0}")]
    TripNotFound(TripId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Store conflict: {0}")]
    Conflict(String),
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Failed to read scenario file")]
    Io(#[from] std::io::Error),
    #[error("Malformed scenario file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Speed must be positive")]
    InvalidSpeed,
    #[error("Duplicate vehicle id {0}")]
    DuplicateVehicle(String),
    #[error("Vehicle {vehicle} is parked at {location}, which no route serves")]
    UnknownLocation { vehicle: String, location: String },
}

fn describe_earliest(earliest: &Option<Timestamp>) -> String {
    match earliest {
        Some(at) => format!("earliest time: {}", at),
        None => "fleet is empty".to_string(),
    }
}
