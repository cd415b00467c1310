//! HTTP-shaped boundary over the scheduler: method, path and JSON body in,
//! status code and JSON body out. A web framework only has to forward.

use crate::error::SchedulerError;
use crate::schedule::scheduler::TripScheduler;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub departure_location_code: String,
    pub destination_location_code: String,
    pub departure_at: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub message: String,
}

#[derive(Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    InternalServerError(String),
}

impl ApiError {
    /// Trip requests report domain failures as 400.
    fn from_request(error: SchedulerError) -> ApiError {
        match error {
            SchedulerError::Store(err) => ApiError::InternalServerError(err.to_string()),
            other => ApiError::BadRequest(other.to_string()),
        }
    }

    /// Lookups by trip id report domain failures as 404.
    fn from_lookup(error: SchedulerError) -> ApiError {
        match error {
            SchedulerError::Store(err) => ApiError::InternalServerError(err.to_string()),
            other => ApiError::NotFound(other.to_string()),
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (400, message),
            ApiError::NotFound(message) => (404, message),
            ApiError::InternalServerError(message) => (500, message),
        };
        ApiResponse {
            status,
            body: json!({ "statusCode": status, "message": message }),
        }
    }
}

pub fn handle(
    scheduler: &TripScheduler,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> ApiResponse {
    debug!(method, path, "api call");
    route(scheduler, method, path, body).unwrap_or_else(ApiError::into_response)
}

fn route(
    scheduler: &TripScheduler,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> Result<ApiResponse, ApiError> {
    let mut segments = path
        .trim_matches('/')
        .split('/')
        .collect::<Vec<&str>>();
    if segments.first() == Some(&"api") {
        segments.remove(0);
    }
    let method = method.to_ascii_uppercase();

    match (method.as_str(), segments.as_slice()) {
        ("POST", ["trip", "request"]) => request_trip(scheduler, body),
        ("DELETE", ["trip", trip_id]) => cancel_trip(scheduler, trip_id),
        ("GET", ["trip", trip_id]) => trip_status(scheduler, trip_id),
        _ => Err(ApiError::NotFound(format!("Cannot {} {}", method, path))),
    }
}

fn request_trip(scheduler: &TripScheduler, body: Option<&str>) -> Result<ApiResponse, ApiError> {
    let request: TripRequest = serde_json::from_str(body.unwrap_or_default())
        .map_err(|err| ApiError::BadRequest(format!("Malformed request body: {}", err)))?;
    let status = scheduler
        .request_trip(
            &request.departure_location_code,
            &request.destination_location_code,
            &request.departure_at,
        )
        .map_err(ApiError::from_request)?;
    ok(&status)
}

fn cancel_trip(scheduler: &TripScheduler, trip_id: &str) -> Result<ApiResponse, ApiError> {
    let message = scheduler
        .cancel_trip(trip_id)
        .map_err(ApiError::from_lookup)?;
    ok(&CancelResponse { message })
}

fn trip_status(scheduler: &TripScheduler, trip_id: &str) -> Result<ApiResponse, ApiError> {
    let status = scheduler
        .trip_status(trip_id)
        .map_err(ApiError::from_lookup)?;
    ok(&status)
}

fn ok<T: Serialize>(value: &T) -> Result<ApiResponse, ApiError> {
    let body = serde_json::to_value(value)
        .map_err(|err| ApiError::InternalServerError(err.to_string()))?;
    Ok(ApiResponse { status: 200, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airport::{Route, RouteTable};
    use crate::error::StoreError;
    use crate::fleet::FleetRegistry;
    use crate::schedule::trip_id::RandomTripIds;
    use crate::store::{InMemoryTripStore, InMemoryVehicleStore};
    use crate::time::SimClock;
    use crate::vehicle::Vehicle;
    use std::sync::Arc;

    fn scheduler() -> TripScheduler {
        let ship = Vehicle {
            id: Arc::from("SS-001"),
            name: "Star Sprinter".to_string(),
            current_location: Arc::from("JFK"),
            is_available: true,
            next_available_time: "2025-01-01T00:00:00Z".parse().unwrap(),
        };
        let routes = [Route {
            from: Arc::from("JFK"),
            to: Arc::from("LAX"),
            miles: 2475,
        }];
        TripScheduler::new(
            FleetRegistry::new(Box::new(InMemoryVehicleStore::new(vec![ship]))),
            Box::new(InMemoryTripStore::new()),
            RouteTable::new(&routes, 1000),
            Arc::new(SimClock::frozen_at("2025-05-01T00:00:00Z".parse().unwrap())),
            Box::new(RandomTripIds::seeded(3)),
        )
    }

    const REQUEST: &str = r#"{
        "departureLocationCode": "JFK",
        "destinationLocationCode": "LAX",
        "departureAt": "2025-06-01T00:00:00Z"
    }"#;

    #[test]
    fn test_trip_lifecycle() {
        let scheduler = scheduler();

        let created = handle(&scheduler, "POST", "/trip/request", Some(REQUEST));
        assert_eq!(200, created.status);
        assert_eq!("SS-001", created.body["spaceshipId"]);
        assert_eq!("2025-06-01T02:28:30Z", created.body["arrivalAt"]);
        assert!(created.body.get("currentLocation").is_none());

        let trip_id = created.body["tripId"].as_str().unwrap().to_string();
        let path = format!("/trip/{}", trip_id);

        let status = handle(&scheduler, "GET", &path, None);
        assert_eq!(200, status.status);
        assert_eq!("JFK", status.body["currentLocation"]);

        let cancelled = handle(&scheduler, "DELETE", &path, None);
        assert_eq!(
            ApiResponse {
                status: 200,
                body: json!({ "message": "Trip canceled successfully" }),
            },
            cancelled
        );

        let missing = handle(&scheduler, "GET", &path, None);
        assert_eq!(404, missing.status);
        assert_eq!(404, missing.body["statusCode"]);
        assert_eq!(404, handle(&scheduler, "DELETE", &path, None).status);
    }

    #[test]
    fn test_api_prefix_and_case() {
        let scheduler = scheduler();

        let created = handle(&scheduler, "post", "/api/trip/request/", Some(REQUEST));

        assert_eq!(200, created.status);
    }

    #[test]
    fn test_request_failures_are_bad_requests() {
        let scheduler = scheduler();
        let bad_route = r#"{"departureLocationCode":"JFK","destinationLocationCode":"ORD","departureAt":"2025-06-01T00:00:00Z"}"#;
        let bad_time = r#"{"departureLocationCode":"JFK","destinationLocationCode":"LAX","departureAt":"soon"}"#;

        for body in [Some(bad_route), Some(bad_time), Some("{}"), Some("not json"), None] {
            let response = handle(&scheduler, "POST", "/trip/request", body);
            assert_eq!(400, response.status, "{:?}", body);
        }

        let response = handle(&scheduler, "POST", "/trip/request", Some(bad_route));
        assert!(
            response.body["message"]
                .as_str()
                .unwrap()
                .starts_with("Invalid airport codes")
        );
    }

    #[test]
    fn test_unknown_routes() {
        let scheduler = scheduler();

        assert_eq!(404, handle(&scheduler, "PUT", "/trip/TRIP-1", None).status);
        assert_eq!(404, handle(&scheduler, "GET", "/trips", None).status);
        assert_eq!(404, handle(&scheduler, "GET", "/trip/", None).status);
        assert_eq!(
            "Cannot GET /nowhere",
            handle(&scheduler, "GET", "/nowhere", None).body["message"]
        );
    }

    #[test]
    fn test_store_failures_are_server_errors() {
        let error = SchedulerError::Store(StoreError::Unavailable("down".to_string()));

        assert_eq!(500, ApiError::from_request(error).into_response().status);
        assert_eq!(
            500,
            ApiError::from_lookup(SchedulerError::Store(StoreError::Conflict("x".to_string())))
                .into_response()
                .status
        );
    }
}
