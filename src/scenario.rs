use crate::airport::{Route, RouteTable};
use crate::error::ScenarioError;
use crate::vehicle::Vehicle;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const DEFAULT_SPEED_MPH: u64 = 1000;

fn default_speed() -> u64 {
    DEFAULT_SPEED_MPH
}

/// Routes, cruise speed and starting fleet, as loaded from a JSON file.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_speed")]
    pub speed_mph: u64,
    pub routes: Vec<Route>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl Scenario {
    pub fn load_from_file(path: &Path) -> Result<Scenario, ScenarioError> {
        let data = std::fs::read_to_string(path)?;
        Scenario::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Scenario, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(data)?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.speed_mph == 0 {
            return Err(ScenarioError::InvalidSpeed);
        }

        let table = self.route_table();
        let mut seen = HashSet::new();
        for vehicle in &self.vehicles {
            if !seen.insert(vehicle.id.clone()) {
                return Err(ScenarioError::DuplicateVehicle(vehicle.id.to_string()));
            }
            if !table.serves(&vehicle.current_location) {
                return Err(ScenarioError::UnknownLocation {
                    vehicle: vehicle.id.to_string(),
                    location: vehicle.current_location.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn route_table(&self) -> RouteTable {
        RouteTable::new(&self.routes, self.speed_mph)
    }
}
