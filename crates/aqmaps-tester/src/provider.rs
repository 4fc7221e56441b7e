//! Source of the map data a flight is checked against.

use anyhow::{Context, Result};
use aqmaps_client::WebServerClient;
use aqmaps_core::{Polygon, SensorLookup};
use chrono::NaiveDate;

pub trait GeoDataProvider {
    fn no_fly_zones(&self) -> Result<Vec<Polygon>>;

    fn sensors(&self, date: NaiveDate) -> Result<SensorLookup>;
}

impl GeoDataProvider for WebServerClient {
    fn no_fly_zones(&self) -> Result<Vec<Polygon>> {
        self.fetch_no_fly_zones()
            .with_context(|| format!("Failed to fetch no-fly zones from {}", self.base_url()))
    }

    fn sensors(&self, date: NaiveDate) -> Result<SensorLookup> {
        self.fetch_sensors(date)
            .with_context(|| format!("Failed to fetch air-quality data for {}", date))
    }
}
