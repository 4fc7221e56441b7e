//! HTTP client for the aqmaps web server.

use crate::error::ClientError;
use crate::payloads::{location_path, AirQualityEntry, FeatureCollection, LocationDetails};
use aqmaps_core::{Point, Polygon, Sensor, SensorLookup};
use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Blocking client for the web server that backs the drone's map data.
pub struct WebServerClient {
    client: Client,
    base_url: String,
}

impl WebServerClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the web server (e.g., "http://localhost:9898")
    /// * `timeout` - Deadline applied to every request
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Setup)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a dotted three-word code to its coordinates.
    pub fn resolve_location(&self, code: &str) -> Result<Point, ClientError> {
        let url = format!("{}/words/{}/details.json", self.base_url, location_path(code)?);
        let details: LocationDetails = self.get_json(&url)?;
        Ok(details.coordinates.into())
    }

    /// Current no-fly zones. The server returns the same set for every date.
    pub fn fetch_no_fly_zones(&self) -> Result<Vec<Polygon>, ClientError> {
        let url = format!("{}/buildings/no-fly-zones.geojson", self.base_url);
        let collection: FeatureCollection = self.get_json(&url)?;
        let zones = collection.into_polygons()?;
        tracing::debug!("Fetched {} no-fly zones", zones.len());
        Ok(zones)
    }

    /// Sensors on the air-quality map for `date`, keyed by code.
    ///
    /// Every sensor location is resolved through [`Self::resolve_location`].
    pub fn fetch_sensors(&self, date: NaiveDate) -> Result<SensorLookup, ClientError> {
        let url = format!(
            "{}/maps/{}/{:02}/{:02}/air-quality-data.json",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        );
        let entries: Vec<AirQualityEntry> = self.get_json(&url)?;

        let mut sensors = SensorLookup::with_capacity(entries.len());
        for entry in entries {
            let sensor = Sensor {
                location: self.resolve_location(&entry.location)?,
                battery: entry.battery_level()?,
                reading: entry.reading_text(),
                code: entry.location,
            };
            sensors.insert(sensor.code.clone(), sensor);
        }
        tracing::debug!("Fetched {} sensors for {}", sensors.len(), date);
        Ok(sensors)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let request_error = |source| ClientError::Request {
            url: url.to_string(),
            source,
        };
        self.client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(request_error)?
            .json()
            .map_err(request_error)
    }
}
