//! JSON payloads served by the web server.

use crate::error::ClientError;
use aqmaps_core::{Point, Polygon};
use serde::Deserialize;
use serde_json::Value;

/// `/words/{w1}/{w2}/{w3}/details.json`
#[derive(Debug, Deserialize)]
pub struct LocationDetails {
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Coordinates {
    pub lng: f64,
    pub lat: f64,
}

impl From<Coordinates> for Point {
    fn from(coords: Coordinates) -> Self {
        Point::new(coords.lng, coords.lat)
    }
}

/// `/buildings/no-fly-zones.geojson`
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// Polygon rings, outer ring first, `[lng, lat]` pairs.
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl FeatureCollection {
    /// Outer ring of every feature as a polygon.
    pub fn into_polygons(self) -> Result<Vec<Polygon>, ClientError> {
        self.features
            .into_iter()
            .enumerate()
            .map(|(index, feature)| {
                let ring = feature
                    .geometry
                    .coordinates
                    .into_iter()
                    .next()
                    .filter(|ring| ring.len() >= 3)
                    .ok_or(ClientError::MissingRing { index })?;
                Ok(Polygon::new(ring.into_iter().map(Point::from).collect()))
            })
            .collect()
    }
}

/// One entry of `/maps/{YYYY}/{MM}/{DD}/air-quality-data.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityEntry {
    /// Dotted three-word code of the sensor location.
    pub location: String,
    pub battery: NumberOrText,
    #[serde(default)]
    pub reading: Value,
}

/// The server sends some numeric fields as JSON strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberOrText {
    Number(f64),
    Text(String),
}

impl AirQualityEntry {
    pub fn battery_level(&self) -> Result<f64, ClientError> {
        match &self.battery {
            NumberOrText::Number(value) => Ok(*value),
            NumberOrText::Text(text) => {
                text.trim()
                    .parse()
                    .map_err(|_| ClientError::InvalidBattery {
                        code: self.location.clone(),
                        value: text.clone(),
                    })
            }
        }
    }

    /// Reading payload as plain text (`"null"` when absent).
    pub fn reading_text(&self) -> String {
        match &self.reading {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

/// Turn `slips.mass.baking` into the `slips/mass/baking` path segment.
pub fn location_path(code: &str) -> Result<String, ClientError> {
    let words: Vec<&str> = code.split('.').collect();
    if words.len() != 3 || words.iter().any(|word| word.is_empty()) {
        return Err(ClientError::InvalidLocationCode(code.to_string()));
    }
    Ok(words.join("/"))
}
