//! Defines the data structures representing weather stations of a resource, derived
//! from the resource's GeoJSON features. Also includes implementations necessary for
//! spatial indexing using the `rstar` crate.

use crate::types::resource::Feature;
use polars::prelude::{Column, DataFrame, PolarsResult};
use rstar::{PointDistance, RTreeObject, AABB};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Display form of [`StationListing::NoStations`].
pub const NO_STATIONS: &str = "no stations for this resource";

// --- Data Structures ---

/// A single weather station of a resource.
///
/// Built from one GeoJSON feature: `id` and `name` are taken from the feature's
/// properties (numbers are stringified), `location` from a point geometry.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// Station identifier as used in the `weatherStationId` request parameter.
    pub id: Option<String>,
    pub name: Option<String>,
    /// All feature properties, verbatim.
    pub properties: Map<String, Value>,
    /// Point location, `None` when the feature has no point geometry.
    pub location: Option<Location>,
}

/// Represents the geographical location of a weather station.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Location {
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
    /// Altitude above sea level in meters, if available.
    pub altitude: Option<f64>,
}

impl Location {
    /// Reads GeoJSON point coordinates: `[longitude, latitude(, altitude)]`.
    pub fn from_coordinates(coordinates: &Value) -> Option<Location> {
        let values = coordinates.as_array()?;
        let longitude = values.first()?.as_f64()?;
        let latitude = values.get(1)?.as_f64()?;
        let altitude = values.get(2).and_then(Value::as_f64);
        Some(Location {
            latitude,
            longitude,
            altitude,
        })
    }
}

impl Station {
    pub fn from_feature(feature: &Feature) -> Station {
        let properties = feature.properties.clone().unwrap_or_default();
        Station {
            id: properties.get("id").and_then(property_to_string),
            name: properties.get("name").and_then(property_to_string),
            location: feature
                .geometry
                .as_ref()
                .and_then(|geometry| Location::from_coordinates(&geometry.coordinates)),
            properties,
        }
    }
}

fn property_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Builds the station table: one row per station with columns
/// `name`, `id`, `longitude`, `latitude`, `altitude`.
pub(crate) fn stations_to_frame(stations: &[Station]) -> PolarsResult<DataFrame> {
    let names: Vec<Option<String>> = stations.iter().map(|s| s.name.clone()).collect();
    let ids: Vec<Option<String>> = stations.iter().map(|s| s.id.clone()).collect();
    let longitudes: Vec<Option<f64>> = stations
        .iter()
        .map(|s| s.location.map(|l| l.longitude))
        .collect();
    let latitudes: Vec<Option<f64>> = stations
        .iter()
        .map(|s| s.location.map(|l| l.latitude))
        .collect();
    let altitudes: Vec<Option<f64>> = stations
        .iter()
        .map(|s| s.location.and_then(|l| l.altitude))
        .collect();

    DataFrame::new(vec![
        Column::new("name".into(), names),
        Column::new("id".into(), ids),
        Column::new("longitude".into(), longitudes),
        Column::new("latitude".into(), latitudes),
        Column::new("altitude".into(), altitudes),
    ])
}

/// Stations of one resource as positionally aligned properties and coordinates,
/// or the explicit "no stations" marker for resources without spatial features.
#[derive(Debug, Clone, PartialEq)]
pub enum StationListing {
    Stations {
        properties: Vec<Map<String, Value>>,
        /// Raw GeoJSON coordinates; `Null` where a feature has no geometry.
        coordinates: Vec<Value>,
    },
    NoStations,
}

impl StationListing {
    pub fn len(&self) -> usize {
        match self {
            StationListing::Stations { properties, .. } => properties.len(),
            StationListing::NoStations => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for StationListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationListing::Stations { properties, .. } => {
                write!(f, "{} stations", properties.len())
            }
            StationListing::NoStations => f.write_str(NO_STATIONS),
        }
    }
}

// --- R-Tree Implementations ---

/// A station with a known location, as stored in the R-tree of a
/// [`StationLocator`](crate::stations::locate_station::StationLocator).
#[derive(Debug, Clone)]
pub(crate) struct IndexedStation {
    pub station: Station,
    pub location: Location,
}

impl IndexedStation {
    pub fn new(station: Station) -> Option<IndexedStation> {
        let location = station.location?;
        Some(IndexedStation { station, location })
    }
}

impl RTreeObject for IndexedStation {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.latitude, self.location.longitude])
    }
}

impl PointDistance for IndexedStation {
    /// Squared planar distance in degrees; only used to order R-tree candidates,
    /// the reported distance is haversine.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.location.latitude - point[0];
        let dy = self.location.longitude - point[1];
        dx * dx + dy * dy
    }
}
