//! Records of the IPM weather data source catalog (`/wx/rest/weatherdatasource`).

use crate::types::station::{Station, StationListing};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One weather data resource (provider) advertised by the platform.
///
/// Only `name` is required; every other field is optional because providers
/// publish heterogeneous metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Platform identifier, e.g. `net.ipmdecisions.weather.fmi`.
    #[serde(default)]
    pub id: Option<String>,
    /// Display name, unique within a catalog snapshot.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Adapter endpoint template, usually containing `{WEATHER_API_URL}`.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// `stations` or `location`.
    #[serde(default)]
    pub access_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_spatial")]
    pub spatial: Option<Spatial>,
    /// Parameter descriptor (common and optional parameter ids), kept verbatim.
    #[serde(default)]
    pub parameters: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spatial {
    #[serde(default)]
    pub countries: Option<Vec<String>>,
    #[serde(
        rename = "geoJSON",
        default,
        deserialize_with = "deserialize_lenient_geo_json"
    )]
    pub geo_json: Option<GeoJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoJson {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Raw GeoJSON coordinates. For points: `[longitude, latitude(, altitude)]`.
    #[serde(default)]
    pub coordinates: Value,
}

impl Resource {
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// The GeoJSON features of this resource, or `None` when the resource has no
    /// spatial data or an empty feature collection.
    pub fn features(&self) -> Option<&[Feature]> {
        self.spatial
            .as_ref()
            .and_then(|spatial| spatial.geo_json.as_ref())
            .and_then(|geo_json| geo_json.features.as_deref())
            .filter(|features| !features.is_empty())
    }

    /// Splits the features into positionally aligned properties and coordinates.
    pub fn station_listing(&self) -> StationListing {
        match self.features() {
            Some(features) => StationListing::Stations {
                properties: features
                    .iter()
                    .map(|feature| feature.properties.clone().unwrap_or_default())
                    .collect(),
                coordinates: features
                    .iter()
                    .map(|feature| {
                        feature
                            .geometry
                            .as_ref()
                            .map(|geometry| geometry.coordinates.clone())
                            .unwrap_or(Value::Null)
                    })
                    .collect(),
            },
            None => StationListing::NoStations,
        }
    }

    /// One [`Station`] per feature, in feature order. Empty when there are no features.
    pub fn stations(&self) -> Vec<Station> {
        self.features()
            .map(|features| features.iter().map(Station::from_feature).collect())
            .unwrap_or_default()
    }
}

/// Some providers publish `geoJSON` as a JSON-encoded string, others as an object,
/// others not at all. Anything that does not decode counts as "no spatial data".
fn deserialize_lenient_geo_json<'de, D>(deserializer: D) -> Result<Option<GeoJson>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decode_leniently(Value::deserialize(deserializer)?, "geoJSON"))
}

/// A `spatial` block that is not an object (a bare country code, a list) only
/// drops the spatial data of that resource, not the whole catalog.
fn deserialize_lenient_spatial<'de, D>(deserializer: D) -> Result<Option<Spatial>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decode_leniently(Value::deserialize(deserializer)?, "spatial"))
}

/// Decodes an object, or a JSON string holding one. Anything else is logged and
/// dropped.
fn decode_leniently<T: DeserializeOwned>(raw: Value, field: &str) -> Option<T> {
    let raw = match raw {
        Value::Null => return None,
        Value::String(text) if text.trim().is_empty() => return None,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring undecodable {} in weather data source: {}", field, e);
                return None;
            }
        },
        other => other,
    };
    if !raw.is_object() {
        warn!("Ignoring {} in weather data source: expected an object", field);
        return None;
    }
    match serde_json::from_value::<T>(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Ignoring undecodable {} in weather data source: {}", field, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(spatial: Value) -> Resource {
        serde_json::from_value(json!({
            "name": "Test source",
            "description": "A source",
            "spatial": spatial,
        }))
        .unwrap()
    }

    #[test]
    fn object_geo_json_yields_aligned_listing() {
        let resource = resource(json!({
            "geoJSON": {
                "type": "FeatureCollection",
                "features": [
                    {"properties": {"name": "A", "id": 1}, "geometry": {"type": "Point", "coordinates": [10.0, 60.0]}},
                    {"properties": {"name": "B", "id": 2}, "geometry": null},
                    {"geometry": {"type": "Point", "coordinates": [11.0, 61.0, 120.0]}}
                ]
            }
        }));

        match resource.station_listing() {
            StationListing::Stations {
                properties,
                coordinates,
            } => {
                assert_eq!(properties.len(), 3);
                assert_eq!(coordinates.len(), 3);
                assert_eq!(properties[0]["name"], json!("A"));
                assert_eq!(coordinates[0], json!([10.0, 60.0]));
                assert_eq!(properties[1]["name"], json!("B"));
                assert_eq!(coordinates[1], Value::Null);
                assert!(properties[2].is_empty());
                assert_eq!(coordinates[2], json!([11.0, 61.0, 120.0]));
            }
            StationListing::NoStations => panic!("expected stations"),
        }
    }

    #[test]
    fn string_geo_json_is_decoded() {
        let resource = resource(json!({
            "geoJSON": "{\"type\":\"FeatureCollection\",\"features\":[{\"properties\":{\"id\":7},\"geometry\":{\"type\":\"Point\",\"coordinates\":[1.0,2.0]}}]}"
        }));
        assert_eq!(resource.station_listing().len(), 1);
        assert_eq!(resource.stations().len(), 1);
    }

    #[test]
    fn missing_or_broken_spatial_data_means_no_stations() {
        for spatial in [
            Value::Null,
            json!({}),
            json!({"countries": ["NOR"]}),
            json!({"geoJSON": null}),
            json!({"geoJSON": ""}),
            json!({"geoJSON": "not json"}),
            json!({"geoJSON": {"type": "FeatureCollection"}}),
            json!({"geoJSON": {"type": "FeatureCollection", "features": []}}),
        ] {
            let resource = resource(spatial.clone());
            assert_eq!(
                resource.station_listing(),
                StationListing::NoStations,
                "spatial: {spatial}"
            );
            assert!(resource.stations().is_empty());
        }
    }

    #[test]
    fn non_object_spatial_is_dropped_without_failing_the_record() {
        for spatial in [json!("FIN"), json!([]), json!(["FIN", "SWE"]), json!(42), json!({"countries": "FIN"})] {
            let resource = resource(spatial.clone());
            assert_eq!(resource.name, "Test source");
            assert!(resource.spatial.is_none(), "spatial: {spatial}");
            assert_eq!(resource.station_listing(), StationListing::NoStations);
        }
    }

    #[test]
    fn catalog_with_one_odd_spatial_still_decodes() {
        let resources: Vec<Resource> = serde_json::from_value(json!([
            {"name": "Odd", "spatial": "FIN"},
            {"name": "Fine", "spatial": {"geoJSON": {"features": [
                {"properties": {"id": 1}, "geometry": {"coordinates": [10.0, 60.0]}}
            ]}}}
        ]))
        .unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].station_listing(), StationListing::NoStations);
        assert_eq!(resources[1].station_listing().len(), 1);
    }

    #[test]
    fn polygon_coordinates_are_kept_verbatim() {
        let resource = resource(json!({
            "geoJSON": {"features": [
                {"properties": {"name": "Area"}, "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]}}
            ]}
        }));
        match resource.station_listing() {
            StationListing::Stations { coordinates, .. } => {
                assert_eq!(coordinates[0], json!([[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]));
            }
            StationListing::NoStations => panic!("expected stations"),
        }
        assert!(resource.stations()[0].location.is_none());
    }

    #[test]
    fn description_defaults_to_empty() {
        let resource: Resource = serde_json::from_value(json!({"name": "X", "description": null})).unwrap();
        assert_eq!(resource.description(), "");
    }
}
