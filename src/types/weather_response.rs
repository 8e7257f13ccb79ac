//! Typed schema of weather adapter responses.

use crate::client::error::ClientError;
use crate::error::IpmWeatherError;
use crate::types::date_range::DateRange;
use chrono::TimeDelta;
use serde::Deserialize;
use std::fmt;

const DEFAULT_FORECAST_INTERVAL: i64 = 3600;

/// Body returned by a weather adapter.
///
/// Missing required keys fail deserialization, which the client reports as
/// [`ClientError::JsonParse`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdapterResponse {
    #[serde(default)]
    pub time_start: Option<String>,
    #[serde(default)]
    pub time_end: Option<String>,
    /// Seconds between two rows of `data`.
    #[serde(default)]
    pub interval: Option<i64>,
    /// Column names of every `data` row.
    pub weather_parameters: Vec<ParameterKey>,
    pub location_weather_data: Vec<LocationWeatherData>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationWeatherData {
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub altitude: Option<f64>,
    /// One row per timestamp, one value per weather parameter.
    pub data: Vec<Vec<Option<f64>>>,
}

/// A weather parameter identifier. The platform sends integers, some adapters
/// send strings; both are kept as text and used as column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "RawParameterKey")]
pub struct ParameterKey(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawParameterKey {
    Number(i64),
    Text(String),
}

impl From<RawParameterKey> for ParameterKey {
    fn from(raw: RawParameterKey) -> Self {
        match raw {
            RawParameterKey::Number(n) => ParameterKey(n.to_string()),
            RawParameterKey::Text(text) => ParameterKey(text),
        }
    }
}

impl ParameterKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl WeatherAdapterResponse {
    /// The first (and for single-station requests, only) location block.
    pub fn location(&self) -> Result<&LocationWeatherData, ClientError> {
        self.location_weather_data
            .first()
            .ok_or_else(|| ClientError::MalformedResponse {
                message: "locationWeatherData is empty".to_string(),
            })
    }

    /// The time axis reported by the adapter itself, used for forecasts where the
    /// caller does not choose the window.
    pub fn reported_range(&self) -> Result<DateRange, IpmWeatherError> {
        let (Some(start), Some(end)) = (self.time_start.as_deref(), self.time_end.as_deref())
        else {
            return Err(ClientError::MalformedResponse {
                message: "response carries no timeStart/timeEnd".to_string(),
            }
            .into());
        };
        let interval = self.interval.unwrap_or(DEFAULT_FORECAST_INTERVAL);
        let frequency =
            TimeDelta::try_seconds(interval).ok_or_else(|| ClientError::MalformedResponse {
                message: format!("interval {interval} is out of range"),
            })?;
        Ok(DateRange::from_rfc3339(start, end, frequency)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_numeric_and_text_parameter_keys() {
        let response: WeatherAdapterResponse = serde_json::from_value(json!({
            "weatherParameters": [1002, "3002"],
            "locationWeatherData": [{"data": [[1.0, null]]}]
        }))
        .unwrap();
        assert_eq!(
            response.weather_parameters,
            vec![ParameterKey("1002".into()), ParameterKey("3002".into())]
        );
        assert_eq!(response.location().unwrap().data, vec![vec![Some(1.0), None]]);
    }

    #[test]
    fn missing_keys_fail_to_parse() {
        let parsed = serde_json::from_value::<WeatherAdapterResponse>(json!({
            "weatherParameters": [1002]
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_location_block_is_malformed() {
        let response: WeatherAdapterResponse = serde_json::from_value(json!({
            "weatherParameters": [1002],
            "locationWeatherData": []
        }))
        .unwrap();
        assert!(matches!(
            response.location(),
            Err(ClientError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn reported_range_uses_interval_or_hourly_default() {
        let response: WeatherAdapterResponse = serde_json::from_value(json!({
            "timeStart": "2021-03-01T00:00:00Z",
            "timeEnd": "2021-03-01T06:00:00Z",
            "weatherParameters": [1001],
            "locationWeatherData": [{"data": []}]
        }))
        .unwrap();
        let range = response.reported_range().unwrap();
        assert_eq!(range.len(), 7);
        assert_eq!(range.interval_seconds(), 3600);

        let without_bounds: WeatherAdapterResponse = serde_json::from_value(json!({
            "weatherParameters": [],
            "locationWeatherData": []
        }))
        .unwrap();
        assert!(matches!(
            without_bounds.reported_range(),
            Err(IpmWeatherError::Client(ClientError::MalformedResponse { .. }))
        ));
    }
}
