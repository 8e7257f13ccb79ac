//! In-memory `IpmService` serving fixture JSON for unit tests.

use crate::client::error::ClientError;
use crate::client::query::AdapterQuery;
use crate::client::IpmService;
use crate::types::date_range::DateRange;
use crate::types::resource::Resource;
use crate::types::weather_parameter::WeatherParameter;
use crate::types::weather_response::WeatherAdapterResponse;
use chrono::TimeDelta;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};

pub const MOCK_API_URL: &str = "http://mock.invalid/api/wx";

/// Station id for which the mock adapter fails.
pub const BROKEN_STATION: &str = "broken";

pub fn catalog_json() -> Value {
    json!([
        {
            "id": "net.ipmdecisions.weather.fmi",
            "name": "Finnish Meteorological Institute measured data",
            "description": "Measured data from FMI weather stations",
            "endpoint": "{WEATHER_API_URL}/rest/weatheradapter/fmi/",
            "access_type": "stations",
            "parameters": {"common": [1002, 2001, 3002], "optional": [4002]},
            "spatial": {
                "countries": ["FIN"],
                "geoJSON": {
                    "type": "FeatureCollection",
                    "features": [
                        {
                            "type": "Feature",
                            "properties": {"name": "Helsinki Kumpula", "id": 101004},
                            "geometry": {"type": "Point", "coordinates": [24.96, 60.20]}
                        },
                        {
                            "type": "Feature",
                            "properties": {"name": "Bodø", "id": "101104"},
                            "geometry": {"type": "Point", "coordinates": [14.3711, 67.2828, 70.0]}
                        }
                    ]
                }
            }
        },
        {
            "id": "no.met.locationforecast",
            "name": "Met Norway Locationforecast",
            "description": "Location forecasts from MET Norway",
            "access_type": "location",
            "parameters": {"common": [1001, 3001]},
            "spatial": {
                "countries": ["NOR"],
                "geoJSON": "{\"type\":\"FeatureCollection\",\"features\":[]}"
            }
        },
        {
            "name": "Landbruksmeteorologisk tjeneste",
            "description": "Norwegian agrometeorological service",
            "parameters": {"common": [1002]},
            "spatial": {
                "geoJSON": "{\"type\":\"FeatureCollection\",\"features\":[{\"type\":\"Feature\",\"properties\":{\"name\":\"Apelsvoll\",\"id\":11},\"geometry\":{\"type\":\"Point\",\"coordinates\":[10.86,60.70]}}]}"
            }
        },
        {
            "name": "Fruitweb",
            "description": "Fruitweb stations",
            "spatial": null
        },
        {
            "name": "Metos",
            "description": null,
            "spatial": {"countries": ["AUT"]}
        },
        {
            "name": "MeteoBot API",
            "description": "MeteoBot stations",
            "spatial": {}
        }
    ])
}

pub fn parameters_json() -> Value {
    json!([
        {"id": 1002, "name": "Mean air temperature at 2m", "description": "Mean air temperature", "unit": "Celcius"},
        {"id": 3002, "name": "Mean RH at 2m", "unit": "%"},
        {"id": 2001, "name": "Precipitation"},
        {"id": 1001, "name": "Instantaneous temperature at 2m", "unit": "Celcius"}
    ])
}

#[derive(Debug)]
pub struct MockService {
    resources: Value,
    response: Option<Value>,
    fail: bool,
    calls: RefCell<Vec<(String, AdapterQuery)>>,
    catalog_requests: Cell<usize>,
    parameter_requests: Cell<usize>,
}

impl MockService {
    pub fn new(resources: Value) -> Self {
        Self {
            resources,
            response: None,
            fail: false,
            calls: RefCell::new(Vec::new()),
            catalog_requests: Cell::new(0),
            parameter_requests: Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Value::Null)
        }
    }

    /// Serve `response` verbatim from every adapter call instead of synthesizing one.
    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    pub fn adapter_calls(&self) -> Vec<(String, AdapterQuery)> {
        self.calls.borrow().clone()
    }

    pub fn catalog_requests(&self) -> usize {
        self.catalog_requests.get()
    }

    pub fn parameter_requests(&self) -> usize {
        self.parameter_requests.get()
    }

    fn failure() -> ClientError {
        ClientError::MalformedResponse {
            message: "mock failure".to_string(),
        }
    }

    fn parse<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, ClientError> {
        serde_json::from_value(value).map_err(|e| ClientError::JsonParse {
            url: MOCK_API_URL.to_string(),
            source: e,
        })
    }
}

/// Builds an adapter answer consistent with the query: one row per requested
/// timestamp, value = parameter id + row index.
fn synthesize(query: &AdapterQuery) -> Result<Value, ClientError> {
    match query {
        AdapterQuery::Station {
            station_id,
            time_start,
            time_end,
            interval,
            parameters,
        } => {
            if station_id == BROKEN_STATION {
                return Err(MockService::failure());
            }
            let range = DateRange::from_rfc3339(time_start, time_end, TimeDelta::seconds(*interval))
                .map_err(|_| MockService::failure())?;
            let rows: Vec<Vec<f64>> = (0..range.len())
                .map(|row| parameters.iter().map(|p| f64::from(*p) + row as f64).collect())
                .collect();
            Ok(json!({
                "timeStart": time_start,
                "timeEnd": time_end,
                "interval": interval,
                "weatherParameters": parameters,
                "locationWeatherData": [{
                    "longitude": 14.3711,
                    "latitude": 67.2828,
                    "altitude": 70.0,
                    "data": rows
                }]
            }))
        }
        AdapterQuery::Location {
            latitude,
            longitude,
            altitude,
        } => Ok(json!({
            "timeStart": "2021-03-01T00:00:00Z",
            "timeEnd": "2021-03-01T05:00:00Z",
            "interval": 3600,
            "weatherParameters": [1001, 3001],
            "locationWeatherData": [{
                "longitude": longitude,
                "latitude": latitude,
                "altitude": altitude,
                "data": [[1.0, 80.0], [1.5, 81.0], [2.0, 82.0], [2.5, 83.0], [3.0, 84.0], [3.5, 85.0]]
            }]
        })),
    }
}

impl IpmService for MockService {
    fn weather_data_sources(&self) -> Result<Vec<Resource>, ClientError> {
        self.catalog_requests.set(self.catalog_requests.get() + 1);
        if self.fail {
            return Err(Self::failure());
        }
        Self::parse(self.resources.clone())
    }

    fn weather_parameters(&self) -> Result<Vec<WeatherParameter>, ClientError> {
        self.parameter_requests.set(self.parameter_requests.get() + 1);
        if self.fail {
            return Err(Self::failure());
        }
        Self::parse(parameters_json())
    }

    fn weather_adapter(
        &self,
        endpoint: &str,
        query: &AdapterQuery,
    ) -> Result<WeatherAdapterResponse, ClientError> {
        self.calls
            .borrow_mut()
            .push((endpoint.to_string(), query.clone()));
        if self.fail {
            return Err(Self::failure());
        }
        let body = match &self.response {
            Some(response) => response.clone(),
            None => synthesize(query)?,
        };
        Self::parse(body)
    }

    fn weather_api_url(&self) -> &str {
        MOCK_API_URL
    }
}
