use crate::client::error::ClientError;
use crate::types::error::DateRangeError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IpmWeatherError {
    #[error(transparent)]
    NotSupported(#[from] NotSupportedError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    #[error("Weather adapter response has {found} {what}, expected {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Got {found} {what} for {expected} locations")]
    LocationCount {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Failed processing DataFrame")]
    Frame(#[from] PolarsError),
}

/// The requested operation cannot be served for this resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotSupportedError {
    #[error("The resource '{0}' is unknown or its name is misspelled")]
    UnknownResource(String),

    #[error("No weather adapter is implemented for resource '{resource}' (id: {id})")]
    NoAdapter { resource: String, id: String },

    #[error("Resource '{0}' does not serve location forecasts")]
    NotForecast(String),
}

/// The catalog has no data of the requested kind for this resource.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("Resource '{0}' is no longer listed in the weather data source catalog")]
    Resource(String),

    #[error("No station information for resource '{0}'")]
    Stations(String),

    #[error("No parameter information for resource '{0}'")]
    Parameters(String),
}
