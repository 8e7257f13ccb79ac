//! Boundary to the IPM Decisions platform.

pub mod error;
pub mod ipm_client;
pub mod query;

use crate::client::error::ClientError;
use crate::client::query::AdapterQuery;
use crate::types::resource::Resource;
use crate::types::weather_parameter::WeatherParameter;
use crate::types::weather_response::WeatherAdapterResponse;

/// The remote calls this crate needs from the platform.
///
/// [`ipm_client::IpmClient`] implements it over HTTP; tests and offline users can
/// provide their own implementation and hand it to
/// [`WeatherDataHub::with_service`](crate::WeatherDataHub::with_service).
pub trait IpmService {
    /// The weather data source catalog.
    fn weather_data_sources(&self) -> Result<Vec<Resource>, ClientError>;

    /// The weather parameter catalog.
    fn weather_parameters(&self) -> Result<Vec<WeatherParameter>, ClientError>;

    /// Calls the adapter at `endpoint` (a fully resolved URL).
    fn weather_adapter(
        &self,
        endpoint: &str,
        query: &AdapterQuery,
    ) -> Result<WeatherAdapterResponse, ClientError>;

    /// Value substituted for `{WEATHER_API_URL}` in endpoint templates.
    fn weather_api_url(&self) -> &str;
}
