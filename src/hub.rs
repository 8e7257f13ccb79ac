use crate::catalog::resource_catalog::ResourceCatalog;
use crate::client::ipm_client::IpmClient;
use crate::client::IpmService;
use crate::data_source::WeatherDataSource;
use crate::error::{IpmWeatherError, NotSupportedError};
use crate::settings::HubSettings;
use crate::types::station::StationListing;
use crate::types::weather_parameter::WeatherParameter;
use log::info;
use std::collections::BTreeMap;

/// Represents a geographical coordinate using Latitude and Longitude.
///
/// Used as input for forecast requests and nearest-station searches.
///
/// # Examples
///
/// ```
/// use ipm_weather::LatLon;
///
/// let bodo = LatLon(67.2828, 14.3711);
/// assert_eq!(bodo.0, 67.2828); // Latitude
/// assert_eq!(bodo.1, 14.3711); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// The main entry point for IPM Decisions weather data.
///
/// A hub owns the remote service and the [`HubSettings`]. Every catalog operation
/// fetches a fresh copy of the weather data source catalog; nothing is cached.
///
/// # Examples
///
/// ```no_run
/// use ipm_weather::{IpmWeatherError, WeatherDataHub};
///
/// # fn main() -> Result<(), IpmWeatherError> {
/// let hub = WeatherDataHub::new()?;
/// for (name, description) in hub.list_resources()? {
///     println!("{name}: {description}");
/// }
///
/// if hub.resource_exists("Met Norway Locationforecast")? {
///     let yr = hub.get_resource("Met Norway Locationforecast")?;
///     assert!(yr.is_forecast());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct WeatherDataHub<S = IpmClient> {
    service: S,
    settings: HubSettings,
}

impl WeatherDataHub<IpmClient> {
    /// Creates a hub talking to the public platform with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`IpmWeatherError::Client`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self, IpmWeatherError> {
        Self::with_settings(HubSettings::default())
    }

    /// Creates a hub whose HTTP client follows `settings.base_url` and
    /// `settings.timeout`.
    pub fn with_settings(settings: HubSettings) -> Result<Self, IpmWeatherError> {
        let service = IpmClient::builder()
            .base_url(settings.base_url.clone())
            .maybe_timeout(settings.timeout)
            .build()?;
        Ok(Self::with_service(service, settings))
    }
}

impl<S: IpmService> WeatherDataHub<S> {
    /// Creates a hub over any [`IpmService`] implementation.
    pub fn with_service(service: S, settings: HubSettings) -> Self {
        Self { service, settings }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn settings(&self) -> &HubSettings {
        &self.settings
    }

    /// Fetches the current weather data source catalog.
    pub fn catalog(&self) -> Result<ResourceCatalog, IpmWeatherError> {
        Ok(ResourceCatalog::fetch(&self.service)?)
    }

    /// Name → description of every resource in the catalog.
    pub fn list_resources(&self) -> Result<BTreeMap<String, String>, IpmWeatherError> {
        Ok(self.catalog()?.list_resources())
    }

    /// Whether `name` exactly matches a resource name in the catalog.
    pub fn resource_exists(&self, name: &str) -> Result<bool, IpmWeatherError> {
        Ok(self.catalog()?.resource_exists(name))
    }

    /// Stations and coordinates of every resource, keyed by resource name.
    pub fn get_stations_and_coordinates(
        &self,
    ) -> Result<BTreeMap<String, StationListing>, IpmWeatherError> {
        Ok(self.catalog()?.get_stations_and_coordinates())
    }

    /// The platform's weather parameter catalog.
    pub fn list_parameters(&self) -> Result<Vec<WeatherParameter>, IpmWeatherError> {
        let parameters = self.service.weather_parameters()?;
        info!("Fetched {} weather parameters", parameters.len());
        Ok(parameters)
    }

    /// Returns a data source handle for the resource called `name`.
    ///
    /// # Errors
    ///
    /// * [`NotSupportedError::UnknownResource`] if the catalog has no resource of
    ///   that name.
    /// * [`IpmWeatherError::Client`] if the catalog cannot be fetched.
    pub fn get_resource(&self, name: &str) -> Result<WeatherDataSource<'_, S>, IpmWeatherError> {
        let catalog = self.catalog()?;
        let resource = catalog
            .find(name)
            .ok_or_else(|| NotSupportedError::UnknownResource(name.to_string()))?;
        Ok(WeatherDataSource::new(self, resource))
    }
}
