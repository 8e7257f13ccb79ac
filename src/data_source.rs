//! Handle on one resource of the catalog: its stations, parameters and the
//! weather adapter it is bound to.

use crate::client::ipm_client::IpmClient;
use crate::client::query::AdapterQuery;
use crate::client::IpmService;
use crate::error::{IpmWeatherError, NotFoundError, NotSupportedError};
use crate::hub::{LatLon, WeatherDataHub};
use crate::stations::locate_station::StationLocator;
use crate::types::adapter::{resolve_endpoint, AdapterBinding, WeatherAdapter};
use crate::types::date_range::DateRange;
use crate::types::resource::Resource;
use crate::types::station::{stations_to_frame, Station};
use crate::types::weather_frame::{
    FrameLocation, WeatherFrame, LATITUDE_COLUMN, LONGITUDE_COLUMN, STATION_COLUMN,
};
use bon::bon;
use log::{debug, info};
use polars::prelude::{Column, DataFrame, PolarsResult};
use serde_json::Value;

/// A weather data source (resource) selected from the catalog by name.
///
/// Created by [`WeatherDataHub::get_resource`]. Station and parameter lookups
/// fetch the catalog again; data requests go to the bound weather adapter.
#[derive(Debug)]
pub struct WeatherDataSource<'a, S = IpmClient> {
    hub: &'a WeatherDataHub<S>,
    name: String,
    resource_id: Option<String>,
    binding: AdapterBinding,
    catalog_endpoint: Option<String>,
}

#[bon]
impl<'a, S: IpmService> WeatherDataSource<'a, S> {
    pub fn new(hub: &'a WeatherDataHub<S>, resource: &Resource) -> Self {
        let settings = hub.settings();
        let resource_id = settings.resource_id(&resource.name).map(str::to_string);
        let binding = resource_id
            .as_deref()
            .map(|id| settings.binding(id))
            .unwrap_or_default();
        debug!(
            "Resource '{}' has id {:?} and binding {:?}",
            resource.name, resource_id, binding
        );
        Self {
            hub,
            name: resource.name.clone(),
            resource_id,
            binding,
            catalog_endpoint: resource.endpoint.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short identifier from the name table, `None` for names it does not list.
    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn binding(&self) -> AdapterBinding {
        self.binding
    }

    pub fn is_forecast(&self) -> bool {
        self.binding.adapter().is_some_and(|a| a.is_forecast())
    }

    /// The bound adapter.
    ///
    /// # Errors
    ///
    /// [`NotSupportedError::NoAdapter`] when this resource has no implemented adapter.
    pub fn adapter(&self) -> Result<WeatherAdapter, IpmWeatherError> {
        self.binding.adapter().ok_or_else(|| {
            NotSupportedError::NoAdapter {
                resource: self.name.clone(),
                id: self.resource_id.clone().unwrap_or_else(|| "none".to_string()),
            }
            .into()
        })
    }

    /// Adapter URL with `{WEATHER_API_URL}` substituted. Uses the endpoint the
    /// catalog advertised for this resource, else the adapter's default path.
    pub fn endpoint(&self) -> Result<String, IpmWeatherError> {
        let adapter = self.adapter()?;
        let template = self
            .catalog_endpoint
            .clone()
            .unwrap_or_else(|| adapter.default_endpoint());
        Ok(resolve_endpoint(
            &template,
            self.hub.service().weather_api_url(),
        ))
    }

    fn resource(&self) -> Result<Resource, IpmWeatherError> {
        self.hub
            .catalog()?
            .find(&self.name)
            .cloned()
            .ok_or_else(|| NotFoundError::Resource(self.name.clone()).into())
    }

    fn stations(&self) -> Result<Vec<Station>, IpmWeatherError> {
        let stations = self.resource()?.stations();
        if stations.is_empty() {
            return Err(NotFoundError::Stations(self.name.clone()).into());
        }
        Ok(stations)
    }

    /// Station table of this resource: `name`, `id`, `longitude`, `latitude`,
    /// `altitude`, one row per station.
    ///
    /// # Errors
    ///
    /// [`NotFoundError::Stations`] if the catalog lists no stations for it.
    pub fn get_station_ids(&self) -> Result<DataFrame, IpmWeatherError> {
        let stations = self.stations()?;
        Ok(stations_to_frame(&stations)?)
    }

    /// The `parameters` entry of this resource in the catalog, verbatim.
    pub fn list_available_parameters(&self) -> Result<Value, IpmWeatherError> {
        self.resource()?
            .parameters
            .filter(|parameters| !parameters.is_null())
            .ok_or_else(|| NotFoundError::Parameters(self.name.clone()).into())
    }

    /// Fetches `parameters` of one station for every timestamp of `date_range`.
    ///
    /// * `.parameters(&[u32])`: **Required.** Weather parameter ids.
    /// * `.station_id(&str)`: **Required.** Station identifier, see
    ///   [`get_station_ids`](Self::get_station_ids).
    /// * `.date_range(&DateRange)`: **Required.** Timestamps to request; the rows of
    ///   the result follow it one to one.
    ///
    /// # Errors
    ///
    /// * [`NotSupportedError::NoAdapter`] without contacting the platform, if the
    ///   resource has no adapter.
    /// * [`IpmWeatherError::Client`] on request or decoding failures.
    /// * [`IpmWeatherError::ShapeMismatch`] if the answer does not fit the range.
    ///
    /// Besides the adapter call this fetches the parameter catalog once, to fill
    /// [`WeatherFrame::parameter_meta`].
    #[builder]
    pub fn get_data(
        &self,
        parameters: &[u32],
        station_id: &str,
        date_range: &DateRange,
    ) -> Result<WeatherFrame, IpmWeatherError> {
        let endpoint = self.endpoint()?;
        let weather = self.station_frame(&endpoint, parameters, station_id, date_range)?;
        let catalog = self.hub.service().weather_parameters()?;
        Ok(weather.with_parameter_meta(&catalog))
    }

    fn station_frame(
        &self,
        endpoint: &str,
        parameters: &[u32],
        station_id: &str,
        date_range: &DateRange,
    ) -> Result<WeatherFrame, IpmWeatherError> {
        let query = AdapterQuery::Station {
            station_id: station_id.to_string(),
            time_start: date_range.time_start(),
            time_end: date_range.time_end(),
            interval: date_range.interval_seconds(),
            parameters: parameters.to_vec(),
        };
        info!(
            "Fetching {} parameters of station {} from '{}' for {}",
            parameters.len(),
            station_id,
            self.name,
            date_range
        );
        let response = self.hub.service().weather_adapter(endpoint, &query)?;
        WeatherFrame::from_response(
            &self.name,
            FrameLocation::Station(station_id.to_string()),
            &response,
            date_range,
        )
    }

    /// Fetches each station in turn and stacks the frames, with a leading
    /// `station_id` column. The first failing station aborts the whole request.
    ///
    /// The stacked frame carries no parameter metadata; see
    /// [`WeatherDataHub::list_parameters`].
    #[builder]
    pub fn get_data_for_stations(
        &self,
        parameters: &[u32],
        station_ids: &[&str],
        date_range: &DateRange,
    ) -> Result<DataFrame, IpmWeatherError> {
        let endpoint = self.endpoint()?;
        let mut stacked: Option<DataFrame> = None;
        for station_id in station_ids {
            let weather = self.station_frame(&endpoint, parameters, station_id, date_range)?;
            let station_column = Column::new(
                STATION_COLUMN.into(),
                vec![*station_id; weather.height()],
            );
            let frame = prepend_columns(&weather.frame, vec![station_column])?;
            stack_frame(&mut stacked, &frame)?;
        }
        Ok(stacked.unwrap_or_default())
    }

    /// Location forecast from a forecast adapter.
    ///
    /// * `.location(LatLon)`: **Required.**
    /// * `.altitude(f64)`: Optional. Metres above sea level.
    ///
    /// The time axis is the one reported by the adapter. Like
    /// [`get_data`](Self::get_data), this also fetches the parameter catalog.
    #[builder]
    pub fn get_forecast(
        &self,
        location: LatLon,
        altitude: Option<f64>,
    ) -> Result<WeatherFrame, IpmWeatherError> {
        let endpoint = self.forecast_endpoint()?;
        let weather = self.forecast_frame(&endpoint, location, altitude)?;
        let catalog = self.hub.service().weather_parameters()?;
        Ok(weather.with_parameter_meta(&catalog))
    }

    /// Forecasts for several points, stacked with leading `latitude` and
    /// `longitude` columns holding the requested location.
    ///
    /// * `.locations(&[LatLon])`: **Required.**
    /// * `.altitudes(&[f64])`: Optional. One altitude per location.
    ///
    /// # Errors
    ///
    /// [`IpmWeatherError::LocationCount`] before any remote call when the number of
    /// altitudes differs from the number of locations.
    #[builder]
    pub fn get_forecast_for_locations(
        &self,
        locations: &[LatLon],
        altitudes: Option<&[f64]>,
    ) -> Result<DataFrame, IpmWeatherError> {
        let endpoint = self.forecast_endpoint()?;
        if let Some(altitudes) = altitudes {
            if altitudes.len() != locations.len() {
                return Err(IpmWeatherError::LocationCount {
                    what: "altitudes",
                    expected: locations.len(),
                    found: altitudes.len(),
                });
            }
        }

        let mut stacked: Option<DataFrame> = None;
        for (index, location) in locations.iter().enumerate() {
            let altitude = altitudes.and_then(|altitudes| altitudes.get(index).copied());
            let weather = self.forecast_frame(&endpoint, *location, altitude)?;
            let rows = weather.height();
            let frame = prepend_columns(
                &weather.frame,
                vec![
                    Column::new(LATITUDE_COLUMN.into(), vec![location.0; rows]),
                    Column::new(LONGITUDE_COLUMN.into(), vec![location.1; rows]),
                ],
            )?;
            stack_frame(&mut stacked, &frame)?;
        }
        Ok(stacked.unwrap_or_default())
    }

    fn forecast_endpoint(&self) -> Result<String, IpmWeatherError> {
        if !self.adapter()?.is_forecast() {
            return Err(NotSupportedError::NotForecast(self.name.clone()).into());
        }
        self.endpoint()
    }

    fn forecast_frame(
        &self,
        endpoint: &str,
        location: LatLon,
        altitude: Option<f64>,
    ) -> Result<WeatherFrame, IpmWeatherError> {
        let query = AdapterQuery::Location {
            latitude: location.0,
            longitude: location.1,
            altitude,
        };
        info!("Fetching forecast for {:?} from '{}'", location, self.name);
        let response = self.hub.service().weather_adapter(endpoint, &query)?;
        let date_range = response.reported_range()?;
        WeatherFrame::from_response(
            &self.name,
            FrameLocation::Point(location),
            &response,
            &date_range,
        )
    }

    /// Stations of this resource closest to `location`, paired with their distance
    /// in kilometres.
    ///
    /// * `.location(LatLon)`: **Required.**
    /// * `.limit(usize)`: Optional. Defaults to `5`.
    /// * `.max_distance_km(f64)`: Optional. Defaults to `50.0`.
    #[builder]
    pub fn nearest_stations(
        &self,
        location: LatLon,
        limit: Option<usize>,
        max_distance_km: Option<f64>,
    ) -> Result<Vec<(Station, f64)>, IpmWeatherError> {
        let locator = StationLocator::new(self.stations()?);
        Ok(locator.query(
            location.0,
            location.1,
            limit.unwrap_or(5),
            max_distance_km.unwrap_or(50.0),
        ))
    }
}

fn prepend_columns(frame: &DataFrame, leading: Vec<Column>) -> PolarsResult<DataFrame> {
    let mut columns = leading;
    columns.extend(frame.get_columns().iter().cloned());
    DataFrame::new(columns)
}

fn stack_frame(stacked: &mut Option<DataFrame>, frame: &DataFrame) -> PolarsResult<()> {
    match stacked.as_mut() {
        Some(stacked) => {
            stacked.vstack_mut(frame)?;
        }
        None => *stacked = Some(frame.clone()),
    }
    Ok(())
}
