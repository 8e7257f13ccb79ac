mod catalog;
mod client;
mod data_source;
mod error;
mod hub;
mod settings;
mod stations;
#[cfg(test)]
mod test_support;
mod types;

pub use error::{IpmWeatherError, NotFoundError, NotSupportedError};
pub use hub::*;
pub use data_source::WeatherDataSource;
pub use settings::HubSettings;

pub use catalog::resource_catalog::ResourceCatalog;
pub use client::error::ClientError;
pub use client::ipm_client::{IpmClient, DEFAULT_BASE_URL};
pub use client::query::AdapterQuery;
pub use client::IpmService;
pub use stations::locate_station::StationLocator;

pub use types::adapter::*;
pub use types::date_range::*;
pub use types::error::DateRangeError;
pub use types::resource::*;
pub use types::station::*;
pub use types::weather_frame::*;
pub use types::weather_parameter::WeatherParameter;
pub use types::weather_response::*;
