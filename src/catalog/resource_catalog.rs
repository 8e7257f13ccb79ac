//! A fetched snapshot of the weather data source catalog and the lookup views
//! derived from it.

use crate::client::error::ClientError;
use crate::client::IpmService;
use crate::types::resource::Resource;
use crate::types::station::StationListing;
use log::info;
use std::collections::BTreeMap;

/// Resource records as returned by one catalog request.
///
/// Snapshots are never refreshed; fetch a new one to see catalog changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceCatalog {
    resources: Vec<Resource>,
}

impl ResourceCatalog {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Fetches the current catalog with one remote call.
    pub fn fetch<S: IpmService + ?Sized>(service: &S) -> Result<Self, ClientError> {
        let resources = service.weather_data_sources()?;
        info!("Fetched {} weather data sources", resources.len());
        Ok(Self::new(resources))
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.iter().map(|r| r.name.as_str())
    }

    /// Name → description of every resource.
    pub fn list_resources(&self) -> BTreeMap<String, String> {
        self.resources
            .iter()
            .map(|r| (r.name.clone(), r.description().to_string()))
            .collect()
    }

    pub fn resource_exists(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }

    pub fn find(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Stations of every resource, keyed by resource name. Resources without
    /// spatial features map to [`StationListing::NoStations`].
    pub fn get_stations_and_coordinates(&self) -> BTreeMap<String, StationListing> {
        self.resources
            .iter()
            .map(|r| (r.name.clone(), r.station_listing()))
            .collect()
    }
}
