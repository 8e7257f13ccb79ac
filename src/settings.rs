//! Explicit configuration of a [`WeatherDataHub`](crate::WeatherDataHub): where the
//! platform lives and which resources map to which adapters.

use crate::client::ipm_client::DEFAULT_BASE_URL;
use crate::types::adapter::{AdapterBinding, WeatherAdapter};
use bon::Builder;
use std::collections::HashMap;
use std::time::Duration;

/// Settings shared by a hub and every data source it hands out.
///
/// Built once and never mutated. [`HubSettings::default`] carries the platform's
/// known resources; override the tables to register other names or identifiers.
///
/// # Examples
///
/// ```
/// use ipm_weather::{AdapterBinding, HubSettings, WeatherAdapter};
/// use std::time::Duration;
///
/// let settings = HubSettings::builder()
///     .base_url("https://test.ipmdecisions.net/api")
///     .timeout(Duration::from_secs(30))
///     .build();
///
/// assert_eq!(settings.resource_id("MeteoBot API"), Some("metobot"));
/// assert_eq!(settings.binding("fmi"), AdapterBinding::Bound(WeatherAdapter::Fmi));
/// assert_eq!(settings.binding("lmt"), AdapterBinding::Unsupported);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct HubSettings {
    /// Platform API root.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    /// Optional whole-request timeout for the HTTP client.
    pub timeout: Option<Duration>,
    /// Resource display name → short resource identifier.
    #[builder(default = default_resource_ids())]
    pub resource_ids: HashMap<String, String>,
    /// Short resource identifier → adapter binding. Identifiers missing here are
    /// treated as [`AdapterBinding::Unsupported`].
    #[builder(default = default_adapter_bindings())]
    pub adapters: HashMap<String, AdapterBinding>,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HubSettings {
    pub fn resource_id(&self, name: &str) -> Option<&str> {
        self.resource_ids.get(name).map(String::as_str)
    }

    pub fn binding(&self, resource_id: &str) -> AdapterBinding {
        self.adapters.get(resource_id).copied().unwrap_or_default()
    }

    /// Binding for a resource display name, through both tables.
    pub fn binding_for_name(&self, name: &str) -> AdapterBinding {
        self.resource_id(name)
            .map(|id| self.binding(id))
            .unwrap_or_default()
    }
}

pub fn default_resource_ids() -> HashMap<String, String> {
    [
        ("Met Norway Locationforecast", "yr"),
        ("Finnish Meteorological Institute measured data", "fmi"),
        ("FMI weather forecasts", "fmi_forecasts"),
        ("Landbruksmeteorologisk tjeneste", "lmt"),
        ("MeteoBot API", "metobot"),
        ("Fruitweb", "fw"),
        ("Metos", "metos"),
    ]
    .into_iter()
    .map(|(name, id)| (name.to_string(), id.to_string()))
    .collect()
}

pub fn default_adapter_bindings() -> HashMap<String, AdapterBinding> {
    [
        ("fmi", AdapterBinding::Bound(WeatherAdapter::Fmi)),
        ("yr", AdapterBinding::Bound(WeatherAdapter::Yr)),
        ("lmt", AdapterBinding::Unsupported),
        ("meteobot", AdapterBinding::Unsupported),
        ("fw", AdapterBinding::Unsupported),
        ("metos", AdapterBinding::Unsupported),
    ]
    .into_iter()
    .map(|(id, binding)| (id.to_string(), binding))
    .collect()
}
