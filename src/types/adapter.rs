//! Weather adapters known to this crate and their binding to resource identifiers.

use std::fmt;

/// Placeholder the platform uses in adapter endpoint templates.
pub const WEATHER_API_URL_PLACEHOLDER: &str = "{WEATHER_API_URL}";

/// A weather adapter endpoint of the platform that this crate knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherAdapter {
    /// Finnish Meteorological Institute measured data, queried per station.
    Fmi,
    /// Met Norway Locationforecast, queried per location.
    Yr,
}

impl WeatherAdapter {
    pub fn id(&self) -> &'static str {
        match self {
            WeatherAdapter::Fmi => "fmi",
            WeatherAdapter::Yr => "yr",
        }
    }

    /// Endpoint template used when the catalog entry does not advertise one.
    pub fn default_endpoint(&self) -> String {
        format!(
            "{}/rest/weatheradapter/{}/",
            WEATHER_API_URL_PLACEHOLDER,
            self.id()
        )
    }

    /// Forecast adapters are queried by location instead of by station.
    pub fn is_forecast(&self) -> bool {
        matches!(self, WeatherAdapter::Yr)
    }
}

impl fmt::Display for WeatherAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// What a resource identifier is bound to: a callable adapter, or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AdapterBinding {
    Bound(WeatherAdapter),
    #[default]
    Unsupported,
}

impl AdapterBinding {
    pub fn adapter(&self) -> Option<WeatherAdapter> {
        match self {
            AdapterBinding::Bound(adapter) => Some(*adapter),
            AdapterBinding::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.adapter().is_some()
    }
}

/// Substitutes the `{WEATHER_API_URL}` placeholder of an endpoint template.
pub fn resolve_endpoint(template: &str, weather_api_url: &str) -> String {
    template.replace(
        WEATHER_API_URL_PLACEHOLDER,
        weather_api_url.trim_end_matches('/'),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_endpoints_resolve_against_api_url() {
        let url = resolve_endpoint(
            &WeatherAdapter::Fmi.default_endpoint(),
            "https://platform.ipmdecisions.net/api/wx/",
        );
        assert_eq!(
            url,
            "https://platform.ipmdecisions.net/api/wx/rest/weatheradapter/fmi/"
        );
    }

    #[test]
    fn templates_without_placeholder_are_untouched() {
        assert_eq!(
            resolve_endpoint("https://example.org/yr", "https://ignored"),
            "https://example.org/yr"
        );
    }

    #[test]
    fn only_yr_is_a_forecast_adapter() {
        assert!(WeatherAdapter::Yr.is_forecast());
        assert!(!WeatherAdapter::Fmi.is_forecast());
        assert_eq!(AdapterBinding::default(), AdapterBinding::Unsupported);
        assert!(!AdapterBinding::Unsupported.is_supported());
        assert_eq!(
            AdapterBinding::Bound(WeatherAdapter::Fmi).adapter(),
            Some(WeatherAdapter::Fmi)
        );
    }
}
