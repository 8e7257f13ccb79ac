use serde::{Deserialize, Serialize};

/// An entry of the platform's weather parameter catalog (`/wx/rest/parameter`),
/// e.g. `1002`: mean air temperature at 2 m, in Celsius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherParameter {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}
