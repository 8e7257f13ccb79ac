/// Query parameters of a weather adapter request.
#[derive(Debug, Clone, PartialEq)]
pub enum AdapterQuery {
    /// Observations of one station over a time window.
    Station {
        station_id: String,
        time_start: String,
        time_end: String,
        /// Seconds between two rows.
        interval: i64,
        parameters: Vec<u32>,
    },
    /// Forecast for a point; the adapter picks the time window.
    Location {
        latitude: f64,
        longitude: f64,
        altitude: Option<f64>,
    },
}

impl AdapterQuery {
    /// Query string pairs, named the way the platform expects them.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            AdapterQuery::Station {
                station_id,
                time_start,
                time_end,
                interval,
                parameters,
            } => vec![
                ("weatherStationId", station_id.clone()),
                ("timeStart", time_start.clone()),
                ("timeEnd", time_end.clone()),
                ("interval", interval.to_string()),
                ("parameters", join_parameters(parameters)),
            ],
            AdapterQuery::Location {
                latitude,
                longitude,
                altitude,
            } => {
                let mut pairs = vec![
                    ("latitude", latitude.to_string()),
                    ("longitude", longitude.to_string()),
                ];
                if let Some(altitude) = altitude {
                    pairs.push(("altitude", altitude.to_string()));
                }
                pairs
            }
        }
    }
}

fn join_parameters(parameters: &[u32]) -> String {
    parameters
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_query_pairs() {
        let query = AdapterQuery::Station {
            station_id: "101104".into(),
            time_start: "2020-06-12T00:00:00Z".into(),
            time_end: "2020-07-03T00:00:00Z".into(),
            interval: 3600,
            parameters: vec![1002, 3002],
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("weatherStationId", "101104".to_string()),
                ("timeStart", "2020-06-12T00:00:00Z".to_string()),
                ("timeEnd", "2020-07-03T00:00:00Z".to_string()),
                ("interval", "3600".to_string()),
                ("parameters", "1002,3002".to_string()),
            ]
        );
    }

    #[test]
    fn location_query_skips_missing_altitude() {
        let query = AdapterQuery::Location {
            latitude: 67.2828,
            longitude: 14.3711,
            altitude: None,
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("latitude", "67.2828".to_string()),
                ("longitude", "14.3711".to_string()),
            ]
        );

        let with_altitude = AdapterQuery::Location {
            latitude: 1.0,
            longitude: 2.5,
            altitude: Some(70.0),
        };
        assert_eq!(with_altitude.to_pairs()[2], ("altitude", "70".to_string()));
    }
}
