use crate::types::station::{IndexedStation, Station};
use haversine::{distance, Location as HaversineLocation, Units};
use log::debug;
use ordered_float::OrderedFloat;
use rstar::RTree;

/// Nearest-neighbour index over the stations of one resource.
///
/// Stations without coordinates are left out of the index.
#[derive(Debug, Clone)]
pub struct StationLocator {
    rtree: RTree<IndexedStation>,
}

impl StationLocator {
    pub fn new(stations: impl IntoIterator<Item = Station>) -> Self {
        let indexed: Vec<IndexedStation> = stations
            .into_iter()
            .filter_map(IndexedStation::new)
            .collect();
        debug!("Indexed {} stations with coordinates", indexed.len());
        StationLocator {
            rtree: RTree::bulk_load(indexed),
        }
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }

    /// Up to `n_results` stations within `max_distance_km`, closest first, paired
    /// with their great-circle distance in kilometres.
    pub fn query(
        &self,
        latitude: f64,
        longitude: f64,
        n_results: usize,
        max_distance_km: f64,
    ) -> Vec<(Station, f64)> {
        if n_results == 0 {
            return vec![];
        }
        let query_point = [latitude, longitude];

        // Planar degree distance and haversine can disagree on ordering, so
        // look at more candidates than asked for.
        let candidate_limit = (n_results * 2).max(20);

        let mut stations_with_dist: Vec<(Station, f64)> = self
            .rtree
            .nearest_neighbor_iter(&query_point)
            .take(candidate_limit)
            .filter_map(|indexed| {
                let dist_km = distance(
                    HaversineLocation {
                        latitude,
                        longitude,
                    },
                    HaversineLocation {
                        latitude: indexed.location.latitude,
                        longitude: indexed.location.longitude,
                    },
                    Units::Kilometers,
                );
                (dist_km <= max_distance_km).then(|| (indexed.station.clone(), dist_km))
            })
            .collect();

        stations_with_dist.sort_by_key(|(_, dist_km)| OrderedFloat(*dist_km));
        stations_with_dist.truncate(n_results);
        stations_with_dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::station::Location;
    use serde_json::Map;

    fn station(id: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id: Some(id.to_string()),
            name: Some(format!("Station {id}")),
            properties: Map::new(),
            location: Some(Location {
                latitude,
                longitude,
                altitude: None,
            }),
        }
    }

    fn locator() -> StationLocator {
        StationLocator::new(vec![
            station("helsinki", 60.2033, 24.9611),
            station("espoo", 60.1786, 24.6536),
            station("vantaa", 60.3267, 24.9564),
            station("tampere", 61.4178, 23.6203),
            Station {
                id: Some("nowhere".to_string()),
                name: None,
                properties: Map::new(),
                location: None,
            },
        ])
    }

    #[test]
    fn skips_stations_without_coordinates() {
        assert_eq!(locator().len(), 4);
        assert!(StationLocator::new(Vec::new()).is_empty());
    }

    #[test]
    fn returns_closest_first() {
        let result = locator().query(60.17, 24.94, 3, 50.0);
        let ids: Vec<&str> = result
            .iter()
            .map(|(s, _)| s.id.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(ids, vec!["helsinki", "espoo", "vantaa"]);
        assert!(result.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(result[0].1 < 5.0);
    }

    #[test]
    fn respects_max_distance() {
        let result = locator().query(60.17, 24.94, 10, 50.0);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|(_, d)| *d <= 50.0));

        let wide = locator().query(60.17, 24.94, 10, 500.0);
        assert_eq!(wide.len(), 4);
    }

    #[test]
    fn zero_results_requested() {
        assert!(locator().query(60.17, 24.94, 0, 50.0).is_empty());
    }
}
