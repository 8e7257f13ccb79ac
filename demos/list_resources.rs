use ipm_weather::{IpmWeatherError, LatLon, StationListing, WeatherDataHub};

fn main() -> Result<(), IpmWeatherError> {
    let hub = WeatherDataHub::new()?;

    let listings = hub.get_stations_and_coordinates()?;
    for (name, listing) in &listings {
        println!("{name}: {listing}");
    }
    let with_stations = listings
        .values()
        .filter(|listing| !matches!(listing, StationListing::NoStations))
        .count();
    println!("{with_stations} of {} resources list stations", listings.len());

    let fmi = hub.get_resource("Finnish Meteorological Institute measured data")?;
    let nearby = fmi
        .nearest_stations()
        .location(LatLon(60.17, 24.94))
        .limit(3)
        .call()?;
    for (station, km) in nearby {
        println!("{:?} {:?}: {km:.1} km", station.id, station.name);
    }

    Ok(())
}
