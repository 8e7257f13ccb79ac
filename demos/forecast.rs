use ipm_weather::{IpmWeatherError, LatLon, WeatherDataHub};

fn main() -> Result<(), IpmWeatherError> {
    let hub = WeatherDataHub::new()?;
    let yr = hub.get_resource("Met Norway Locationforecast")?;

    let oslo = yr
        .get_forecast()
        .location(LatLon(59.94, 10.72))
        .altitude(94.0)
        .call()?;
    println!("{}", oslo.frame);

    let coast = yr
        .get_forecast_for_locations()
        .locations(&[LatLon(60.39, 5.32), LatLon(67.28, 14.40)])
        .call()?;
    println!("{coast}");

    Ok(())
}
