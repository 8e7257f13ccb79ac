use chrono::NaiveDate;
use ipm_weather::{DateRange, IpmWeatherError, WeatherDataHub};
use std::env;

fn main() -> Result<(), IpmWeatherError> {
    configure_polars_display();
    let hub = WeatherDataHub::new()?;
    let fmi = hub.get_resource("Finnish Meteorological Institute measured data")?;

    println!("{}", fmi.get_station_ids()?);
    println!("{:#}", fmi.list_available_parameters()?);

    let day = NaiveDate::from_ymd_opt(2020, 6, 12).unwrap();
    let range = DateRange::builder()
        .start(day.and_hms_opt(0, 0, 0).unwrap())
        .end(day.and_hms_opt(23, 0, 0).unwrap())
        .build()?;

    let weather = fmi
        .get_data()
        .parameters(&[1002, 3002])
        .station_id("101104")
        .date_range(&range)
        .call()?;

    for column in weather.parameters() {
        let meta = weather.parameter_meta.get(&column);
        println!(
            "{column}: {} [{}]",
            meta.map(|p| p.name.as_str()).unwrap_or("?"),
            weather.unit(&column).unwrap_or("-")
        );
    }
    println!("{}", weather.frame);

    let both = fmi
        .get_data_for_stations()
        .parameters(&[1002])
        .station_ids(&["101104", "101004"])
        .date_range(&range)
        .call()?;
    println!("{both}");

    Ok(())
}

fn configure_polars_display() {
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    env::set_var("POLARS_FMT_MAX_ROWS", "24");
}
