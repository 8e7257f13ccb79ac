//! Contains the `WeatherFrame` structure holding weather adapter data as a Polars
//! `DataFrame` indexed by timestamp.

use crate::error::IpmWeatherError;
use crate::hub::LatLon;
use crate::types::date_range::DateRange;
use crate::types::station::Location;
use crate::types::weather_parameter::WeatherParameter;
use crate::types::weather_response::WeatherAdapterResponse;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Name of the timestamp index column.
pub const DATETIME_COLUMN: &str = "datetime";

/// Name of the station column added when frames of several stations are stacked.
pub const STATION_COLUMN: &str = "station_id";

/// Names of the location columns added when forecasts of several points are stacked.
pub const LATITUDE_COLUMN: &str = "latitude";
pub const LONGITUDE_COLUMN: &str = "longitude";

/// Where the data of a [`WeatherFrame`] was requested for.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameLocation {
    Station(String),
    Point(LatLon),
}

/// Weather observations or forecasts of one location.
///
/// The `frame` holds a `datetime` column (timezone-naive UTC, millisecond
/// precision), one row per timestamp of the requested [`DateRange`] in the same
/// order, followed by one `Float64` column per weather parameter, named by the
/// parameter id (e.g. `"1002"`). Missing values are null.
///
/// `parameter_meta` maps those column names to their entry in the platform's
/// parameter catalog (name, description, unit). Columns whose id the catalog does
/// not list have no entry.
///
/// # Example
///
/// ```no_run
/// use chrono::NaiveDate;
/// use ipm_weather::{DateRange, IpmWeatherError, WeatherDataHub};
///
/// # fn main() -> Result<(), IpmWeatherError> {
/// let hub = WeatherDataHub::new()?;
/// let fmi = hub.get_resource("Finnish Meteorological Institute measured data")?;
///
/// let day = NaiveDate::from_ymd_opt(2020, 6, 12).unwrap();
/// let range = DateRange::builder()
///     .start(day.and_hms_opt(0, 0, 0).unwrap())
///     .end(day.and_hms_opt(23, 0, 0).unwrap())
///     .build()?;
///
/// let weather = fmi
///     .get_data()
///     .parameters(&[1002, 3002])
///     .station_id("101104")
///     .date_range(&range)
///     .call()?;
///
/// println!("{} rows of {:?}:\n{}", weather.height(), weather.parameters(), weather.frame);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WeatherFrame {
    /// The underlying Polars DataFrame.
    pub frame: DataFrame,
    /// Display name of the resource the data came from.
    pub resource: String,
    pub location: FrameLocation,
    /// Coordinates reported by the adapter, if any.
    pub coordinates: Option<Location>,
    /// Catalog entries of the parameter columns, keyed by column name.
    pub parameter_meta: BTreeMap<String, WeatherParameter>,
}

impl WeatherFrame {
    /// Reshapes an adapter response into a frame indexed by `date_range`.
    ///
    /// # Errors
    ///
    /// * [`IpmWeatherError::Client`] if the response has no location block.
    /// * [`IpmWeatherError::ShapeMismatch`] if the number of rows differs from the
    ///   range length, or a row's width differs from the number of parameters.
    /// * [`IpmWeatherError::Frame`] if Polars rejects the columns (e.g. duplicate
    ///   parameter ids).
    pub fn from_response(
        resource: &str,
        location: FrameLocation,
        response: &WeatherAdapterResponse,
        date_range: &DateRange,
    ) -> Result<WeatherFrame, IpmWeatherError> {
        let frame = build_observation_frame(response, date_range)?;
        let block = response.location()?;
        let coordinates = match (block.latitude, block.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
                altitude: block.altitude,
            }),
            _ => None,
        };
        debug!(
            "Built {}x{} weather frame for {} ({:?})",
            frame.height(),
            frame.width(),
            resource,
            location
        );
        Ok(WeatherFrame {
            frame,
            resource: resource.to_string(),
            location,
            coordinates,
            parameter_meta: BTreeMap::new(),
        })
    }

    /// Attaches the catalog entries of this frame's parameter columns. Catalog
    /// entries for other parameters are ignored.
    pub fn with_parameter_meta(mut self, catalog: &[WeatherParameter]) -> WeatherFrame {
        let columns = self.parameters();
        self.parameter_meta = catalog
            .iter()
            .map(|parameter| (parameter.id.to_string(), parameter))
            .filter(|(key, _)| columns.contains(key))
            .map(|(key, parameter)| (key, parameter.clone()))
            .collect();
        self
    }

    /// Unit of a parameter column, if the catalog gives one.
    pub fn unit(&self, column: &str) -> Option<&str> {
        self.parameter_meta
            .get(column)
            .and_then(|parameter| parameter.unit.as_deref())
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Names of the parameter columns, in response order.
    pub fn parameters(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != DATETIME_COLUMN)
            .map(|name| name.to_string())
            .collect()
    }

    /// Keeps the rows whose timestamp lies within `start..=end`.
    ///
    /// The bounds are compared as naive UTC values against the `datetime` column.
    pub fn between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<WeatherFrame, IpmWeatherError> {
        let start_naive: NaiveDateTime = start.naive_utc();
        let end_naive: NaiveDateTime = end.naive_utc();
        let frame = self
            .frame
            .clone()
            .lazy()
            .filter(
                col(DATETIME_COLUMN)
                    .gt_eq(lit(start_naive))
                    .and(col(DATETIME_COLUMN).lt_eq(lit(end_naive))),
            )
            .collect()?;
        Ok(WeatherFrame {
            frame,
            ..self.clone()
        })
    }
}

/// Transposes `locationWeatherData[0].data` into one column per weather parameter
/// and prepends the `datetime` index built from `date_range`.
pub fn build_observation_frame(
    response: &WeatherAdapterResponse,
    date_range: &DateRange,
) -> Result<DataFrame, IpmWeatherError> {
    let rows = &response.location()?.data;
    let parameter_count = response.weather_parameters.len();

    if rows.len() != date_range.len() {
        return Err(IpmWeatherError::ShapeMismatch {
            what: "rows",
            expected: date_range.len(),
            found: rows.len(),
        });
    }
    if let Some(row) = rows.iter().find(|row| row.len() != parameter_count) {
        return Err(IpmWeatherError::ShapeMismatch {
            what: "values in a row",
            expected: parameter_count,
            found: row.len(),
        });
    }

    let mut columns = Vec::with_capacity(parameter_count + 1);
    columns.push(datetime_column(date_range)?);
    for (index, key) in response.weather_parameters.iter().enumerate() {
        let values: Vec<Option<f64>> = rows.iter().map(|row| row[index]).collect();
        columns.push(Column::new(key.as_str().into(), values));
    }
    Ok(DataFrame::new(columns)?)
}

fn datetime_column(date_range: &DateRange) -> PolarsResult<Column> {
    let millis: Vec<i64> = date_range
        .timestamps()
        .iter()
        .map(|ts| ts.timestamp_millis())
        .collect();
    let datetimes = Int64Chunked::from_vec(DATETIME_COLUMN.into(), millis)
        .into_datetime(TimeUnit::Milliseconds, None);
    Ok(Column::from(datetimes.into_series()))
}
