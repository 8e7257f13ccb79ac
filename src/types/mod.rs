pub mod adapter;
pub mod date_range;
pub mod error;
pub mod resource;
pub mod station;
pub mod weather_frame;
pub mod weather_parameter;
pub mod weather_response;
