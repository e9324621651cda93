pub mod influx;
pub mod routes;
pub mod startup;
pub mod utils;
pub mod weather;
pub mod weather_api;

pub use influx::{InfluxClient, TimeSeriesStore};
pub use routes::*;
pub use startup::*;
pub use utils::*;
pub use weather::*;
pub use weather_api::{LocationSuggestion, WeatherApi, WeatherApiClient};
