//! Weather tools backed by Meteosource.

pub mod forecast;

pub use forecast::{Coordinates, GetWeatherParams, GetWeatherTool};
