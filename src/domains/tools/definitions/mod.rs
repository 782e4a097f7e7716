//! Tool definitions module.
//!
//! One file per tool, grouped by the service it talks to. `common` holds the
//! pieces of the call contract every upstream tool shares.

pub mod astronomy;
pub mod common;
pub mod storage;
pub mod weather;

pub use astronomy::{GetMoonPhaseParams, GetMoonPhaseTool, MoonPhaseSummary};
pub use storage::{DbPingParams, DbPingTool};
pub use weather::{Coordinates, GetWeatherParams, GetWeatherTool};
