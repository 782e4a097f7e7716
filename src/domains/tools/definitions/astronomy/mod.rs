//! Astronomy tools backed by AstronomyAPI.

pub mod moon_phase;

pub use moon_phase::{GetMoonPhaseParams, GetMoonPhaseTool, MoonPhaseSummary};
