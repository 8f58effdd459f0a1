//! League computations that sit on top of the data model: scoring a
//! player's match events, validating rosters against league rules,
//! executing transfers, recording matchup results and building season
//! schedules.

pub mod error;
pub mod results;
pub mod roster;
pub mod schedule;
pub mod scoring;
pub mod transfer;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{ComputeError, Result};
