pub mod entities;
pub mod scoring;
pub mod statistics;

pub use scoring::{ScoringEvent, ScoringRules};
pub use statistics::{PlayerStatistics, StatValue, StatisticsError};
