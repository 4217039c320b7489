//! Core data models for match statistics.

mod achievement;
mod ids;
mod lang;
mod match_record;
mod stats;
mod tracked_team;

pub use achievement::*;
pub use ids::*;
pub use lang::*;
pub use match_record::*;
pub use stats::*;
pub use tracked_team::*;
