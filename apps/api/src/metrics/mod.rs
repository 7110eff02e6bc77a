// Dashboard aggregates over check-ins. Pure functions, no I/O.

pub mod calculator;
pub mod handlers;
pub mod trends;

pub use calculator::{compute_team_metrics, TeamMetrics};
