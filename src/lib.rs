//! Data core of a cross-filtering CO₂ emissions dashboard.
//!
//! Loads the yearly per-country emissions table, computes the aggregates
//! behind the bar, scatter, line and sunburst charts, and reduces chart
//! interactions into a shared selection state that drives all four.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod hierarchy;
pub mod logging;
pub mod region;
pub mod scale;
pub mod selection;
pub mod synth;
pub mod views;

pub use config::Config;
pub use dashboard::Dashboard;
pub use data::{Dataset, Record};
pub use selection::{Interaction, SelectionState};
