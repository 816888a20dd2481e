//! Horizontal bar chart: total CO₂ per region for the selected year.

use serde::{Deserialize, Serialize};

use crate::aggregate::{region_totals, RegionAggregate};
use crate::config::Config;
use crate::data::Dataset;
use crate::region::{Region, Rgb};
use crate::scale::{BandScale, ContinuousScale};
use crate::selection::SelectionState;

use super::{DIMMED, OPAQUE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub region: Region,
    pub total_co2: f64,
    pub y: f64,
    pub height: f64,
    pub width: f64,
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarView {
    pub year: i32,
    pub title: String,
    pub x_domain: (f64, f64),
    pub selected: Option<Region>,
    pub bars: Vec<Bar>,
}

impl BarView {
    pub fn build(dataset: &Dataset, state: &SelectionState, cfg: &Config) -> Self {
        let totals = region_totals(dataset.records(), state.year);
        let max = totals.iter().map(|t| t.total_co2).fold(0.0, f64::max);
        let x = ContinuousScale::linear((0.0, max), (0.0, cfg.bar_width)).nice();
        let y = BandScale::new(
            totals.iter().map(|t| t.region.to_string()).collect(),
            (0.0, cfg.bar_height),
            0.2,
        );

        let bars = totals
            .into_iter()
            .map(|RegionAggregate { region, total_co2 }| {
                // Selection dims the other regions, it never removes them.
                let opacity = match &state.region_filter {
                    Some(sel) if sel != &region => DIMMED,
                    _ => OPAQUE,
                };
                Bar {
                    y: y.position(region.as_str()).unwrap_or(0.0),
                    height: y.bandwidth(),
                    width: x.apply(total_co2),
                    color: region.color(),
                    opacity,
                    region,
                    total_co2,
                }
            })
            .collect();

        Self {
            year: state.year,
            title: format!("CO₂ Emissions by Region in {}", state.year),
            x_domain: x.domain,
            selected: state.region_filter.clone(),
            bars,
        }
    }
}
