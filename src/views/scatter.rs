//! CO₂ vs GDP scatter plot, sized by population.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::aggregate::{extent, scatter_points, ScatterPoint};
use crate::config::Config;
use crate::data::Dataset;
use crate::region::Rgb;
use crate::scale::{BrushRect, ContinuousScale, ScaleMode};
use crate::selection::SelectionState;

use super::{DIMMED, OPAQUE};

/// Resting opacity when no brush is active.
pub const RESTING: f64 = 0.6;
pub const RADIUS_RANGE: (f64, f64) = (5.0, 20.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterMark {
    #[serde(flatten)]
    pub point: ScatterPoint,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterView {
    pub year: i32,
    pub title: String,
    pub mode: ScaleMode,
    pub x_label: String,
    pub y_label: String,
    pub x: ContinuousScale,
    pub y: ContinuousScale,
    pub marks: Vec<ScatterMark>,
}

fn axis_scale(mode: ScaleMode, values: &[f64], range: (f64, f64)) -> ContinuousScale {
    let domain = extent(values.iter().copied()).unwrap_or((0.0, 1.0));
    ContinuousScale::new(mode, domain, range).nice()
}

impl ScatterView {
    pub fn build(dataset: &Dataset, state: &SelectionState, cfg: &Config) -> Self {
        let points = scatter_points(dataset.records(), state.year, state.drill_filter.as_ref());
        let mode = state.scale_mode;

        let co2: Vec<f64> = points.iter().map(|p| p.co2).collect();
        let gdp: Vec<f64> = points.iter().map(|p| p.gdp_billions).collect();
        let x = axis_scale(mode, &co2, (0.0, cfg.scatter_width));
        let y = axis_scale(mode, &gdp, (cfg.scatter_height, 0.0));
        let size = ContinuousScale::linear(
            extent(points.iter().map(|p| p.population as f64)).unwrap_or((0.0, 1.0)),
            RADIUS_RANGE,
        )
        .nice();

        let marks = points
            .into_iter()
            .map(|point| {
                let opacity = match &state.brushed {
                    None => RESTING,
                    Some(set) if set.contains(&point.country) => OPAQUE,
                    Some(_) => DIMMED,
                };
                ScatterMark {
                    cx: x.apply(point.co2),
                    cy: y.apply(point.gdp_billions),
                    r: size.apply(point.population as f64),
                    color: point.region.color(),
                    opacity,
                    point,
                }
            })
            .collect();

        let subject = state
            .drill_filter
            .as_ref()
            .map_or("Country", |f| f.value.as_str());
        let (x_label, y_label) = match mode {
            ScaleMode::Linear => ("CO₂ Emissions (Million tons)", "GDP (Billion USD)"),
            ScaleMode::Log => ("Log of CO₂ Emissions (Million tons)", "Log of GDP (Billion USD)"),
        };

        Self {
            year: state.year,
            title: format!(
                "CO₂ Emission vs GDP by {} in {} ({} Scale)",
                subject,
                state.year,
                mode.label()
            ),
            mode,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x,
            y,
            marks,
        }
    }

    /// Countries whose marks fall inside a pixel rectangle.
    pub fn brushed_countries(&self, rect: &BrushRect) -> BTreeSet<String> {
        self.marks
            .iter()
            .filter(|m| rect.contains(m.cx, m.cy))
            .map(|m| m.point.country.clone())
            .collect()
    }
}
