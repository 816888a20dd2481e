//! Sunburst of the emission hierarchy, narrowed to the bar-selected region.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::Dataset;
use crate::hierarchy::{hierarchy, partition, PartitionNode};
use crate::region::{depth_tint, Region, Rgb, UNLISTED_COLOR};
use crate::selection::SelectionState;

use super::{DIMMED, OPAQUE};

/// Arcs narrower than this (radians) get no label.
pub const MIN_LABEL_SPAN: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcLabel {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstArc {
    pub name: String,
    pub depth: usize,
    pub value: f64,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
    pub color: Rgb,
    pub opacity: f64,
    pub label: Option<ArcLabel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunburstView {
    pub title: String,
    pub root: String,
    pub total: f64,
    pub arcs: Vec<SunburstArc>,
}

fn arc_color(node: &PartitionNode) -> Rgb {
    let base = node
        .region
        .as_deref()
        .map_or(UNLISTED_COLOR, |name| Region::parse(name).color());
    depth_tint(base, node.depth)
}

impl SunburstView {
    pub fn build(dataset: &Dataset, state: &SelectionState, cfg: &Config) -> Self {
        let tree = hierarchy(dataset.records(), state.year, state.region_filter.as_ref());
        let total = tree.total();
        let arcs = partition(&tree, cfg.sunburst_radius)
            .into_iter()
            .filter(|n| n.depth > 0)
            .map(|n| {
                let opacity = match &state.drill_filter {
                    Some(f) if !f.selects_arc(n.depth, &n.name) => DIMMED,
                    _ => OPAQUE,
                };
                let label = (n.span() > MIN_LABEL_SPAN).then(|| {
                    let (x, y) = n.centroid();
                    ArcLabel {
                        x,
                        y,
                        rotation: n.label_rotation(),
                    }
                });
                SunburstArc {
                    color: arc_color(&n),
                    opacity,
                    label,
                    depth: n.depth,
                    value: n.value,
                    x0: n.x0,
                    x1: n.x1,
                    y0: n.y0,
                    y1: n.y1,
                    name: n.name,
                }
            })
            .collect();

        let scope = state
            .region_filter
            .as_ref()
            .map_or("All Regions", Region::as_str);
        Self {
            title: format!("Global CO₂ Emissions Structure: {} ({})", scope, state.year),
            root: tree.name,
            total,
            arcs,
        }
    }
}
