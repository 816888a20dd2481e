//! Interaction messages emitted by the charts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::state::DrillKind;
use crate::region::Region;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Interaction {
    /// Year selector changed
    SetYear { year: i32 },
    /// Bar clicked
    ToggleRegion { region: Region },
    /// Sunburst arc clicked
    ToggleDrill { kind: DrillKind, value: String },
    /// Scatter brush ended; `None` when the brush was cleared
    SetBrush {
        #[serde(default)]
        countries: Option<BTreeSet<String>>,
    },
    /// Log/linear button pressed
    ToggleScale,
}

impl Interaction {
    /// Sunburst click on an arc at `depth`; the root (depth 0) is not clickable.
    pub fn arc_click(depth: usize, name: &str) -> Option<Self> {
        DrillKind::from_depth(depth).map(|kind| Interaction::ToggleDrill {
            kind,
            value: name.to_string(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Interaction::SetYear { .. } => "set_year",
            Interaction::ToggleRegion { .. } => "toggle_region",
            Interaction::ToggleDrill { .. } => "toggle_drill",
            Interaction::SetBrush { .. } => "set_brush",
            Interaction::ToggleScale => "toggle_scale",
        }
    }
}

/// The four chart views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewId {
    Bar,
    Scatter,
    Line,
    Sunburst,
}

impl ViewId {
    pub const ALL: [ViewId; 4] = [ViewId::Bar, ViewId::Scatter, ViewId::Line, ViewId::Sunburst];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewId::Bar => "bar",
            ViewId::Scatter => "scatter",
            ViewId::Line => "line",
            ViewId::Sunburst => "sunburst",
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
