//! Selection snapshot with deterministic hashing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data::Record;
use crate::region::Region;
use crate::scale::ScaleMode;

/// Sunburst ring a drill filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrillKind {
    #[serde(rename = "region")]
    Region,
    #[serde(rename = "sub-region")]
    SubRegion,
    #[serde(rename = "country")]
    Country,
}

impl DrillKind {
    /// Ring depth 1, 2, 3 → region, sub-region, country.
    pub fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(DrillKind::Region),
            2 => Some(DrillKind::SubRegion),
            3 => Some(DrillKind::Country),
            _ => None,
        }
    }

    pub fn depth(self) -> usize {
        match self {
            DrillKind::Region => 1,
            DrillKind::SubRegion => 2,
            DrillKind::Country => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DrillKind::Region => "region",
            DrillKind::SubRegion => "sub-region",
            DrillKind::Country => "country",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrillFilter {
    pub kind: DrillKind,
    pub value: String,
}

impl DrillFilter {
    pub fn new(kind: DrillKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn matches(&self, r: &Record) -> bool {
        match self.kind {
            DrillKind::Region => r.region.as_str() == self.value,
            DrillKind::SubRegion => r.sub_region == self.value,
            DrillKind::Country => r.country == self.value,
        }
    }

    /// `kind:value`, e.g. `sub-region:Western Europe`.
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.value)
    }

    /// Whether a sunburst arc at `depth` named `name` is the selected one.
    pub fn selects_arc(&self, depth: usize, name: &str) -> bool {
        self.kind.depth() == depth && self.value == name
    }
}

/// Cross-filter state shared by all four charts. Each filter is owned by the
/// chart it originates from and they may be active at the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub year: i32,
    /// Bar-chart click
    pub region_filter: Option<Region>,
    /// Sunburst click
    pub drill_filter: Option<DrillFilter>,
    /// Scatter brush; `None` means the line chart shows the top-N
    pub brushed: Option<BTreeSet<String>>,
    /// Scatter axes only
    pub scale_mode: ScaleMode,
    /// Number of transitions applied
    pub seq: u64,
}

impl SelectionState {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            region_filter: None,
            drill_filter: None,
            brushed: None,
            scale_mode: ScaleMode::Linear,
            seq: 0,
        }
    }

    pub fn is_brushed(&self, country: &str) -> bool {
        self.brushed.as_ref().map_or(false, |set| set.contains(country))
    }

    /// Compute deterministic state hash for replay validation
    pub fn hash(&self) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut h = DefaultHasher::new();
        self.year.hash(&mut h);
        self.region_filter.hash(&mut h);
        self.drill_filter.hash(&mut h);
        self.brushed.hash(&mut h);
        self.scale_mode.hash(&mut h);
        self.seq.hash(&mut h);
        h.finish()
    }
}
