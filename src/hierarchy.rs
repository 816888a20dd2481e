//! Region → sub-region → country emission hierarchy and its radial
//! partition layout.
//!
//! Only leaves store a value. Internal totals are always re-derived from
//! children, which is what lets the partition split angle proportionally.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::PI;

use crate::aggregate::group_sum;
use crate::data::Record;
use crate::logging::{self, obj, v_int, v_num, v_str, Domain};
use crate::region::{Region, Rgb};

pub const WORLD: &str = "World";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn branch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            color: None,
            children: Vec::new(),
        }
    }

    fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::branch(name)
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Own value plus the totals of all children.
    pub fn total(&self) -> f64 {
        self.value.unwrap_or(0.0) + self.children.iter().map(HierarchyNode::total).sum::<f64>()
    }

    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_mut_or_insert(&mut self, name: &str) -> &mut HierarchyNode {
        let idx = match self.children.iter().position(|c| c.name == name) {
            Some(i) => i,
            None => {
                self.children.push(HierarchyNode::branch(name));
                self.children.len() - 1
            }
        };
        &mut self.children[idx]
    }

    /// Longest root-to-leaf edge count.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        if self.is_leaf() {
            return vec![self];
        }
        self.children.iter().flat_map(|c| c.leaves()).collect()
    }
}

/// Build the three-level hierarchy for `year`, optionally restricted to one
/// region. The root is named after the region, or [`WORLD`].
pub fn hierarchy(records: &[Record], year: i32, region_filter: Option<&Region>) -> HierarchyNode {
    let rows = records
        .iter()
        .filter(|r| r.year == year)
        .filter(|r| region_filter.map_or(true, |f| &r.region == f));
    let leaves = group_sum(
        rows,
        |r| (r.region.clone(), r.sub_region.clone(), r.country.clone()),
        |r| r.co2,
    );

    let root_name = region_filter.map_or(WORLD, Region::as_str);
    let mut root = HierarchyNode::branch(root_name);
    for ((region, sub_region, country), co2) in leaves {
        let region_node = root.child_mut_or_insert(region.as_str());
        region_node.color = Some(region.color());
        region_node
            .child_mut_or_insert(&sub_region)
            .children
            .push(HierarchyNode::leaf(country, co2));
    }
    logging::debug(
        Domain::Aggregate,
        "hierarchy_built",
        obj(&[
            ("root", v_str(&root.name)),
            ("year", v_int(year as i64)),
            ("leaves", v_int(root.leaves().len() as i64)),
            ("total", v_num(root.total())),
        ]),
    );
    root
}

// =============================================================================
// Partition layout
// =============================================================================

/// A laid-out node: angular span `[x0, x1]` in radians and radial band
/// `[y0, y1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartitionNode {
    pub name: String,
    pub depth: usize,
    pub value: f64,
    /// Name of the depth-1 ancestor (the region), `None` for the root.
    pub region: Option<String>,
    pub color: Option<Rgb>,
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl PartitionNode {
    pub fn span(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Arc midpoint, with angle zero at twelve o'clock.
    pub fn centroid(&self) -> (f64, f64) {
        let r = (self.y0 + self.y1) / 2.0;
        let a = (self.x0 + self.x1) / 2.0 - PI / 2.0;
        (a.cos() * r, a.sin() * r)
    }

    /// Label rotation in degrees, flipped on the left half so text stays upright.
    pub fn label_rotation(&self) -> f64 {
        let angle = ((self.x0 + self.x1) / 2.0).to_degrees() - 90.0;
        if angle > 90.0 {
            angle + 180.0
        } else {
            angle
        }
    }
}

struct SizedNode<'a> {
    node: &'a HierarchyNode,
    value: f64,
    children: Vec<SizedNode<'a>>,
}

fn size(node: &HierarchyNode) -> SizedNode<'_> {
    let mut children: Vec<SizedNode<'_>> = node.children.iter().map(size).collect();
    children.sort_by(|a, b| b.value.total_cmp(&a.value));
    let value = node.value.unwrap_or(0.0) + children.iter().map(|c| c.value).sum::<f64>();
    SizedNode {
        node,
        value,
        children,
    }
}

/// Lay the hierarchy out over a full circle of radius `radius`. Siblings are
/// ordered by descending value; output is breadth-first, root first.
pub fn partition(root: &HierarchyNode, radius: f64) -> Vec<PartitionNode> {
    let sized = size(root);
    let dy = radius / (root.height() + 1) as f64;

    let mut out = Vec::new();
    let mut queue: VecDeque<(&SizedNode<'_>, usize, f64, f64, Option<&str>)> = VecDeque::new();
    queue.push_back((&sized, 0, 0.0, 2.0 * PI, None));

    while let Some((s, depth, x0, x1, region)) = queue.pop_front() {
        let region = if depth == 1 { Some(s.node.name.as_str()) } else { region };
        out.push(PartitionNode {
            name: s.node.name.clone(),
            depth,
            value: s.value,
            region: region.map(str::to_string),
            color: s.node.color,
            x0,
            x1,
            y0: depth as f64 * dy,
            y1: (depth + 1) as f64 * dy,
        });

        let k = if s.value > 0.0 { (x1 - x0) / s.value } else { 0.0 };
        let mut cursor = x0;
        for child in &s.children {
            let end = cursor + child.value * k;
            queue.push_back((child, depth + 1, cursor, end, region));
            cursor = end;
        }
    }
    out
}
