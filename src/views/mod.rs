//! View models for the four charts and the observer boundary to whatever
//! draws them.
//!
//! A view model is everything a renderer needs (positions, colours,
//! opacities, titles) computed from `(Dataset, SelectionState, Config)`.
//! Renderers implement [`ChartView`] and never see raw records.

pub mod bar;
pub mod line;
pub mod scatter;
pub mod sunburst;

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::config::Config;
use crate::data::Dataset;
use crate::logging::{self, obj, v_str, Domain};
use crate::selection::{SelectionState, ViewId};

pub use bar::BarView;
pub use line::LineView;
pub use scatter::ScatterView;
pub use sunburst::SunburstView;

pub const OPAQUE: f64 = 1.0;
pub const DIMMED: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewModel {
    Bar(BarView),
    Scatter(ScatterView),
    Line(LineView),
    Sunburst(SunburstView),
}

impl ViewModel {
    pub fn build(id: ViewId, dataset: &Dataset, state: &SelectionState, cfg: &Config) -> Self {
        match id {
            ViewId::Bar => ViewModel::Bar(BarView::build(dataset, state, cfg)),
            ViewId::Scatter => ViewModel::Scatter(ScatterView::build(dataset, state, cfg)),
            ViewId::Line => ViewModel::Line(LineView::build(dataset, state, cfg)),
            ViewId::Sunburst => ViewModel::Sunburst(SunburstView::build(dataset, state, cfg)),
        }
    }

    pub fn id(&self) -> ViewId {
        match self {
            ViewModel::Bar(_) => ViewId::Bar,
            ViewModel::Scatter(_) => ViewId::Scatter,
            ViewModel::Line(_) => ViewId::Line,
            ViewModel::Sunburst(_) => ViewId::Sunburst,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ViewModel::Bar(v) => &v.title,
            ViewModel::Scatter(v) => &v.title,
            ViewModel::Line(v) => &v.title,
            ViewModel::Sunburst(v) => &v.title,
        }
    }
}

/// A chart renderer. `accepts` decides which view models it is sent.
pub trait ChartView {
    fn accepts(&self, id: ViewId) -> bool;
    fn render(&mut self, model: &ViewModel);
}

/// Writes every view model it receives as one JSON line.
pub struct JsonLinesView<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartView for JsonLinesView<W> {
    fn accepts(&self, _id: ViewId) -> bool {
        true
    }

    fn render(&mut self, model: &ViewModel) {
        let written = serde_json::to_string(model)
            .map_err(anyhow::Error::from)
            .and_then(|line| writeln!(self.out, "{}", line).map_err(anyhow::Error::from));
        if let Err(err) = written {
            logging::error(
                Domain::View,
                "render_failed",
                obj(&[
                    ("view", v_str(model.id().as_str())),
                    ("error", v_str(&err.to_string())),
                ]),
            );
        }
    }
}
