//! Dashboard: owns the current selection snapshot and fans view models out
//! to registered chart renderers.
//!
//! One interaction is handled at a time: reduce, rebuild only the views the
//! transition names, notify. The dataset is shared read-only.

use anyhow::{bail, Result};
use std::sync::Arc;

use crate::config::Config;
use crate::data::Dataset;
use crate::logging::{self, obj, v_int, v_str, Domain};
use crate::scale::BrushRect;
use crate::selection::{reduce, DrillFilter, Interaction, SelectionState, Transition, ViewId};
use crate::views::{ChartView, ScatterView, ViewModel};

pub struct Dashboard {
    dataset: Arc<Dataset>,
    config: Config,
    state: SelectionState,
    views: Vec<Box<dyn ChartView>>,
}

impl Dashboard {
    /// Start at the configured default year, or the latest year in the data
    /// when the default is absent.
    pub fn new(dataset: Arc<Dataset>, config: Config) -> Self {
        let year = if dataset.has_year(config.default_year) {
            config.default_year
        } else {
            let latest = dataset.years().last().copied().unwrap_or(config.default_year);
            logging::warn(
                Domain::System,
                "default_year_missing",
                obj(&[
                    ("default_year", v_int(config.default_year as i64)),
                    ("using", v_int(latest as i64)),
                ]),
            );
            latest
        };

        Self {
            dataset,
            config,
            state: SelectionState::new(year),
            views: Vec::new(),
        }
    }

    pub fn register(&mut self, view: Box<dyn ChartView>) {
        self.views.push(view);
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn view(&self, id: ViewId) -> ViewModel {
        ViewModel::build(id, &self.dataset, &self.state, &self.config)
    }

    /// Initial draw of every chart.
    pub fn render_all(&mut self) {
        self.notify(&ViewId::ALL);
    }

    fn notify(&mut self, ids: &[ViewId]) {
        for &id in ids {
            let model = self.view(id);
            logging::debug(
                Domain::View,
                "view_built",
                obj(&[("view", v_str(id.as_str())), ("title", v_str(model.title()))]),
            );
            for view in self.views.iter_mut().filter(|v| v.accepts(id)) {
                view.render(&model);
            }
        }
    }

    /// Years outside the configured window are rejected. A year inside the
    /// window with no rows is fine and draws empty charts.
    fn validate(&self, interaction: &Interaction) -> Result<()> {
        if let Interaction::SetYear { year } = interaction {
            let window = self.config.year_range();
            if !window.contains(year) {
                bail!(
                    "year {} outside {}..={}",
                    year,
                    window.start(),
                    window.end()
                );
            }
        }
        Ok(())
    }

    /// Apply one interaction and redraw the affected charts. On error the
    /// state is left unchanged.
    pub fn dispatch(&mut self, interaction: Interaction) -> Result<Transition> {
        if let Err(err) = self.validate(&interaction) {
            logging::warn(
                Domain::Selection,
                "interaction_rejected",
                obj(&[
                    ("interaction", v_str(interaction.name())),
                    ("error", v_str(&err.to_string())),
                ]),
            );
            return Err(err);
        }

        let name = interaction.name();
        let transition = reduce(&self.state, interaction);
        self.state = transition.state.clone();

        let refreshed: Vec<&str> = transition.refresh.iter().map(|v| v.as_str()).collect();
        logging::info(
            Domain::Selection,
            name,
            obj(&[
                ("seq", v_int(self.state.seq as i64)),
                ("year", v_int(self.state.year as i64)),
                (
                    "drill",
                    v_str(&self.state.drill_filter.as_ref().map_or(String::new(), DrillFilter::label)),
                ),
                ("state_hash", v_str(&format!("{:016x}", transition.state_hash))),
                ("refresh", v_str(&refreshed.join(","))),
            ]),
        );

        self.notify(&transition.refresh);
        Ok(transition)
    }

    /// Resolve a scatter brush rectangle against the current scatter layout
    /// and dispatch the resulting selection. `None` clears the brush.
    pub fn brush(&mut self, rect: Option<BrushRect>) -> Result<Transition> {
        let countries = rect.map(|r| {
            ScatterView::build(&self.dataset, &self.state, &self.config).brushed_countries(&r)
        });
        self.dispatch(Interaction::SetBrush { countries })
    }
}
