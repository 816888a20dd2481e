//! CO₂ over time for the top-N countries, or the brushed set when one is pinned.

use serde::{Deserialize, Serialize};

use crate::aggregate::{time_series, top_countries};
use crate::config::Config;
use crate::data::Dataset;
use crate::region::{series_color, Rgb};
use crate::scale::ContinuousScale;
use crate::selection::SelectionState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePoint {
    pub year: i32,
    pub co2: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSeries {
    pub country: String,
    pub color: Rgb,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineView {
    pub title: String,
    /// True when the country set comes from a scatter brush
    pub pinned: bool,
    /// Series order, which also fixes colours. A brushed set comes out in
    /// alphabetical order, not the order the brush hit it.
    pub countries: Vec<String>,
    pub x: ContinuousScale,
    pub y: ContinuousScale,
    pub series: Vec<LineSeries>,
}

impl LineView {
    pub fn build(dataset: &Dataset, state: &SelectionState, cfg: &Config) -> Self {
        let (countries, pinned) = match &state.brushed {
            Some(set) if !set.is_empty() => (set.iter().cloned().collect::<Vec<_>>(), true),
            _ => (top_countries(dataset.records(), state.year, cfg.top_n), false),
        };
        let series = time_series(dataset.records(), &countries);

        let (y0, y1) = dataset
            .year_extent()
            .map_or((0.0, 1.0), |(lo, hi)| (lo as f64, hi as f64));
        let x = ContinuousScale::linear((y0, y1), (0.0, cfg.line_width)).nice();
        let max = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.co2))
            .fold(0.0, f64::max);
        let y = ContinuousScale::linear((0.0, max), (cfg.line_height, 0.0)).nice();

        // Colours follow the requested order, not the order series come back in.
        let color_of = |country: &str| {
            series_color(countries.iter().position(|c| c == country).unwrap_or(0))
        };
        let series = series
            .into_iter()
            .map(|s| LineSeries {
                color: color_of(&s.country),
                points: s
                    .points
                    .iter()
                    .map(|p| LinePoint {
                        year: p.year,
                        co2: p.co2,
                        x: x.apply(p.year as f64),
                        y: y.apply(p.co2),
                    })
                    .collect(),
                country: s.country,
            })
            .collect();

        Self {
            title: format!("CO₂ Emissions Over Time ({} Selection)", state.year),
            pinned,
            countries,
            x,
            y,
            series,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;
    use crate::region::Region;

    fn ds() -> Dataset {
        let mut records = Vec::new();
        for (i, country) in ["A", "B", "C", "D", "E", "F", "G"].iter().enumerate() {
            for year in 1990..=2022 {
                records.push(Record {
                    country: country.to_string(),
                    region: Region::Europe,
                    sub_region: "s".into(),
                    year,
                    co2: (i + 1) as f64 * 10.0,
                    gdp: 1.0,
                    population: 1,
                });
            }
        }
        Dataset::from_records(records)
    }

    #[test]
    fn defaults_to_top_n() {
        let cfg = Config::default();
        let view = LineView::build(&ds(), &SelectionState::new(2022), &cfg);
        assert!(!view.pinned);
        assert_eq!(view.countries, vec!["G", "F", "E", "D", "C"]);
        assert_eq!(view.series.len(), 5);
        assert_eq!(view.series[0].points.len(), 33);
        assert_eq!(view.series[0].color, series_color(0));
        assert_eq!(view.y.domain, (0.0, 70.0));
        assert_eq!(view.title, "CO₂ Emissions Over Time (2022 Selection)");
    }

    #[test]
    fn brush_pins_the_country_set() {
        let mut state = SelectionState::new(2022);
        state.brushed = Some(["A".to_string(), "B".to_string()].into_iter().collect());
        let view = LineView::build(&ds(), &state, &Config::default());
        assert!(view.pinned);
        let names: Vec<&str> = view.series.iter().map(|s| s.country.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn points_span_the_plot_width() {
        let cfg = Config::default();
        let view = LineView::build(&ds(), &SelectionState::new(2022), &cfg);
        let first = view.series[0].points.first().unwrap();
        let last = view.series[0].points.last().unwrap();
        assert!(first.x >= 0.0);
        assert!(last.x <= cfg.line_width + 1e-9);
        assert!(first.x < last.x);
    }
}
