//! Aggregation properties and cross-filter scenarios over seeded synthetic data.
//!
//! Test categories:
//!   1. Region totals  -- bounded by the raw year sum, equal when all positive
//!   2. Top-N          -- length bound, descending order
//!   3. Hierarchy      -- sub-region and root totals agree with flat rollups
//!   4. Idempotence    -- identical inputs, deep-equal outputs
//!   5. Dashboard      -- interaction sequences drive the right views

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use co2dash::aggregate::{region_totals, time_series, top_countries};
use co2dash::hierarchy::{hierarchy, WORLD};
use co2dash::region::Region;
use co2dash::selection::{DrillKind, ViewId};
use co2dash::synth::{generate, SynthConfig};
use co2dash::views::{ChartView, ViewModel};
use co2dash::{Config, Dashboard, Dataset, Interaction, Record};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn records(seed: u64) -> Vec<Record> {
    generate(&SynthConfig {
        seed,
        ..SynthConfig::default()
    })
}

fn year_sum(records: &[Record], year: i32) -> f64 {
    records.iter().filter(|r| r.year == year).map(|r| r.co2).sum()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
}

#[derive(Default)]
struct Log {
    models: Vec<ViewModel>,
}

struct Recorder(Rc<RefCell<Log>>);

impl ChartView for Recorder {
    fn accepts(&self, _id: ViewId) -> bool {
        true
    }

    fn render(&mut self, model: &ViewModel) {
        self.0.borrow_mut().models.push(model.clone());
    }
}

fn dashboard(seed: u64) -> (Dashboard, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut dash = Dashboard::new(Arc::new(Dataset::from_records(records(seed))), Config::default());
    dash.register(Box::new(Recorder(log.clone())));
    (dash, log)
}

fn drained_ids(log: &Rc<RefCell<Log>>) -> Vec<ViewId> {
    log.borrow_mut().models.drain(..).map(|m| m.id()).collect()
}

// ---------------------------------------------------------------------------
// 1. Region totals
// ---------------------------------------------------------------------------

#[test]
fn region_totals_bounded_by_year_sum() {
    for seed in [1, 2, 3] {
        let data = records(seed);
        for year in [1990, 2005, 2022] {
            let totals: f64 = region_totals(&data, year).iter().map(|t| t.total_co2).sum();
            assert!(totals <= year_sum(&data, year) + 1e-6);
        }
    }
}

#[test]
fn region_totals_equal_year_sum_when_all_positive() {
    let data = generate(&SynthConfig {
        zero_rate: 0.0,
        ..SynthConfig::default()
    });
    let totals: f64 = region_totals(&data, 2022).iter().map(|t| t.total_co2).sum();
    assert!(close(totals, year_sum(&data, 2022)));
    let sorted = region_totals(&data, 2022);
    assert!(sorted.windows(2).all(|w| w[0].total_co2 >= w[1].total_co2));
}

// ---------------------------------------------------------------------------
// 2. Top-N
// ---------------------------------------------------------------------------

#[test]
fn top_countries_bounded_and_descending() {
    let data = records(9);
    let year = 2010;
    let top = top_countries(&data, year, 5);
    let distinct: BTreeSet<&str> = data
        .iter()
        .filter(|r| r.year == year)
        .map(|r| r.country.as_str())
        .collect();
    assert!(top.len() <= 5);
    assert!(top.len() <= distinct.len());

    let by_country: HashMap<&str, f64> = data
        .iter()
        .filter(|r| r.year == year)
        .map(|r| (r.country.as_str(), r.co2))
        .collect();
    let values: Vec<f64> = top.iter().map(|c| by_country[c.as_str()]).collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
    let max = by_country.values().cloned().fold(f64::MIN, f64::max);
    assert_eq!(values[0], max);
}

// ---------------------------------------------------------------------------
// 3. Hierarchy
// ---------------------------------------------------------------------------

#[test]
fn hierarchy_totals_match_flat_rollups() {
    let data = records(4);
    let year = 2022;
    let root = hierarchy(&data, year, None);
    assert_eq!(root.name, WORLD);

    for region in &root.children {
        for sub in &region.children {
            let flat: f64 = data
                .iter()
                .filter(|r| r.year == year && r.sub_region == sub.name)
                .map(|r| r.co2)
                .sum();
            let leaves: f64 = sub.children.iter().filter_map(|c| c.value).sum();
            assert!(close(leaves, flat));
            assert!(close(sub.total(), flat));
        }
    }

    // Region totals drop non-positive rows, which add nothing to the sum.
    let grand: f64 = region_totals(&data, year).iter().map(|t| t.total_co2).sum();
    assert!(close(root.total(), grand));
}

#[test]
fn region_restricted_hierarchy_matches_bar_total() {
    let data = records(5);
    let root = hierarchy(&data, 2000, Some(&Region::Europe));
    assert_eq!(root.name, "Europe");
    let bar = region_totals(&data, 2000)
        .into_iter()
        .find(|t| t.region == Region::Europe)
        .unwrap();
    assert!(close(root.total(), bar.total_co2));
}

// ---------------------------------------------------------------------------
// 4. Idempotence
// ---------------------------------------------------------------------------

#[test]
fn aggregations_are_deterministic() {
    let data = records(6);
    assert_eq!(region_totals(&data, 2015), region_totals(&data, 2015));
    assert_eq!(top_countries(&data, 2015, 5), top_countries(&data, 2015, 5));
    assert_eq!(hierarchy(&data, 2015, None), hierarchy(&data, 2015, None));
    let top = top_countries(&data, 2015, 3);
    assert_eq!(time_series(&data, &top), time_series(&data, &top));
}

// ---------------------------------------------------------------------------
// 5. Dashboard scenarios
// ---------------------------------------------------------------------------

#[test]
fn year_change_after_brush_clears_brush_and_redraws_everything() {
    let (mut dash, log) = dashboard(7);
    dash.render_all();
    assert_eq!(drained_ids(&log).len(), 4);

    let pinned: BTreeSet<String> = top_countries(dash.dataset().records(), 2022, 2).into_iter().collect();
    dash.dispatch(Interaction::SetBrush {
        countries: Some(pinned.clone()),
    })
    .unwrap();
    assert_eq!(drained_ids(&log), vec![ViewId::Scatter, ViewId::Line]);
    assert_eq!(dash.state().brushed, Some(pinned));

    dash.dispatch(Interaction::SetYear { year: 2021 }).unwrap();
    assert_eq!(dash.state().brushed, None);
    assert_eq!(drained_ids(&log), ViewId::ALL.to_vec());

    match dash.view(ViewId::Line) {
        ViewModel::Line(line) => {
            assert!(!line.pinned);
            assert_eq!(line.countries, top_countries(dash.dataset().records(), 2021, 5));
        }
        other => panic!("unexpected {:?}", other.id()),
    }
}

#[test]
fn sunburst_double_click_clears_drill_filter() {
    let (mut dash, _log) = dashboard(8);
    let click = Interaction::arc_click(1, "Asia").unwrap();
    dash.dispatch(click.clone()).unwrap();
    let filter = dash.state().drill_filter.clone().unwrap();
    assert_eq!(filter.kind, DrillKind::Region);

    match dash.view(ViewId::Scatter) {
        ViewModel::Scatter(scatter) => {
            assert!(!scatter.marks.is_empty());
            assert!(scatter.marks.iter().all(|m| m.point.region == Region::Asia));
        }
        other => panic!("unexpected {:?}", other.id()),
    }

    dash.dispatch(click).unwrap();
    assert_eq!(dash.state().drill_filter, None);
}

#[test]
fn bar_click_narrows_sunburst_and_toggles_off() {
    let (mut dash, log) = dashboard(10);
    let t = dash
        .dispatch(Interaction::ToggleRegion {
            region: Region::Africa,
        })
        .unwrap();
    assert_eq!(t.refresh, vec![ViewId::Bar, ViewId::Sunburst]);

    let models = log.borrow().models.clone();
    let sunburst = models
        .iter()
        .find_map(|m| match m {
            ViewModel::Sunburst(s) => Some(s.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(sunburst.root, "Africa");
    assert!(sunburst
        .arcs
        .iter()
        .filter(|a| a.depth == 1)
        .all(|a| a.name == "Africa"));

    dash.dispatch(Interaction::ToggleRegion {
        region: Region::Africa,
    })
    .unwrap();
    assert_eq!(dash.state().region_filter, None);
}

#[test]
fn scale_toggle_only_touches_scatter() {
    let (mut dash, log) = dashboard(11);
    dash.dispatch(Interaction::ToggleRegion { region: Region::Asia }).unwrap();
    drained_ids(&log);

    dash.dispatch(Interaction::ToggleScale).unwrap();
    assert_eq!(drained_ids(&log), vec![ViewId::Scatter]);
    assert_eq!(dash.state().region_filter, Some(Region::Asia));

    match dash.view(ViewId::Scatter) {
        ViewModel::Scatter(s) => {
            assert!(s.title.ends_with("(Log Scale)"));
            assert!(s.x.domain.0 > 0.0);
            assert!(s.marks.iter().all(|m| m.cx.is_finite() && m.cy.is_finite()));
        }
        other => panic!("unexpected {:?}", other.id()),
    }
}
