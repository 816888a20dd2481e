//! Year-scoped rollups over the record set.
//!
//! Every function here is pure: it borrows the immutable records, takes its
//! parameters explicitly and returns a freshly computed value. Group order is
//! first appearance in the input, so ties keep a stable, input-determined
//! order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

use crate::data::Record;
use crate::region::Region;
use crate::selection::DrillFilter;

/// Divisor taking raw GDP to billions.
pub const GDP_UNIT: f64 = 1e9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAggregate {
    pub region: Region,
    pub total_co2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub co2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySeries {
    pub country: String,
    pub points: Vec<SeriesPoint>,
}

/// A scatter-plot mark. GDP is already in billions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub country: String,
    pub region: Region,
    pub sub_region: String,
    pub co2: f64,
    pub gdp_billions: f64,
    pub population: u64,
}

impl ScatterPoint {
    // Records are never mutated, so the rescale happens exactly once per point.
    fn from_record(r: &Record) -> Self {
        Self {
            country: r.country.clone(),
            region: r.region.clone(),
            sub_region: r.sub_region.clone(),
            co2: r.co2,
            gdp_billions: r.gdp / GDP_UNIT,
            population: r.population,
        }
    }
}

/// Sum `value` per key, groups in first-appearance order.
pub(crate) fn group_sum<'a, K, I, KF, VF>(rows: I, key: KF, value: VF) -> Vec<(K, f64)>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = &'a Record>,
    KF: Fn(&Record) -> K,
    VF: Fn(&Record) -> f64,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, f64)> = Vec::new();
    for r in rows {
        let k = key(r);
        match index.get(&k) {
            Some(&i) => groups[i].1 += value(r),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, value(r)));
            }
        }
    }
    groups
}

fn sort_desc<K>(groups: &mut [(K, f64)]) {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
}

/// Total CO₂ per region for `year`, largest first. Only positive emissions
/// count; a region with none is absent rather than zero.
pub fn region_totals(records: &[Record], year: i32) -> Vec<RegionAggregate> {
    let mut groups = group_sum(
        records.iter().filter(|r| r.year == year && r.co2 > 0.0),
        |r| r.region.clone(),
        |r| r.co2,
    );
    sort_desc(&mut groups);
    groups
        .into_iter()
        .map(|(region, total_co2)| RegionAggregate { region, total_co2 })
        .collect()
}

/// The `n` countries with the highest summed CO₂ in `year`.
pub fn top_countries(records: &[Record], year: i32, n: usize) -> Vec<String> {
    let mut groups = group_sum(
        records.iter().filter(|r| r.year == year),
        |r| r.country.clone(),
        |r| r.co2,
    );
    sort_desc(&mut groups);
    groups.into_iter().take(n).map(|(country, _)| country).collect()
}

/// Full-range CO₂ series for each requested country, in request order.
/// Countries without records are left out.
pub fn time_series(records: &[Record], countries: &[String]) -> Vec<CountrySeries> {
    let mut by_country: HashMap<&str, Vec<SeriesPoint>> = HashMap::new();
    for r in records {
        if countries.iter().any(|c| c == &r.country) {
            by_country.entry(r.country.as_str()).or_default().push(SeriesPoint {
                year: r.year,
                co2: r.co2,
            });
        }
    }

    let mut out = Vec::with_capacity(countries.len());
    for country in countries {
        if out.iter().any(|s: &CountrySeries| &s.country == country) {
            continue;
        }
        if let Some(mut points) = by_country.remove(country.as_str()) {
            points.sort_by_key(|p| p.year);
            out.push(CountrySeries {
                country: country.clone(),
                points,
            });
        }
    }
    out
}

/// Scatter population for `year`: positive CO₂ and GDP only (both axes may
/// be logarithmic), narrowed by the sunburst drill filter.
pub fn scatter_points(
    records: &[Record],
    year: i32,
    drill: Option<&DrillFilter>,
) -> Vec<ScatterPoint> {
    records
        .iter()
        .filter(|r| r.year == year && r.co2 > 0.0 && r.gdp > 0.0)
        .filter(|r| drill.map_or(true, |f| f.matches(r)))
        .map(ScatterPoint::from_record)
        .collect()
}

/// Min and max of `values`, `None` when empty.
pub fn extent<I: IntoIterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::DrillKind;

    fn rec(country: &str, region: Region, sub: &str, year: i32, co2: f64) -> Record {
        Record {
            country: country.to_string(),
            region,
            sub_region: sub.to_string(),
            year,
            co2,
            gdp: 1e11,
            population: 1_000,
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            rec("China", Region::Asia, "Eastern Asia", 2020, 10_000.0),
            rec("India", Region::Asia, "Southern Asia", 2020, 2_500.0),
            rec("Germany", Region::Europe, "Western Europe", 2020, 700.0),
            rec("France", Region::Europe, "Western Europe", 2020, 300.0),
            rec("Chad", Region::Africa, "Middle Africa", 2020, 0.0),
            rec("China", Region::Asia, "Eastern Asia", 2021, 11_000.0),
            rec("Germany", Region::Europe, "Western Europe", 2019, 750.0),
        ]
    }

    #[test]
    fn two_records_one_year_scenario() {
        let mut y = rec("Y", Region::Europe, "W.Europe", 2020, 5.0);
        y.gdp = 2e11;
        y.population = 500;
        let mut x = rec("X", Region::Asia, "E.Asia", 2020, 10.0);
        x.gdp = 5e11;
        let totals = region_totals(&[x, y], 2020);
        assert_eq!(
            totals,
            vec![
                RegionAggregate { region: Region::Asia, total_co2: 10.0 },
                RegionAggregate { region: Region::Europe, total_co2: 5.0 },
            ]
        );
    }

    #[test]
    fn region_totals_skip_non_positive_regions() {
        let totals = region_totals(&sample(), 2020);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].region, Region::Asia);
        assert_eq!(totals[0].total_co2, 12_500.0);
        assert!(totals.iter().all(|t| t.region != Region::Africa));
    }

    #[test]
    fn top_countries_sorted_and_truncated() {
        let top = top_countries(&sample(), 2020, 3);
        assert_eq!(top, vec!["China", "India", "Germany"]);
        assert_eq!(top_countries(&sample(), 2020, 50).len(), 5);
        assert!(top_countries(&sample(), 1950, 5).is_empty());
    }

    #[test]
    fn top_countries_ties_keep_input_order() {
        let rows = vec![
            rec("B", Region::Asia, "s", 2020, 1.0),
            rec("A", Region::Asia, "s", 2020, 1.0),
        ];
        assert_eq!(top_countries(&rows, 2020, 2), vec!["B", "A"]);
    }

    #[test]
    fn time_series_ascending_and_request_ordered() {
        let series = time_series(
            &sample(),
            &["Germany".to_string(), "Nowhere".to_string(), "China".to_string()],
        );
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].country, "Germany");
        let years: Vec<i32> = series[0].points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2019, 2020]);
        assert_eq!(series[1].points.len(), 2);
    }

    #[test]
    fn scatter_points_rescale_gdp_and_apply_drill() {
        let pts = scatter_points(&sample(), 2020, None);
        // Chad has zero emissions and cannot sit on a log axis
        assert_eq!(pts.len(), 4);
        assert!(pts.iter().all(|p| (p.gdp_billions - 100.0).abs() < 1e-9));

        let f = DrillFilter::new(DrillKind::SubRegion, "Western Europe");
        let pts = scatter_points(&sample(), 2020, Some(&f));
        let names: Vec<&str> = pts.iter().map(|p| p.country.as_str()).collect();
        assert_eq!(names, vec!["Germany", "France"]);
    }

    #[test]
    fn extent_of_empty_is_none() {
        assert_eq!(extent(Vec::new()), None);
        assert_eq!(extent(vec![3.0, -1.0, 2.0]), Some((-1.0, 3.0)));
    }

    #[test]
    fn aggregations_are_idempotent() {
        let data = sample();
        assert_eq!(region_totals(&data, 2020), region_totals(&data, 2020));
        assert_eq!(top_countries(&data, 2020, 5), top_countries(&data, 2020, 5));
        let c = vec!["China".to_string()];
        assert_eq!(time_series(&data, &c), time_series(&data, &c));
    }
}
