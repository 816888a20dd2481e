//! Seeded synthetic emissions tables, for demos and property tests.

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::io::Write;
use std::ops::RangeInclusive;

use crate::data::{Record, REQUIRED_COLUMNS};
use crate::region::Region;

const SUB_REGIONS: [(&str, &[&str]); 5] = [
    ("Asia", &["Eastern Asia", "Southern Asia", "Western Asia"]),
    ("Europe", &["Western Europe", "Northern Europe", "Eastern Europe"]),
    ("Americas", &["Northern America", "South America"]),
    ("Africa", &["Northern Africa", "Sub-Saharan Africa"]),
    ("Oceania", &["Australia and New Zealand", "Polynesia"]),
];

#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub seed: u64,
    pub countries_per_sub_region: usize,
    pub years: RangeInclusive<i32>,
    /// Probability that a country emits nothing in a given year
    pub zero_rate: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            countries_per_sub_region: 3,
            years: 1990..=2022,
            zero_rate: 0.05,
        }
    }
}

/// One record per (country, year), with each country following its own
/// noisy growth curve.
pub fn generate(cfg: &SynthConfig) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut records = Vec::new();

    for (region, subs) in SUB_REGIONS {
        for sub in subs {
            for i in 0..cfg.countries_per_sub_region {
                let country = format!("{} {}", sub, i + 1);
                let base_co2: f64 = rng.gen_range(1.0..5_000.0);
                let growth: f64 = rng.gen_range(-0.02..0.06);
                let gdp_per_t: f64 = rng.gen_range(2e8..3e9);
                let population: u64 = rng.gen_range(100_000..500_000_000);

                for (k, year) in cfg.years.clone().enumerate() {
                    let noise: f64 = rng.gen_range(0.9..1.1);
                    let co2 = if rng.gen_bool(cfg.zero_rate) {
                        0.0
                    } else {
                        base_co2 * (1.0 + growth).powi(k as i32) * noise
                    };
                    records.push(Record {
                        country: country.clone(),
                        region: Region::parse(region),
                        sub_region: sub.to_string(),
                        year,
                        co2,
                        gdp: co2.max(1.0) * gdp_per_t,
                        population: population + (k as u64) * population / 100,
                    });
                }
            }
        }
    }
    records
}

pub fn write_csv<W: Write>(records: &[Record], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(REQUIRED_COLUMNS)?;
    for r in records {
        writer.write_record([
            r.country.clone(),
            r.region.to_string(),
            r.sub_region.clone(),
            r.year.to_string(),
            r.co2.to_string(),
            r.gdp.to_string(),
            r.population.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
