//! Write a seeded synthetic emissions CSV to stdout.
//!
//!   SEED=7 COUNTRIES=4 synth > data/synthetic.csv

use anyhow::Result;
use std::env;
use std::io;

use co2dash::synth::{generate, write_csv, SynthConfig};

fn main() -> Result<()> {
    let defaults = SynthConfig::default();
    let cfg = SynthConfig {
        seed: env::var("SEED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.seed),
        countries_per_sub_region: env::var("COUNTRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.countries_per_sub_region),
        ..defaults
    };
    let records = generate(&cfg);
    write_csv(&records, io::stdout().lock())
}
