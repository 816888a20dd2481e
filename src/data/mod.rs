//! Emissions dataset: CSV loading, numeric coercion and year filtering.
//!
//! Rows whose numeric fields cannot be coerced are dropped rather than
//! reported as errors; the counts end up in [`LoadReport`]. A blank numeric
//! field reads as zero, so a row missing only its GDP still counts toward
//! emission totals. The only hard
//! failure is a header missing one of [`REQUIRED_COLUMNS`].

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use crate::logging::{self, obj, v_int, v_str, Domain};
use crate::region::Region;

pub const REQUIRED_COLUMNS: [&str; 7] = [
    "country",
    "region",
    "sub-region",
    "year",
    "co2",
    "gdp",
    "population",
];

/// One (country, year) observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub country: String,
    pub region: Region,
    #[serde(rename = "sub-region")]
    pub sub_region: String,
    pub year: i32,
    /// Million tonnes
    pub co2: f64,
    /// Raw currency units, not rescaled
    pub gdp: f64,
    pub population: u64,
}

/// A row as it appears in the CSV, before coercion. Extra columns are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(rename = "sub-region", default)]
    pub sub_region: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub co2: String,
    #[serde(default)]
    pub gdp: String,
    #[serde(default)]
    pub population: String,
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    let v: f64 = raw.parse().ok()?;
    v.is_finite().then_some(v)
}

impl RawRow {
    /// Coerce into a typed record; `None` when any numeric field is malformed.
    pub fn coerce(&self) -> Option<Record> {
        let year = parse_number(&self.year)?;
        if year.fract() != 0.0 || year.abs() > i32::MAX as f64 {
            return None;
        }
        let population = parse_number(&self.population)?;
        if population < 0.0 {
            return None;
        }
        Some(Record {
            country: self.country.trim().to_string(),
            region: Region::parse(&self.region),
            sub_region: self.sub_region.trim().to_string(),
            year: year as i32,
            co2: parse_number(&self.co2)?,
            gdp: parse_number(&self.gdp)?,
            population: population.round() as u64,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub rows_read: u64,
    pub kept: u64,
    pub malformed: u64,
    pub out_of_range: u64,
    pub unlisted_regions: BTreeSet<String>,
}

/// Immutable record set shared by every chart.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    report: LoadReport,
}

/// Coerce raw rows and keep those inside `years`.
pub fn load<I>(rows: I, years: RangeInclusive<i32>) -> Dataset
where
    I: IntoIterator<Item = RawRow>,
{
    let mut builder = LoadBuilder::new(years);
    for row in rows {
        builder.push(Some(row));
    }
    builder.finish()
}

struct LoadBuilder {
    years: RangeInclusive<i32>,
    records: Vec<Record>,
    report: LoadReport,
}

impl LoadBuilder {
    fn new(years: RangeInclusive<i32>) -> Self {
        Self {
            years,
            records: Vec::new(),
            report: LoadReport::default(),
        }
    }

    /// `None` marks a row the CSV reader itself could not decode.
    fn push(&mut self, row: Option<RawRow>) {
        self.report.rows_read += 1;
        let Some(record) = row.as_ref().and_then(RawRow::coerce) else {
            self.report.malformed += 1;
            return;
        };
        if !self.years.contains(&record.year) {
            self.report.out_of_range += 1;
            return;
        }
        if let Region::Unlisted(name) = &record.region {
            self.report.unlisted_regions.insert(name.clone());
        }
        self.report.kept += 1;
        self.records.push(record);
    }

    fn finish(self) -> Dataset {
        let report = self.report;
        logging::info(
            Domain::Data,
            "dataset_loaded",
            obj(&[
                ("rows_read", v_int(report.rows_read as i64)),
                ("kept", v_int(report.kept as i64)),
                ("malformed", v_int(report.malformed as i64)),
                ("out_of_range", v_int(report.out_of_range as i64)),
            ]),
        );
        for name in &report.unlisted_regions {
            logging::warn(
                Domain::Data,
                "unlisted_region",
                obj(&[
                    ("region", v_str(name)),
                    ("msg", v_str("region outside the fixed palette, drawn in fallback gray")),
                ]),
            );
        }
        Dataset {
            records: self.records,
            report,
        }
    }
}

fn check_header(header: &csv::StringRecord) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !header.iter().any(|h| h.trim() == *col))
        .collect();
    if !missing.is_empty() {
        bail!("missing required columns: {}", missing.join(", "));
    }
    Ok(())
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let report = LoadReport {
            rows_read: records.len() as u64,
            kept: records.len() as u64,
            ..LoadReport::default()
        };
        Self { records, report }
    }

    pub fn from_reader<R: Read>(reader: R, years: RangeInclusive<i32>) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        check_header(rdr.headers().context("reading CSV header")?)?;

        let mut builder = LoadBuilder::new(years);
        for row in rdr.deserialize::<RawRow>() {
            builder.push(row.ok());
        }
        Ok(builder.finish())
    }

    pub fn from_path(path: &Path, years: RangeInclusive<i32>) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Self::from_reader(file, years)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct years, ascending. Feeds the year selector.
    pub fn years(&self) -> Vec<i32> {
        let set: BTreeSet<i32> = self.records.iter().map(|r| r.year).collect();
        set.into_iter().collect()
    }

    pub fn has_year(&self, year: i32) -> bool {
        self.records.iter().any(|r| r.year == year)
    }

    pub fn year_extent(&self) -> Option<(i32, i32)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

// =============================================================================
// Schema + manifest
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub missing: Vec<String>,
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub rows_read: u64,
    pub kept: u64,
    pub dropped: u64,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub countries: usize,
    pub columns: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(rdr
        .headers()
        .context("reading CSV header")?
        .iter()
        .map(|s| s.to_string())
        .collect())
}

pub fn validate_schema(path: &Path) -> Result<SchemaReport> {
    let columns = read_header(path)?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !columns.iter().any(|c| c == *col))
        .map(|s| s.to_string())
        .collect();
    let ok = missing.is_empty();
    let message = if ok {
        "schema ok".to_string()
    } else {
        format!("schema mismatch: missing {:?}", missing)
    };
    Ok(SchemaReport {
        columns,
        missing,
        ok,
        message,
    })
}

pub fn analyze_csv(
    path: &Path,
    years: RangeInclusive<i32>,
    now_ts: u64,
) -> Result<(DatasetManifest, LoadReport)> {
    let hash = file_sha256(path)?;
    let columns = read_header(path)?;
    let dataset = Dataset::from_path(path, years)?;
    let report = dataset.report().clone();

    let mut warnings = Vec::new();
    if report.malformed > 0 {
        warnings.push(format!("malformed_rows: {}", report.malformed));
    }
    if report.out_of_range > 0 {
        warnings.push(format!("out_of_range_rows: {}", report.out_of_range));
    }
    for name in &report.unlisted_regions {
        warnings.push(format!("unlisted_region: {}", name));
    }

    let countries: BTreeSet<&str> = dataset.records().iter().map(|r| r.country.as_str()).collect();
    let extent = dataset.year_extent();
    let manifest = DatasetManifest {
        path: path.display().to_string(),
        hash_sha256: hash,
        rows_read: report.rows_read,
        kept: report.kept,
        dropped: report.malformed + report.out_of_range,
        year_min: extent.map(|(lo, _)| lo),
        year_max: extent.map(|(_, hi)| hi),
        countries: countries.len(),
        columns,
        warnings,
        generated_at_epoch: now_ts,
    };
    Ok((manifest, report))
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}
