use co2dash::data::{analyze_csv, default_manifest_path, validate_schema, REQUIRED_COLUMNS};
use co2dash::Config;
use serde_json::json;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    let cfg = Config::from_env();
    let path = PathBuf::from(env::args().nth(1).unwrap_or(cfg.data_path.clone()));

    let now_ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let schema = match validate_schema(&path) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("schema check failed: {:#}", err);
            std::process::exit(1);
        }
    };

    if !schema.ok {
        eprintln!("{}", schema.message);
        eprintln!("required columns: {:?}", REQUIRED_COLUMNS);
        std::process::exit(2);
    }

    let (manifest, report) = match analyze_csv(&path, cfg.year_range(), now_ts) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("analysis failed: {:#}", err);
            std::process::exit(3);
        }
    };

    let out_path = default_manifest_path(&path);
    let payload = json!({
        "manifest": manifest,
        "report": report
    });
    let written = serde_json::to_string_pretty(&payload)
        .map_err(|e| e.to_string())
        .and_then(|text| fs::write(&out_path, text).map_err(|e| e.to_string()));
    if let Err(err) = written {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!("wrote manifest {}", out_path.display());
}
