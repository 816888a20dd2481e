//! Replay a scripted interaction session against the emissions dataset.
//!
//! Usage:
//!   co2dash [data.csv] [script.jsonl]
//!
//! Prints the four initial view models, then the refreshed view models after
//! each script line, one JSON object per line on stdout. Script lines are
//! interactions such as `{"type":"set_year","year":2015}` or a brush
//! rectangle in scatter pixel space: `{"brush":{"x0":0,"y0":0,"x1":200,"y1":300}}`
//! (`{"brush":null}` clears it). Blank lines and `#` comments are skipped.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use co2dash::logging::{self, obj, v_int, v_str, Domain};
use co2dash::scale::BrushRect;
use co2dash::views::JsonLinesView;
use co2dash::{Config, Dashboard, Dataset, Interaction};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScriptLine {
    Interaction(Interaction),
    Brush { brush: Option<BrushRect> },
}

fn run_script(dash: &mut Dashboard, path: &Path) -> Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step: ScriptLine = match serde_json::from_str(trimmed) {
            Ok(step) => step,
            Err(err) => {
                logging::warn(
                    Domain::System,
                    "script_parse_failed",
                    obj(&[("line", v_int(lineno as i64 + 1)), ("error", v_str(&err.to_string()))]),
                );
                continue;
            }
        };
        // Rejected interactions are already logged by the dashboard.
        let _ = match step {
            ScriptLine::Interaction(i) => dash.dispatch(i),
            ScriptLine::Brush { brush } => dash.brush(brush),
        };
    }
    Ok(())
}

fn main() -> Result<()> {
    let mut cfg = Config::from_env();
    let mut args = std::env::args().skip(1);
    if let Some(path) = args.next() {
        cfg.data_path = path;
    }
    let script = args.next().map(PathBuf::from);

    let dataset = Dataset::from_path(Path::new(&cfg.data_path), cfg.year_range())?;
    logging::info(
        Domain::System,
        "startup",
        obj(&[
            ("data_path", v_str(&cfg.data_path)),
            ("records", v_int(dataset.len() as i64)),
            ("years", v_int(dataset.years().len() as i64)),
        ]),
    );

    let mut dash = Dashboard::new(Arc::new(dataset), cfg);
    dash.register(Box::new(JsonLinesView::new(io::stdout())));
    dash.render_all();

    if let Some(path) = script {
        run_script(&mut dash, &path)?;
    }

    logging::info(
        Domain::System,
        "shutdown",
        obj(&[
            ("transitions", v_int(dash.state().seq as i64)),
            ("state_hash", v_str(&format!("{:016x}", dash.state().hash()))),
        ]),
    );
    Ok(())
}
