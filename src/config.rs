//! Runtime configuration, read from the environment.

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: String,
    /// Year selected when the dashboard first loads
    pub default_year: i32,
    pub year_min: i32,
    pub year_max: i32,
    /// Default line-chart country count
    pub top_n: usize,
    pub bar_width: f64,
    pub bar_height: f64,
    pub scatter_width: f64,
    pub scatter_height: f64,
    pub line_width: f64,
    pub line_height: f64,
    pub sunburst_radius: f64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            data_path: std::env::var("DATA_PATH").unwrap_or(d.data_path),
            default_year: env_or("DEFAULT_YEAR", d.default_year),
            year_min: env_or("YEAR_MIN", d.year_min),
            year_max: env_or("YEAR_MAX", d.year_max),
            top_n: env_or("TOP_N", d.top_n),
            bar_width: env_or("BAR_WIDTH", d.bar_width),
            bar_height: env_or("BAR_HEIGHT", d.bar_height),
            scatter_width: env_or("SCATTER_WIDTH", d.scatter_width),
            scatter_height: env_or("SCATTER_HEIGHT", d.scatter_height),
            line_width: env_or("LINE_WIDTH", d.line_width),
            line_height: env_or("LINE_HEIGHT", d.line_height),
            sunburst_radius: env_or("SUNBURST_RADIUS", d.sunburst_radius),
        }
    }

    pub fn year_range(&self) -> std::ops::RangeInclusive<i32> {
        self.year_min..=self.year_max
    }
}

impl Default for Config {
    fn default() -> Self {
        // Plot areas are the outer chart sizes minus their margins.
        Self {
            data_path: "data/data_co2.csv".to_string(),
            default_year: 2022,
            year_min: 1990,
            year_max: 2022,
            top_n: 5,
            bar_width: 650.0,
            bar_height: 320.0,
            scatter_width: 640.0,
            scatter_height: 510.0,
            line_width: 600.0,
            line_height: 320.0,
            sunburst_radius: 300.0,
        }
    }
}
