//! Position encodings: continuous linear/log scales, band scale and brush
//! hit-testing.
//!
//! `nice()` follows the usual charting convention: linear domains snap to a
//! 1/2/5 × 10ⁿ tick step, log domains snap outward to powers of ten.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    #[default]
    Linear,
    Log,
}

impl ScaleMode {
    pub fn toggled(self) -> Self {
        match self {
            ScaleMode::Linear => ScaleMode::Log,
            ScaleMode::Log => ScaleMode::Linear,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScaleMode::Linear => "Linear",
            ScaleMode::Log => "Log",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContinuousScale {
    pub mode: ScaleMode,
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Tick step for `count` ticks over `[start, stop]`. A negative result `-k`
/// stands for the step `1/k`, which keeps small steps exact.
fn tick_increment(start: f64, stop: f64, count: f64) -> f64 {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power < 0.0 {
        -(10f64.powf(-power) / factor)
    } else {
        10f64.powf(power) * factor
    }
}

fn nice_linear(domain: (f64, f64), count: f64) -> (f64, f64) {
    let (mut start, mut stop) = domain;
    let reversed = stop < start;
    if reversed {
        std::mem::swap(&mut start, &mut stop);
    }
    if !(stop > start) || !start.is_finite() || !stop.is_finite() {
        return domain;
    }

    let mut prestep = f64::NAN;
    for _ in 0..10 {
        let step = tick_increment(start, stop, count);
        if step == prestep {
            break;
        } else if step > 0.0 {
            start = (start / step).floor() * step;
            stop = (stop / step).ceil() * step;
        } else if step < 0.0 {
            start = (start * step).ceil() / step;
            stop = (stop * step).floor() / step;
        } else {
            break;
        }
        prestep = step;
    }
    if reversed {
        (stop, start)
    } else {
        (start, stop)
    }
}

fn nice_log(domain: (f64, f64)) -> (f64, f64) {
    let (lo, hi) = domain;
    if !(lo > 0.0 && hi > 0.0) {
        return domain;
    }
    let (a, b) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let a = 10f64.powf(a.log10().floor());
    let b = 10f64.powf(b.log10().ceil());
    if lo <= hi {
        (a, b)
    } else {
        (b, a)
    }
}

impl ContinuousScale {
    pub fn new(mode: ScaleMode, domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            mode,
            domain,
            range,
        }
    }

    pub fn linear(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::new(ScaleMode::Linear, domain, range)
    }

    pub fn log(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self::new(ScaleMode::Log, domain, range)
    }

    /// Extend the domain to round values.
    pub fn nice(mut self) -> Self {
        self.domain = match self.mode {
            ScaleMode::Linear => nice_linear(self.domain, 10.0),
            ScaleMode::Log => nice_log(self.domain),
        };
        self
    }

    fn transform(&self, x: f64) -> f64 {
        match self.mode {
            ScaleMode::Linear => x,
            // Non-positive input has no position on a log axis and maps to NaN.
            ScaleMode::Log => x.ln(),
        }
    }

    /// Map a domain value to the range. A degenerate domain maps everything
    /// to the middle of the range.
    pub fn apply(&self, x: f64) -> f64 {
        let d0 = self.transform(self.domain.0);
        let d1 = self.transform(self.domain.1);
        let t = if d1 - d0 != 0.0 {
            (self.transform(x) - d0) / (d1 - d0)
        } else {
            0.5
        };
        self.range.0 + t * (self.range.1 - self.range.0)
    }
}

/// Evenly spaced bands over a range, with inner and outer padding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandScale {
    pub domain: Vec<String>,
    pub range: (f64, f64),
    pub padding: f64,
}

impl BandScale {
    pub fn new(domain: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self {
            domain,
            range,
            padding,
        }
    }

    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        (self.range.1 - self.range.0) / (n - self.padding + self.padding * 2.0).max(1.0)
    }

    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    pub fn position(&self, key: &str) -> Option<f64> {
        let i = self.domain.iter().position(|k| k == key)?;
        let n = self.domain.len() as f64;
        let step = self.step();
        let start = self.range.0
            + (self.range.1 - self.range.0 - step * (n - self.padding)) * 0.5;
        Some(start + step * i as f64)
    }
}

/// Pixel-space rectangle from a rectangular brush gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BrushRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}
