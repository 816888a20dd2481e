//! Region vocabulary and display palettes.
//!
//! The dataset groups countries into five fixed regions, each bound to a
//! display colour. Region names outside that set are kept as
//! [`Region::Unlisted`] and drawn with [`UNLISTED_COLOR`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_u32(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        match digits.len() {
            6 => u32::from_str_radix(digits, 16).ok().map(Self::from_u32),
            3 => {
                let v = u32::from_str_radix(digits, 16).ok()?;
                let expand = |n: u32| ((n & 0xf) * 17) as u8;
                Some(Self::new(expand(v >> 8), expand(v >> 4), expand(v)))
            }
            _ => None,
        }
    }

    /// Interpolate toward `other` in CIELAB space, `t` in `[0, 1]`.
    pub fn mix_lab(self, other: Rgb, t: f64) -> Rgb {
        let a = Lab::from(self);
        let b = Lab::from(other);
        Lab {
            l: a.l + (b.l - a.l) * t,
            a: a.a + (b.a - a.a) * t,
            b: a.b + (b.b - a.b) * t,
        }
        .into()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for String {
    fn from(c: Rgb) -> Self {
        c.to_string()
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Rgb::parse_hex(&s).ok_or_else(|| format!("invalid colour: {}", s))
    }
}

// CIELAB relative to D50, matching the conversion used by browser charting
// libraries so tints line up with what the dashboard has always shown.
const XN: f64 = 0.96422;
const YN: f64 = 1.0;
const ZN: f64 = 0.82521;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

#[derive(Debug, Clone, Copy)]
struct Lab {
    l: f64,
    a: f64,
    b: f64,
}

fn rgb_to_linear(c: u8) -> f64 {
    let x = c as f64 / 255.0;
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_rgb(x: f64) -> u8 {
    let v = 255.0
        * if x <= 0.0031308 {
            12.92 * x
        } else {
            1.055 * x.powf(1.0 / 2.4) - 0.055
        };
    v.round().clamp(0.0, 255.0) as u8
}

fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

impl From<Rgb> for Lab {
    fn from(c: Rgb) -> Self {
        let r = rgb_to_linear(c.r);
        let g = rgb_to_linear(c.g);
        let b = rgb_to_linear(c.b);
        let y = xyz_to_lab((0.2225045 * r + 0.7168786 * g + 0.0606169 * b) / YN);
        let (x, z) = if c.r == c.g && c.g == c.b {
            (y, y)
        } else {
            (
                xyz_to_lab((0.4360747 * r + 0.3850649 * g + 0.1430804 * b) / XN),
                xyz_to_lab((0.0139322 * r + 0.0971045 * g + 0.7141733 * b) / ZN),
            )
        };
        Lab {
            l: 116.0 * y - 16.0,
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }
}

impl From<Lab> for Rgb {
    fn from(lab: Lab) -> Self {
        let y = (lab.l + 16.0) / 116.0;
        let x = XN * lab_to_xyz(y + lab.a / 500.0);
        let z = ZN * lab_to_xyz(y - lab.b / 200.0);
        let y = YN * lab_to_xyz(y);
        Rgb::new(
            linear_to_rgb(3.1338561 * x - 1.6168667 * y - 0.4906146 * z),
            linear_to_rgb(-0.9787684 * x + 1.9161415 * y + 0.0334540 * z),
            linear_to_rgb(0.0719453 * x - 0.2289914 * y + 1.4052427 * z),
        )
    }
}

pub const WHITE: Rgb = Rgb::new(255, 255, 255);
pub const UNLISTED_COLOR: Rgb = Rgb::from_u32(0xcccccc);

/// Ordinal palette for line-chart series.
pub const CATEGORY10: [Rgb; 10] = [
    Rgb::from_u32(0x1f77b4),
    Rgb::from_u32(0xff7f0e),
    Rgb::from_u32(0x2ca02c),
    Rgb::from_u32(0xd62728),
    Rgb::from_u32(0x9467bd),
    Rgb::from_u32(0x8c564b),
    Rgb::from_u32(0xe377c2),
    Rgb::from_u32(0x7f7f7f),
    Rgb::from_u32(0xbcbd22),
    Rgb::from_u32(0x17becf),
];

pub fn series_color(index: usize) -> Rgb {
    CATEGORY10[index % CATEGORY10.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Region {
    Asia,
    Europe,
    Americas,
    Africa,
    Oceania,
    Unlisted(String),
}

impl Region {
    pub const LISTED: [Region; 5] = [
        Region::Asia,
        Region::Europe,
        Region::Americas,
        Region::Africa,
        Region::Oceania,
    ];

    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "Asia" => Region::Asia,
            "Europe" => Region::Europe,
            "Americas" => Region::Americas,
            "Africa" => Region::Africa,
            "Oceania" => Region::Oceania,
            other => Region::Unlisted(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Americas => "Americas",
            Region::Africa => "Africa",
            Region::Oceania => "Oceania",
            Region::Unlisted(name) => name,
        }
    }

    pub fn is_listed(&self) -> bool {
        !matches!(self, Region::Unlisted(_))
    }

    pub fn color(&self) -> Rgb {
        match self {
            Region::Asia => Rgb::from_u32(0xa63d40),
            Region::Europe => Rgb::from_u32(0x3c91e6),
            Region::Americas => Rgb::from_u32(0xf6ae2d),
            Region::Africa => Rgb::from_u32(0xf6bdd1),
            Region::Oceania => Rgb::from_u32(0x9fd356),
            Region::Unlisted(_) => UNLISTED_COLOR,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Region {
    fn from(s: String) -> Self {
        Region::parse(&s)
    }
}

impl From<Region> for String {
    fn from(r: Region) -> Self {
        r.as_str().to_string()
    }
}

/// Sunburst fill for a node at `depth` under a region of colour `base`:
/// regions are drawn as-is, sub-regions and countries progressively tinted
/// toward white.
pub fn depth_tint(base: Rgb, depth: usize) -> Rgb {
    match depth {
        2 => base.mix_lab(WHITE, 0.3),
        3 => base.mix_lab(WHITE, 0.6),
        _ => base,
    }
}
