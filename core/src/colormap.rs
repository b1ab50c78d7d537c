//! Colour scales for the heatmap.
//!
//! Each map is a list of evenly spaced control colours; `sample` does
//! linear interpolation between neighbours. Control points follow the
//! matplotlib palettes of the same name.

use crate::error::ChartError;
use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const RD_YL_GN: &[(u8, u8, u8)] = &[
    (165, 0, 38),
    (215, 48, 39),
    (244, 109, 67),
    (253, 174, 97),
    (254, 224, 139),
    (255, 255, 191),
    (217, 239, 139),
    (166, 217, 106),
    (102, 189, 99),
    (26, 152, 80),
    (0, 104, 55),
];

const COOLWARM: &[(u8, u8, u8)] = &[
    (59, 76, 192),
    (98, 130, 234),
    (141, 176, 254),
    (184, 208, 249),
    (221, 221, 221),
    (245, 196, 173),
    (244, 154, 123),
    (222, 96, 77),
    (180, 4, 38),
];

const RD_BU: &[(u8, u8, u8)] = &[
    (103, 0, 31),
    (178, 24, 43),
    (214, 96, 77),
    (244, 165, 130),
    (253, 219, 199),
    (247, 247, 247),
    (209, 229, 240),
    (146, 197, 222),
    (67, 147, 195),
    (33, 102, 172),
    (5, 48, 97),
];

const VIRIDIS: &[(u8, u8, u8)] = &[
    (68, 1, 84),
    (72, 40, 120),
    (62, 74, 137),
    (49, 104, 142),
    (38, 130, 142),
    (31, 158, 137),
    (53, 183, 121),
    (109, 205, 89),
    (180, 222, 44),
    (253, 231, 37),
];

const BLUES: &[(u8, u8, u8)] = &[
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    #[default]
    RdYlGn,
    Coolwarm,
    RdBu,
    Viridis,
    Blues,
}

impl Colormap {
    fn stops(&self) -> &'static [(u8, u8, u8)] {
        match self {
            Self::RdYlGn => RD_YL_GN,
            Self::Coolwarm => COOLWARM,
            Self::RdBu => RD_BU,
            Self::Viridis => VIRIDIS,
            Self::Blues => BLUES,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RdYlGn => "rd_yl_gn",
            Self::Coolwarm => "coolwarm",
            Self::RdBu => "rd_bu",
            Self::Viridis => "viridis",
            Self::Blues => "blues",
        }
    }

    /// Colour at position `t` in [0, 1]. Out-of-range and NaN inputs are clamped
    /// (NaN to the low end).
    pub fn sample(&self, t: f64) -> RGBColor {
        let stops = self.stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (stops.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        let frac = pos - lo as f64;

        let lerp = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * frac).round().clamp(0.0, 255.0) as u8
        };
        let (a, b) = (stops[lo], stops[hi]);
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }
}

impl FromStr for Colormap {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "rdylgn" => Ok(Self::RdYlGn),
            "coolwarm" => Ok(Self::Coolwarm),
            "rdbu" => Ok(Self::RdBu),
            "viridis" => Ok(Self::Viridis),
            "blues" => Ok(Self::Blues),
            _ => Err(ChartError::InvalidConfig(format!("unknown colormap '{s}'"))),
        }
    }
}

/// How coefficients map onto the colour range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorScale {
    /// Stretch the colour range over the data's min and max.
    #[default]
    Auto,
    /// Fixed bounds; `center` maps to the middle colour.
    Fixed { min: f64, max: f64, center: f64 },
}

impl ColorScale {
    /// [-1, 1] centred at 0.
    pub fn symmetric_unit() -> Self {
        Self::Fixed {
            min: -1.0,
            max: 1.0,
            center: 0.0,
        }
    }

    /// Effective (min, max) given the data range.
    pub fn bounds(&self, data_min: f64, data_max: f64) -> (f64, f64) {
        match *self {
            Self::Auto => (data_min, data_max),
            Self::Fixed { min, max, .. } => (min, max),
        }
    }

    /// Position of `value` in [0, 1] along the colour range.
    pub fn normalize(&self, value: f64, data_min: f64, data_max: f64) -> f64 {
        match *self {
            Self::Auto => linear(value, data_min, data_max),
            Self::Fixed { min, max, center } => {
                if !(min < center && center < max) {
                    return linear(value, min, max);
                }
                if value <= center {
                    0.5 * linear(value, min, center)
                } else {
                    0.5 + 0.5 * linear(value, center, max)
                }
            }
        }
    }
}

fn linear(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 {
        return 0.5;
    }
    ((value - lo) / span).clamp(0.0, 1.0)
}

/// Relative luminance in [0, 1], used to pick annotation text colour.
pub fn luminance(color: &RGBColor) -> f64 {
    (0.2126 * color.0 as f64 + 0.7152 * color.1 as f64 + 0.0722 * color.2 as f64) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_stops() {
        assert_eq!(rgb(Colormap::RdYlGn.sample(0.0)), (165, 0, 38));
        assert_eq!(rgb(Colormap::RdYlGn.sample(1.0)), (0, 104, 55));
        assert_eq!(rgb(Colormap::RdYlGn.sample(0.5)), (255, 255, 191));
    }

    fn rgb(c: RGBColor) -> (u8, u8, u8) {
        (c.0, c.1, c.2)
    }

    #[test]
    fn sample_clamps() {
        let map = Colormap::Viridis;
        assert_eq!(rgb(map.sample(-3.0)), rgb(map.sample(0.0)));
        assert_eq!(rgb(map.sample(7.0)), rgb(map.sample(1.0)));
        assert_eq!(rgb(map.sample(f64::NAN)), rgb(map.sample(0.0)));
    }

    #[test]
    fn parses_names_loosely() {
        assert_eq!("RdYlGn".parse::<Colormap>().unwrap(), Colormap::RdYlGn);
        assert_eq!("rd_yl_gn".parse::<Colormap>().unwrap(), Colormap::RdYlGn);
        assert_eq!("COOLWARM".parse::<Colormap>().unwrap(), Colormap::Coolwarm);
        assert!("jet".parse::<Colormap>().is_err());
    }

    #[test]
    fn fixed_scale_centres_zero() {
        let scale = ColorScale::symmetric_unit();
        assert_eq!(scale.normalize(-1.0, 0.1, 0.2), 0.0);
        assert_eq!(scale.normalize(0.0, 0.1, 0.2), 0.5);
        assert_eq!(scale.normalize(1.0, 0.1, 0.2), 1.0);
        assert_eq!(scale.normalize(0.5, 0.1, 0.2), 0.75);
    }

    #[test]
    fn fixed_scale_with_off_centre() {
        let scale = ColorScale::Fixed { min: -1.0, max: 1.0, center: 0.5 };
        assert_eq!(scale.normalize(0.5, 0.0, 0.0), 0.5);
        assert_eq!(scale.normalize(-0.25, 0.0, 0.0), 0.25);
    }

    #[test]
    fn auto_scale_uses_data_range() {
        let scale = ColorScale::Auto;
        assert_eq!(scale.normalize(-0.5, -0.5, 1.0), 0.0);
        assert_eq!(scale.normalize(1.0, -0.5, 1.0), 1.0);
        assert_eq!(scale.normalize(0.25, -0.5, 1.0), 0.5);
        // Degenerate range maps to the middle.
        assert_eq!(scale.normalize(1.0, 1.0, 1.0), 0.5);
    }

    #[test]
    fn luminance_orders_black_and_white() {
        assert!(luminance(&RGBColor(0, 0, 0)) < 0.01);
        assert!(luminance(&RGBColor(255, 255, 255)) > 0.99);
    }
}
