//! Hue-geometry color matching.
//!
//! Each palette is a set of target hues relative to the base color plus a
//! window: the other color scores `1 - distance / window` against its closest
//! target, floored at 0.

use crate::models::{PaletteType, Rgb};

/// Default strict-mode tolerance in degrees
pub const DEFAULT_HUE_TOLERANCE: f64 = 15.0;

const ANALOGOUS_MAX_DIFFERENCE: f64 = 30.0;
const SPLIT_TOLERANCE: f64 = 30.0;
const SPLIT_ANGLE: f64 = 30.0;

/// Target hue offsets (degrees, relative to the base hue) and the linear falloff window
#[derive(Debug, Clone, Copy, PartialEq)]
struct PaletteRule {
    targets: &'static [f64],
    window: f64,
}

fn rule(palette: PaletteType) -> PaletteRule {
    match palette {
        PaletteType::Monochromatic => PaletteRule {
            targets: &[0.0],
            window: 30.0,
        },
        PaletteType::Analogous => PaletteRule {
            targets: &[0.0],
            window: 60.0,
        },
        PaletteType::Complementary => PaletteRule {
            targets: &[180.0],
            window: 180.0,
        },
        PaletteType::SplitComplementary => PaletteRule {
            targets: &[180.0 - SPLIT_ANGLE, 180.0 + SPLIT_ANGLE],
            window: 60.0,
        },
        PaletteType::Triadic => PaletteRule {
            targets: &[120.0, -120.0],
            window: 60.0,
        },
        PaletteType::Rectangle => PaletteRule {
            targets: &[60.0, 180.0, 240.0],
            window: 60.0,
        },
    }
}

/// HSV hue of a color in degrees, `[0, 360)`. Greys have hue 0.
pub fn hue_degrees(color: Rgb) -> f64 {
    let r = f64::from(color.red) / 255.0;
    let g = f64::from(color.green) / 255.0;
    let b = f64::from(color.blue) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let range = max - min;
    if range == 0.0 {
        return 0.0;
    }

    let sector = if max == r {
        (g - b) / range
    } else if max == g {
        2.0 + (b - r) / range
    } else {
        4.0 + (r - g) / range
    };

    (sector * 60.0).rem_euclid(360.0)
}

/// Shortest distance between two hues on the color wheel, `[0, 180]`
pub fn circular_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    d.min(360.0 - d)
}

/// Compatibility of `other` with `base` under `palette`, in `[0, 1]`
pub fn color_match_score(base: Rgb, other: Rgb, palette: PaletteType) -> f64 {
    let base_hue = hue_degrees(base);
    let other_hue = hue_degrees(other);
    let rule = rule(palette);

    rule.targets
        .iter()
        .map(|offset| {
            let distance = circular_distance(other_hue, base_hue + offset);
            (1.0 - distance / rule.window).max(0.0)
        })
        .fold(0.0, f64::max)
}

/// Strict mode: whether `other` lies within `hue_tolerance` degrees of a palette target.
///
/// Analogous ignores the tolerance and uses a fixed 30° neighbourhood;
/// split-complementary uses a fixed 30° tolerance.
pub fn is_color_match(base: Rgb, other: Rgb, palette: PaletteType, hue_tolerance: f64) -> bool {
    let base_hue = hue_degrees(base);
    let other_hue = hue_degrees(other);

    let tolerance = match palette {
        PaletteType::Analogous => ANALOGOUS_MAX_DIFFERENCE,
        PaletteType::SplitComplementary => SPLIT_TOLERANCE,
        _ => hue_tolerance,
    };

    rule(palette)
        .targets
        .iter()
        .any(|offset| circular_distance(other_hue, base_hue + offset) <= tolerance)
}
