//! Heat-to-color mapping over a fixed five-stop palette.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Formats as a CSS color, `rgb(r, g, b)`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Rgb,
}

const fn stop(position: f64, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        position,
        color: Rgb::new(r, g, b),
    }
}

pub const HEAT_PALETTE: [ColorStop; 5] = [
    stop(0.0, 74, 144, 226),  // cool blue
    stop(0.25, 80, 227, 194), // aqua
    stop(0.5, 245, 166, 35),  // orange
    stop(0.75, 208, 2, 27),   // red
    stop(1.0, 189, 16, 224),  // hot
];

/// Color of a normalized heat value. Input is clamped to [0, 1]; NaN maps
/// to the coolest color.
pub fn heat_to_color(value: f64) -> Rgb {
    let value = if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    };
    interpolate(value, &HEAT_PALETTE)
}

/// Piecewise-linear interpolation over `stops`, sorted by position.
pub fn interpolate(value: f64, stops: &[ColorStop]) -> Rgb {
    let (first, last) = match (stops.first(), stops.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Rgb::new(0, 0, 0),
    };
    if value <= first.position {
        return first.color;
    }
    if value >= last.position {
        return last.color;
    }

    stops
        .windows(2)
        .find(|pair| pair[0].position <= value && value <= pair[1].position)
        .map(|pair| {
            let (start, end) = (pair[0], pair[1]);
            let t = (value - start.position) / (end.position - start.position);
            Rgb::new(
                lerp_channel(start.color.r, end.color.r, t),
                lerp_channel(start.color.g, end.color.g, t),
                lerp_channel(start.color.b, end.color.b, t),
            )
        })
        .unwrap_or(last.color)
}

#[inline]
fn lerp_channel(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 * (1.0 - t) + b as f64 * t).round().clamp(0.0, 255.0) as u8
}
