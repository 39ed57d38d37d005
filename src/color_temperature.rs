//! Correlated color temperature to RGB conversion.
//!
//! Uses Tanner Helland's curve fit of the black-body locus. The fit is only
//! meaningful between 1000 K and 40000 K, so inputs are clamped to that range
//! before conversion.

use serde::{Deserialize, Serialize};

/// Lowest temperature the curve fit supports (Kelvin).
pub const MIN_KELVIN: f32 = 1000.0;

/// Highest temperature the curve fit supports (Kelvin).
pub const MAX_KELVIN: f32 = 40000.0;

/// Temperature used when a light has no CCT (warm white).
pub const DEFAULT_KELVIN: f32 = 3000.0;

/// Linear RGB color with channels in the 0-1 range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_u8((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Format as `#rrggbb` for display.
    pub fn to_hex_string(self) -> String {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.r),
            channel(self.g),
            channel(self.b)
        )
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Convert a color temperature in Kelvin to an approximate RGB tint.
///
/// Never fails: out-of-range input is clamped and NaN falls back to
/// [`DEFAULT_KELVIN`].
pub fn kelvin_to_color(kelvin: f32) -> Rgb {
    let kelvin = if kelvin.is_nan() { DEFAULT_KELVIN } else { kelvin };
    let temp = kelvin.clamp(MIN_KELVIN, MAX_KELVIN) / 100.0;

    let (red, green, blue) = if temp <= 66.0 {
        let green = 99.4708 * temp.ln() - 161.1196;
        let blue = if temp <= 19.0 {
            0.0
        } else {
            138.5177 * (temp - 10.0).ln() - 305.0448
        };
        (255.0, green, blue)
    } else {
        let red = 329.6987 * (temp - 60.0).powf(-0.133_204_7);
        let green = 288.1222 * (temp - 60.0).powf(-0.075_514_8);
        (red, green, 255.0)
    };

    Rgb::new(normalize(red), normalize(green), normalize(blue))
}

fn normalize(channel: f32) -> f32 {
    channel.clamp(0.0, 255.0) / 255.0
}
