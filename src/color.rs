//! Hex color helpers for bar gradients
//!
//! [`adjust_color`] is a plain linear brightness shift: every channel gets the
//! same offset `round(2.55 * percent)` and is clamped to `0..=255`. It is not
//! perceptual. Bars are drawn from the base color to `adjust_color(base, -20)`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("expected a #RRGGBB color, got '{0}'")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB` or `RRGGBB` (either case)
    pub fn parse(color: &str) -> Result<Self, ColorError> {
        let hex = color.strip_prefix('#').unwrap_or(color);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::Malformed(color.to_string()));
        }
        let num = u32::from_str_radix(hex, 16)
            .map_err(|_| ColorError::Malformed(color.to_string()))?;
        Ok(Self {
            r: (num >> 16) as u8,
            g: ((num >> 8) & 0xff) as u8,
            b: (num & 0xff) as u8,
        })
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Shift every channel by `round(2.55 * percent)`, clamped
    pub fn adjust(self, percent: f64) -> Self {
        let amt = js_round(2.55 * percent);
        let shift = |channel: u8| (i64::from(channel) + amt).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
        }
    }
}

/// Round half toward positive infinity, as browsers' `Math.round` does
fn js_round(x: f64) -> i64 {
    (x + 0.5).floor() as i64
}

/// Lighten (positive) or darken (negative) a hex color by `percent`
///
/// ```
/// assert_eq!(emolens::adjust_color("#FFD700", -20.0).unwrap(), "#cca400");
/// ```
pub fn adjust_color(color: &str, percent: f64) -> Result<String, ColorError> {
    Ok(Rgb::parse(color)?.adjust(percent).to_hex())
}
