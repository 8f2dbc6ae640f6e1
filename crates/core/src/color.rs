//! Colors used by the field renderer.
//!
//! [`Rgb`] is an opaque sRGB tone (components in [0, 1]) that serializes as a
//! `"#rrggbb"` hex string, which is how colors appear in configuration JSON.
//! [`Rgba`] pairs a tone with a straight (non-premultiplied) alpha and is
//! what a [`Surface`](crate::surface::Surface) receives.

use crate::error::FieldError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Opaque sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Color with straight alpha in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub color: Rgb,
    pub alpha: f64,
}

impl Rgb {
    /// Builds a color from 8-bit channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// Parses `"#3b82f6"` or `"3b82f6"`, case insensitive.
    pub fn from_hex(hex: &str) -> Result<Self, FieldError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(FieldError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| FieldError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Self::from_u8(
            channel(0..2, "red")?,
            channel(2..4, "green")?,
            channel(4..6, "blue")?,
        ))
    }

    /// 8-bit channels, rounded and clamped.
    pub fn to_u8(self) -> [u8; 3] {
        [self.r, self.g, self.b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Attaches an alpha, clamped to [0, 1].
    pub fn with_alpha(self, alpha: f64) -> Rgba {
        Rgba {
            color: self,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        color: Rgb {
            r: 0.0,
            g: 0.0,
            b: 0.0,
        },
        alpha: 0.0,
    };

    /// CSS `rgba()` notation, as accepted by canvas fill and stroke styles.
    pub fn to_css(self) -> String {
        let [r, g, b] = self.color.to_u8();
        format!("rgba({r}, {g}, {b}, {:.4})", self.alpha)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_accepts_both_prefix_forms() {
        let a = Rgb::from_hex("#22d3ee").unwrap();
        let b = Rgb::from_hex("22D3EE").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_u8(), [0x22, 0xd3, 0xee]);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn hex_round_trip() {
        let c = Rgb::from_u8(59, 130, 246);
        assert_eq!(c.to_hex(), "#3b82f6");
        assert_eq!(Rgb::from_hex(&c.to_hex()).unwrap(), c);
    }

    #[test]
    fn with_alpha_clamps() {
        let c = Rgb::from_u8(0, 0, 0);
        assert_eq!(c.with_alpha(1.4).alpha, 1.0);
        assert_eq!(c.with_alpha(-0.2).alpha, 0.0);
    }

    #[test]
    fn css_string_uses_integer_channels() {
        let css = Rgb::from_u8(34, 211, 238).with_alpha(0.25).to_css();
        assert_eq!(css, "rgba(34, 211, 238, 0.2500)");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::from_u8(255, 0, 170)).unwrap();
        assert_eq!(json, "\"#ff00aa\"");
        let back: Rgb = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_u8(), [255, 0, 170]);
        assert!(serde_json::from_str::<Rgb>("\"#nothex\"").is_err());
    }
}
