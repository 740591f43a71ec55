//! Color value types and the conversions between their encodings.

use palette::Srgb;
use serde::{Deserialize, Serialize};

/// Rounds halves toward positive infinity, like `Math.round`.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Convert 8-bit RGB to rounded HSL: hue in whole degrees `[0, 360)`,
/// saturation and lightness in whole percent `[0, 100]`.
///
/// Achromatic input (`r == g == b`) yields hue 0 and saturation 0.
/// Computed in `f64`; values sitting on a `.5` edge round up.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> [u16; 3] {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    let hue = round_half_up(h * 360.0) as u16 % 360;
    let saturation = round_half_up(s * 100.0).clamp(0.0, 100.0) as u16;
    let lightness = round_half_up(l * 100.0).clamp(0.0, 100.0) as u16;
    [hue, saturation, lightness]
}

/// Format a color as `#rrggbb`. Every channel is clamped to `[0, 255]` first.
pub fn rgb_to_hex(r: i32, g: i32, b: i32) -> String {
    let clamp = |c: i32| c.clamp(0, 255) as u8;
    format!("#{:02x}{:02x}{:02x}", clamp(r), clamp(g), clamp(b))
}

/// Parse `#rrggbb` (the `#` is optional). Anything other than exactly six hex
/// digits is rejected.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some([r, g, b])
}

/// Human-readable label for an HSL triple.
///
/// Colors below 10% saturation are named from a gray ladder by lightness.
/// Everything else falls into half-open hue bands, with saturation above 50%
/// picking the vivid name of the band.
pub fn color_name(hsl: [u16; 3]) -> &'static str {
    let [h, s, l] = hsl;

    if s < 10 {
        return match l {
            0..20 => "Charcoal",
            20..40 => "Gray",
            40..60 => "Silver",
            60..80 => "Light Gray",
            _ => "White",
        };
    }

    let (vivid, muted) = match h {
        0..30 => ("Crimson", "Coral"),
        30..60 => ("Gold", "Amber"),
        60..120 => ("Emerald", "Sage"),
        120..180 => ("Teal", "Mint"),
        180..240 => ("Azure", "Sky"),
        240..300 => ("Violet", "Lavender"),
        300..360 => ("Magenta", "Rose"),
        _ => return "Unknown",
    };
    if s > 50 { vivid } else { muted }
}

/// A single color carried in every encoding the palette consumers need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    hex: String,
    rgb: [u8; 3],
    hsl: [u16; 3],
    name: String,
}

impl ColorInfo {
    pub fn from_rgb(rgb: Srgb<u8>) -> Self {
        let (r, g, b) = rgb.into_components();
        let hsl = rgb_to_hsl(r, g, b);
        Self {
            hex: rgb_to_hex(r.into(), g.into(), b.into()),
            rgb: [r, g, b],
            hsl,
            name: color_name(hsl).to_owned(),
        }
    }

    pub fn from_components(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb(Srgb::new(r, g, b))
    }

    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn srgb(&self) -> Srgb<u8> {
        let [r, g, b] = self.rgb;
        Srgb::new(r, g, b)
    }

    pub fn hsl(&self) -> [u16; 3] {
        self.hsl
    }

    pub fn hue(&self) -> u16 {
        self.hsl[0]
    }

    pub fn saturation(&self) -> u16 {
        self.hsl[1]
    }

    pub fn lightness(&self) -> u16 {
        self.hsl[2]
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
