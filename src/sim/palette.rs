//! Color palettes and color treatments
//!
//! Entities spawn desaturated; a treatment is only ever produced by the
//! effect paths in `pool`.

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Move each channel `amount` of the way toward white
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let lift = |c: u8| (c as f32 + (255.0 - c as f32) * amount).floor().min(255.0) as u8;
        Self::new(lift(self.r), lift(self.g), lift(self.b))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A named palette entry with one or two gradient stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    pub name: &'static str,
    pub colors: &'static [&'static str],
}

impl PaletteEntry {
    /// Primary and secondary gradient stops (secondary repeats primary when absent)
    pub fn stops(&self) -> (Rgb, Rgb) {
        let first = self.colors.first().and_then(|c| Rgb::from_hex(c)).unwrap_or(Rgb::WHITE);
        let second = self.colors.get(1).and_then(|c| Rgb::from_hex(c)).unwrap_or(first);
        (first, second)
    }
}

const fn entry(name: &'static str, colors: &'static [&'static str]) -> PaletteEntry {
    PaletteEntry { name, colors }
}

/// Default palette shared by most themes
pub const DEFAULT_PALETTE: &[PaletteEntry] = &[
    entry("pink", &["#FF6B9D", "#C44569"]),
    entry("yellow", &["#F8B500"]),
    entry("cyan", &["#4ECDC4", "#95E1D3"]),
    entry("purple", &["#AA96DA"]),
    entry("lightPink", &["#FCBAD3", "#FFC6FF"]),
];

/// Natural autumn palette for leaves
pub const AUTUMN_PALETTE: &[PaletteEntry] = &[
    entry("deepRed", &["#DC143C", "#B22222"]),
    entry("crimson", &["#CD5C5C", "#DC143C"]),
    entry("brightRed", &["#DC143C", "#FF6347"]),
    entry("orange", &["#FF8C00", "#FF7F50"]),
    entry("burntOrange", &["#FF7F50", "#FF6347"]),
    entry("golden", &["#FFD700", "#FFA500"]),
    entry("amber", &["#FFA500", "#FF8C00"]),
    entry("yellow", &["#FFD700", "#FFA500"]),
    entry("brown", &["#8B4513", "#A0522D"]),
    entry("sienna", &["#A0522D", "#CD853F"]),
    entry("rust", &["#B22222", "#8B4513"]),
    entry("copper", &["#CD5C5C", "#A0522D"]),
];

/// Stem fill for mushrooms once colored
pub const MUSHROOM_STEM: Rgb = Rgb::new(250, 245, 240);
/// Spot fill for mushrooms once colored
pub const MUSHROOM_SPOT: Rgb = Rgb::new(50, 30, 20);

/// Colors applied to an entity by a color treatment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorTreatment {
    /// Palette entry the treatment was drawn from
    pub palette: String,
    /// Gradient stops for the primary element
    pub primary: (Rgb, Rgb),
    /// Fill for each secondary element (same order as `ShapeSet::secondaries`)
    pub secondaries: Vec<Rgb>,
}
