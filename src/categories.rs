//! Sorting dominant colors into the palette categories.

use serde::{Deserialize, Serialize};

use crate::color::ColorInfo;
use crate::error::ExtractError;

/// Number of colors in each of `primary`, `secondary` and `brand`.
pub const CATEGORY_SIZE: usize = 4;

/// Fixed-purpose colors for UI state messaging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticColors {
    pub success: ColorInfo,
    pub warning: ColorInfo,
    pub error: ColorInfo,
    pub info: ColorInfo,
}

impl SemanticColors {
    /// `(key, color)` pairs in export order.
    pub fn entries(&self) -> [(SemanticKey, &ColorInfo); 4] {
        [
            (SemanticKey::Success, &self.success),
            (SemanticKey::Warning, &self.warning),
            (SemanticKey::Error, &self.error),
            (SemanticKey::Info, &self.info),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticKey {
    Success,
    Warning,
    Error,
    Info,
}

impl SemanticKey {
    pub const ALL: [SemanticKey; 4] = [Self::Success, Self::Warning, Self::Error, Self::Info];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Warning => "Warning",
            Self::Error => "Error",
            Self::Info => "Info",
        }
    }

    /// Inclusive hue range a dominant color must fall in to fill this slot.
    fn hue_range(self) -> (u16, u16) {
        match self {
            Self::Success => (100, 140),
            Self::Warning => (35, 65),
            Self::Error => (0, 20),
            Self::Info => (200, 240),
        }
    }

    fn fallback(self) -> ColorInfo {
        match self {
            Self::Success => ColorInfo::from_components(34, 197, 94),
            Self::Warning => ColorInfo::from_components(251, 191, 36),
            Self::Error => ColorInfo::from_components(239, 68, 68),
            Self::Info => ColorInfo::from_components(59, 130, 246),
        }
    }

    fn matches(self, color: &ColorInfo) -> bool {
        let (lo, hi) = self.hue_range();
        (lo..=hi).contains(&color.hue()) && color.saturation() > 30
    }

    /// First matching dominant color, else the fixed default for the slot.
    fn pick(self, dominant: &[ColorInfo]) -> ColorInfo {
        dominant
            .iter()
            .find(|c| self.matches(c))
            .cloned()
            .unwrap_or_else(|| self.fallback())
    }
}

/// The categorized palette produced by one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub primary: Vec<ColorInfo>,
    pub secondary: Vec<ColorInfo>,
    pub brand: Vec<ColorInfo>,
    pub semantic: SemanticColors,
}

/// Fill `selected` up to [`CATEGORY_SIZE`] with colors from `dominant`, in
/// order, starting over when the list runs out. Duplicates are expected.
fn pad(mut selected: Vec<ColorInfo>, dominant: &[ColorInfo]) -> Vec<ColorInfo> {
    selected.truncate(CATEGORY_SIZE);
    let missing = CATEGORY_SIZE - selected.len();
    selected.extend(dominant.iter().cycle().take(missing).cloned());
    selected
}

fn top_by<K: Ord>(dominant: &[ColorInfo], key: impl Fn(&ColorInfo) -> K) -> Vec<ColorInfo> {
    let mut sorted = dominant.to_vec();
    // Stable, so equal keys keep clustering order.
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted.truncate(CATEGORY_SIZE);
    sorted
}

fn is_brand(color: &ColorInfo) -> bool {
    let l = color.lightness();
    color.saturation() > 30 && l > 20 && l < 80
}

/// Categorize dominant colors into a [`ColorPalette`].
///
/// * `primary`: the lightest colors.
/// * `secondary`: the most saturated colors.
/// * `brand`: colors with balanced saturation and lightness, in clustering order.
/// * `semantic`: first color in a slot's hue range, or the slot's default.
pub fn build_palette(dominant: &[ColorInfo]) -> Result<ColorPalette, ExtractError> {
    if dominant.is_empty() {
        return Err(ExtractError::NoDominantColors);
    }

    let primary = top_by(dominant, ColorInfo::lightness);
    let secondary = top_by(dominant, ColorInfo::saturation);
    let brand: Vec<ColorInfo> = dominant
        .iter()
        .filter(|c| is_brand(c))
        .take(CATEGORY_SIZE)
        .cloned()
        .collect();

    let semantic = SemanticColors {
        success: SemanticKey::Success.pick(dominant),
        warning: SemanticKey::Warning.pick(dominant),
        error: SemanticKey::Error.pick(dominant),
        info: SemanticKey::Info.pick(dominant),
    };

    Ok(ColorPalette {
        primary: pad(primary, dominant),
        secondary: pad(secondary, dominant),
        brand: pad(brand, dominant),
        semantic,
    })
}
