//! Figma-style design-system export for a [`ColorPalette`].
//!
//! Every entry point validates its input before building anything and reports
//! problems as an [`ExportError`] value; no partial document is ever returned.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use time::macros::format_description;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::categories::{CATEGORY_SIZE, ColorPalette, SemanticKey};
use crate::color::{ColorInfo, hex_to_rgb};

pub const EXPORT_VERSION: &str = "1.0";
pub const GENERATOR: &str = "Palette Studio";
pub const DESCRIPTION: &str =
    "Design system generated from nature photography: color, typography and effect styles";
/// File name stem used when no display name is given.
pub const FALLBACK_FILE_STEM: &str = "nature_palette";

// ------------------------------------------------------------
// Errors
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportErrorCode {
    InvalidPalette,
    MissingSection,
    EmptyColorArray,
    InvalidColorData,
    InvalidSemanticColor,
    ConversionError,
    SerializationError,
}

impl ExportErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPalette => "INVALID_PALETTE",
            Self::MissingSection => "MISSING_SECTION",
            Self::EmptyColorArray => "EMPTY_COLOR_ARRAY",
            Self::InvalidColorData => "INVALID_COLOR_DATA",
            Self::InvalidSemanticColor => "INVALID_SEMANTIC_COLOR",
            Self::ConversionError => "CONVERSION_ERROR",
            Self::SerializationError => "SERIALIZATION_ERROR",
        }
    }

    /// Validation failures can be fixed by regenerating the palette.
    pub fn is_validation(self) -> bool {
        !matches!(self, Self::ConversionError | Self::SerializationError)
    }
}

/// Structured export failure, shaped for direct hand-off to a UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ExportError {
    pub code: ExportErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ExportError {
    fn new(code: ExportErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details),
        }
    }
}

// ------------------------------------------------------------
// Document
// ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StyleType {
    Paint,
    Text,
    Effect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintType {
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectType {
    DropShadow,
    InnerShadow,
    LayerBlur,
    BackgroundBlur,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    Original,
    Upper,
    Lower,
    Title,
}

/// RGB with channels in `[0, 1]`, as design tools expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitRgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    #[serde(rename = "type")]
    pub kind: PaintType,
    pub color: UnitRgb,
    pub opacity: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStyle {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: StyleType,
    pub paints: Vec<Paint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: StyleType,
    pub font_family: String,
    pub font_weight: u16,
    pub font_size: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_case: Option<TextCase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    #[serde(rename = "type")]
    pub kind: EffectType,
    pub visible: bool,
    pub radius: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<UnitRgba>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectStyle {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: StyleType,
    pub effects: Vec<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportStyles {
    pub colors: Vec<ColorStyle>,
    pub text: Vec<TextStyle>,
    pub effects: Vec<EffectStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub primary: usize,
    pub secondary: usize,
    pub brand: usize,
    pub semantic: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub total_styles: usize,
    pub color_count: usize,
    pub text_style_count: usize,
    pub effect_count: usize,
    pub categories: CategoryCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub generator: String,
    pub generated_at: String,
    pub file_name: String,
    pub description: String,
    pub styles: ExportStyles,
    pub metadata: ExportMetadata,
}

impl ExportDocument {
    /// Pretty-printed JSON, the format design-tool importers consume.
    pub fn to_json_pretty(&self) -> Result<String, ExportError> {
        serde_json::to_string_pretty(self).map_err(|err| {
            ExportError::new(
                ExportErrorCode::SerializationError,
                "Failed to serialize export document",
                json!({ "error": err.to_string() }),
            )
        })
    }

    /// Suggested name for the downloaded file.
    pub fn download_name(&self) -> String {
        format!("{}.json", self.file_name)
    }
}

// ------------------------------------------------------------
// Validation
// ------------------------------------------------------------

const COLOR_SECTIONS: [&str; 3] = ["primary", "secondary", "brand"];

fn color_sections(palette: &ColorPalette) -> [(&'static str, &[ColorInfo]); 3] {
    [
        ("primary", palette.primary.as_slice()),
        ("secondary", palette.secondary.as_slice()),
        ("brand", palette.brand.as_slice()),
    ]
}

fn color_problem(color: &ColorInfo) -> Option<&'static str> {
    if color.hex().is_empty() {
        Some("hex is empty")
    } else if color.name().is_empty() {
        Some("name is empty")
    } else {
        None
    }
}

/// Checks on an already typed palette; rgb and hsl arity is guaranteed by the type.
fn validate_palette(palette: &ColorPalette) -> Result<(), ExportError> {
    for (section, colors) in color_sections(palette) {
        if colors.is_empty() {
            return Err(ExportError::new(
                ExportErrorCode::EmptyColorArray,
                format!("Palette section '{section}' contains no colors"),
                json!({ "section": section }),
            ));
        }
        for (index, color) in colors.iter().enumerate() {
            if let Some(problem) = color_problem(color) {
                return Err(ExportError::new(
                    ExportErrorCode::InvalidColorData,
                    format!("Invalid color at {section}[{index}]: {problem}"),
                    json!({ "section": section, "index": index, "color": color }),
                ));
            }
        }
    }
    for (key, color) in palette.semantic.entries() {
        if let Some(problem) = color_problem(color) {
            return Err(ExportError::new(
                ExportErrorCode::InvalidSemanticColor,
                format!("Invalid semantic color '{}': {problem}", key.as_str()),
                json!({ "key": key.as_str(), "color": color }),
            ));
        }
    }
    Ok(())
}

fn value_color_problem(value: &Value) -> Option<&'static str> {
    let Some(obj) = value.as_object() else {
        return Some("color is not an object");
    };
    let non_empty_str =
        |key: &str| obj.get(key).and_then(Value::as_str).is_some_and(|s| !s.is_empty());
    let triple = |key: &str| {
        obj.get(key)
            .and_then(Value::as_array)
            .is_some_and(|items| items.len() == 3 && items.iter().all(Value::is_u64))
    };

    if !non_empty_str("hex") {
        Some("hex must be a non-empty string")
    } else if !triple("rgb") {
        Some("rgb must hold 3 integers")
    } else if !triple("hsl") {
        Some("hsl must hold 3 integers")
    } else if !non_empty_str("name") {
        Some("name must be a non-empty string")
    } else {
        None
    }
}

/// Structural checks on untrusted JSON, in the order callers see them reported.
fn validate_value(value: &Value) -> Result<(), ExportError> {
    let Some(obj) = value.as_object() else {
        return Err(ExportError::new(
            ExportErrorCode::InvalidPalette,
            "Palette data is missing or is not an object",
            json!({ "received": value_kind(value) }),
        ));
    };

    for section in COLOR_SECTIONS.iter().copied().chain(["semantic"]) {
        if obj.get(section).is_none_or(Value::is_null) {
            return Err(ExportError::new(
                ExportErrorCode::MissingSection,
                format!("Palette is missing the '{section}' section"),
                json!({ "section": section }),
            ));
        }
    }

    for section in COLOR_SECTIONS {
        let colors = match obj[section].as_array() {
            Some(colors) if !colors.is_empty() => colors,
            _ => {
                return Err(ExportError::new(
                    ExportErrorCode::EmptyColorArray,
                    format!("Palette section '{section}' must be a non-empty array"),
                    json!({ "section": section }),
                ));
            }
        };
        for (index, color) in colors.iter().enumerate() {
            if let Some(problem) = value_color_problem(color) {
                return Err(ExportError::new(
                    ExportErrorCode::InvalidColorData,
                    format!("Invalid color at {section}[{index}]: {problem}"),
                    json!({ "section": section, "index": index, "color": color }),
                ));
            }
        }
    }

    let semantic = &obj["semantic"];
    for key in SemanticKey::ALL {
        let color = semantic.get(key.as_str()).unwrap_or(&Value::Null);
        if let Some(problem) = value_color_problem(color) {
            return Err(ExportError::new(
                ExportErrorCode::InvalidSemanticColor,
                format!("Invalid semantic color '{}': {problem}", key.as_str()),
                json!({ "key": key.as_str(), "color": color }),
            ));
        }
    }
    Ok(())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ------------------------------------------------------------
// Construction
// ------------------------------------------------------------

/// Convert `#rrggbb` to unit RGB.
pub fn hex_to_unit_rgb(hex: &str) -> Result<UnitRgb, ExportError> {
    let [r, g, b] = hex_to_rgb(hex).ok_or_else(|| {
        ExportError::new(
            ExportErrorCode::ConversionError,
            format!("Cannot convert malformed hex color '{hex}'"),
            json!({ "hex": hex }),
        )
    })?;
    let unit = |c: u8| (f64::from(c) / 255.0).clamp(0.0, 1.0);
    Ok(UnitRgb {
        r: unit(r),
        g: unit(g),
        b: unit(b),
    })
}

fn color_style(color: &ColorInfo, name: String) -> Result<ColorStyle, ExportError> {
    let [r, g, b] = color.rgb();
    let [h, s, l] = color.hsl();
    Ok(ColorStyle {
        name,
        description: format!(
            "{} • RGB({r}, {g}, {b}) • HSL({h}, {s}%, {l}%)",
            color.hex()
        ),
        kind: StyleType::Paint,
        paints: vec![Paint {
            kind: PaintType::Solid,
            color: hex_to_unit_rgb(color.hex())?,
            opacity: 1.0,
            visible: true,
        }],
    })
}

fn category_label(section: &str) -> &'static str {
    match section {
        "primary" => "Primary",
        "secondary" => "Secondary",
        _ => "Brand",
    }
}

fn color_styles(palette: &ColorPalette) -> Result<Vec<ColorStyle>, ExportError> {
    let mut styles = Vec::with_capacity(CATEGORY_SIZE * 4);
    for (section, colors) in color_sections(palette) {
        let label = category_label(section);
        for (index, color) in colors.iter().enumerate() {
            let name = format!("{label}/{} {:02}", color.name(), index + 1);
            styles.push(color_style(color, name)?);
        }
    }
    for (key, color) in palette.semantic.entries() {
        styles.push(color_style(color, format!("Semantic/{}", key.label()))?);
    }
    Ok(styles)
}

const DISPLAY_FONT: &str = "Bodoni Moda";
const BODY_FONT: &str = "Helvetica Neue";

/// (name, description, family, weight, size, line height, letter spacing, case)
type TextSpec = (
    &'static str,
    &'static str,
    &'static str,
    u16,
    f64,
    f64,
    f64,
    Option<TextCase>,
);

const TEXT_STYLES: [TextSpec; 8] = [
    ("Display/Hero", "Hero headline", DISPLAY_FONT, 700, 72.0, 80.0, -1.5, None),
    ("Display/Title", "Page title", DISPLAY_FONT, 600, 48.0, 56.0, -1.0, None),
    ("Heading/H1", "Section heading", DISPLAY_FONT, 600, 36.0, 44.0, -0.5, None),
    ("Heading/H2", "Subsection heading", DISPLAY_FONT, 500, 28.0, 36.0, -0.25, None),
    ("Body/Large", "Lead paragraph", BODY_FONT, 400, 18.0, 28.0, 0.0, None),
    ("Body/Regular", "Default body copy", BODY_FONT, 400, 16.0, 24.0, 0.0, None),
    ("Body/Small", "Secondary copy", BODY_FONT, 400, 14.0, 20.0, 0.1, None),
    (
        "Label/Caption",
        "Labels and captions",
        BODY_FONT,
        500,
        12.0,
        16.0,
        0.4,
        Some(TextCase::Upper),
    ),
];

pub fn text_styles() -> Vec<TextStyle> {
    TEXT_STYLES
        .iter()
        .map(
            |&(name, description, family, weight, size, line_height, spacing, case)| TextStyle {
                name: name.to_owned(),
                description: Some(description.to_owned()),
                kind: StyleType::Text,
                font_family: family.to_owned(),
                font_weight: weight,
                font_size: size,
                line_height: Some(line_height),
                letter_spacing: Some(spacing),
                text_case: case,
            },
        )
        .collect()
}

/// Cool gray used for the dark half of the neumorphic shadows.
const SHADOW_RGB: [u8; 3] = [163, 177, 198];
const HIGHLIGHT_RGB: [u8; 3] = [255, 255, 255];

fn shadow(kind: EffectType, rgb: [u8; 3], alpha: f64, offset: f64, radius: f64) -> Effect {
    let unit = |c: u8| f64::from(c) / 255.0;
    Effect {
        kind,
        visible: true,
        radius,
        color: Some(UnitRgba {
            r: unit(rgb[0]),
            g: unit(rgb[1]),
            b: unit(rgb[2]),
            a: alpha,
        }),
        offset: Some(Offset {
            x: offset,
            y: offset,
        }),
        spread: Some(0.0),
    }
}

/// A neumorphic pair: a dark shadow bottom-right and a highlight top-left.
fn neumorphic(kind: EffectType, distance: f64, dark: f64, light: f64) -> Vec<Effect> {
    let radius = distance * 2.0;
    vec![
        shadow(kind, SHADOW_RGB, dark, distance, radius),
        shadow(kind, HIGHLIGHT_RGB, light, -distance, radius),
    ]
}

pub fn effect_styles() -> Vec<EffectStyle> {
    [
        (
            "Neumorphic/Raised Small",
            "Subtle raised surface",
            neumorphic(EffectType::DropShadow, 4.0, 0.4, 0.9),
        ),
        (
            "Neumorphic/Raised",
            "Default raised surface",
            neumorphic(EffectType::DropShadow, 8.0, 0.6, 0.8),
        ),
        (
            "Neumorphic/Inset",
            "Pressed surface",
            neumorphic(EffectType::InnerShadow, 4.0, 0.4, 0.9),
        ),
    ]
    .into_iter()
    .map(|(name, description, effects)| EffectStyle {
        name: name.to_owned(),
        description: Some(description.to_owned()),
        kind: StyleType::Effect,
        effects,
    })
    .collect()
}

/// Replace everything outside `[A-Za-z0-9]` with `_`, one per UTF-16 code
/// unit, so characters outside the BMP (most emoji) become `__`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else {
            slug.extend(std::iter::repeat_n('_', c.len_utf16()));
        }
    }
    slug
}

fn file_name(
    display_name: Option<&str>,
    generated_at: OffsetDateTime,
) -> Result<String, ExportError> {
    let date = generated_at
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| {
            ExportError::new(
                ExportErrorCode::SerializationError,
                "Failed to format export date",
                json!({ "error": err.to_string() }),
            )
        })?;
    Ok(match display_name.filter(|name| !name.is_empty()) {
        Some(name) => format!("{}_palette_{date}", slugify(name)),
        None => format!("{FALLBACK_FILE_STEM}_{date}"),
    })
}

/// Build the export document for `palette`, stamped with `generated_at`.
pub fn build_export_document_at(
    palette: &ColorPalette,
    display_name: Option<&str>,
    generated_at: OffsetDateTime,
) -> Result<ExportDocument, ExportError> {
    validate_palette(palette)?;

    let colors = color_styles(palette)?;
    let text = text_styles();
    let effects = effect_styles();

    let timestamp = generated_at.format(&Rfc3339).map_err(|err| {
        ExportError::new(
            ExportErrorCode::SerializationError,
            "Failed to format generation timestamp",
            json!({ "error": err.to_string() }),
        )
    })?;

    let metadata = ExportMetadata {
        total_styles: colors.len() + text.len() + effects.len(),
        color_count: colors.len(),
        text_style_count: text.len(),
        effect_count: effects.len(),
        categories: CategoryCounts {
            primary: palette.primary.len(),
            secondary: palette.secondary.len(),
            brand: palette.brand.len(),
            semantic: SemanticKey::ALL.len(),
        },
    };

    Ok(ExportDocument {
        version: EXPORT_VERSION.to_owned(),
        generator: GENERATOR.to_owned(),
        generated_at: timestamp,
        file_name: file_name(display_name, generated_at)?,
        description: DESCRIPTION.to_owned(),
        styles: ExportStyles {
            colors,
            text,
            effects,
        },
        metadata,
    })
}

/// Build the export document for `palette`, stamped with the current UTC time.
pub fn build_export_document(
    palette: &ColorPalette,
    display_name: Option<&str>,
) -> Result<ExportDocument, ExportError> {
    build_export_document_at(palette, display_name, OffsetDateTime::now_utc())
}

/// Serialize and parse the document back, so callers only ever receive
/// documents that survive the text encoding.
fn verify_round_trip(document: &ExportDocument) -> Result<(), ExportError> {
    let text = document.to_json_pretty()?;
    let decoded: ExportDocument = serde_json::from_str(&text).map_err(|err| {
        ExportError::new(
            ExportErrorCode::SerializationError,
            "Export document did not survive JSON round trip",
            json!({ "error": err.to_string() }),
        )
    })?;
    if decoded.metadata != document.metadata
        || decoded.styles.colors.len() != document.styles.colors.len()
        || decoded.file_name != document.file_name
    {
        return Err(ExportError::new(
            ExportErrorCode::SerializationError,
            "Export document changed during JSON round trip",
            json!({ "fileName": document.file_name }),
        ));
    }
    Ok(())
}

/// Validate, build and self-check an export document.
pub fn export_palette(
    palette: &ColorPalette,
    display_name: Option<&str>,
) -> Result<ExportDocument, ExportError> {
    let document = build_export_document(palette, display_name)?;
    verify_round_trip(&document)?;
    info!(
        file_name = %document.file_name,
        colors = document.metadata.color_count,
        total = document.metadata.total_styles,
        "built palette export"
    );
    Ok(document)
}

/// Export from untyped JSON, e.g. a palette handed over by JavaScript or read
/// from disk. Structural problems are reported with the matching error code.
pub fn export_palette_value(
    value: &Value,
    display_name: Option<&str>,
) -> Result<ExportDocument, ExportError> {
    validate_value(value)?;
    let palette: ColorPalette = serde_json::from_value(value.clone()).map_err(|err| {
        debug!(error = %err, "palette passed structural checks but failed to deserialize");
        ExportError::new(
            ExportErrorCode::InvalidPalette,
            "Palette data has out-of-range values",
            json!({ "error": err.to_string() }),
        )
    })?;
    export_palette(&palette, display_name)
}

/// Like [`export_palette_value`], starting from JSON text.
pub fn export_palette_json(
    text: &str,
    display_name: Option<&str>,
) -> Result<ExportDocument, ExportError> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        ExportError::new(
            ExportErrorCode::InvalidPalette,
            "Palette data is not valid JSON",
            json!({ "error": err.to_string() }),
        )
    })?;
    export_palette_value(&value, display_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::build_palette;
    use time::macros::datetime;

    fn sample_palette() -> ColorPalette {
        let dominant: Vec<ColorInfo> = [
            (255, 0, 0),
            (0, 200, 50),
            (0, 0, 255),
            (230, 190, 0),
            (240, 240, 240),
            (20, 20, 20),
        ]
        .into_iter()
        .map(|(r, g, b)| ColorInfo::from_components(r, g, b))
        .collect();
        build_palette(&dominant).unwrap()
    }

    fn stamp() -> OffsetDateTime {
        datetime!(2026-10-14 09:30:00 UTC)
    }

    #[test]
    fn well_formed_palette_exports_sixteen_colors() {
        let doc = build_export_document_at(&sample_palette(), None, stamp()).unwrap();
        assert_eq!(doc.metadata.color_count, 16);
        assert_eq!(doc.styles.colors.len(), 16);
        assert_eq!(doc.metadata.text_style_count, 8);
        assert_eq!(doc.styles.text.len(), 8);
        assert_eq!(doc.metadata.effect_count, 3);
        assert_eq!(doc.styles.effects.len(), 3);
        assert_eq!(doc.metadata.total_styles, 27);
        assert_eq!(
            doc.metadata.categories,
            CategoryCounts {
                primary: 4,
                secondary: 4,
                brand: 4,
                semantic: 4
            }
        );
    }

    #[test]
    fn style_names_carry_category_and_index() {
        let palette = sample_palette();
        let doc = build_export_document_at(&palette, None, stamp()).unwrap();
        let names: Vec<&str> = doc.styles.colors.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names[0], format!("Primary/{} 01", palette.primary[0].name()));
        assert_eq!(names[7], format!("Secondary/{} 04", palette.secondary[3].name()));
        assert_eq!(names[8], format!("Brand/{} 01", palette.brand[0].name()));
        assert_eq!(
            &names[12..],
            ["Semantic/Success", "Semantic/Warning", "Semantic/Error", "Semantic/Info"]
        );
    }

    #[test]
    fn paints_use_unit_rgb() {
        let doc = build_export_document_at(&sample_palette(), None, stamp()).unwrap();
        let error_style = &doc.styles.colors[14];
        assert_eq!(error_style.paints[0].color, UnitRgb { r: 1.0, g: 0.0, b: 0.0 });
        assert!(error_style.description.starts_with("#ff0000 • RGB(255, 0, 0)"));
    }

    #[test]
    fn metadata_and_file_name_are_stamped() {
        let doc = build_export_document_at(&sample_palette(), None, stamp()).unwrap();
        assert_eq!(doc.version, EXPORT_VERSION);
        assert_eq!(doc.generator, GENERATOR);
        assert_eq!(doc.generated_at, "2026-10-14T09:30:00Z");
        assert_eq!(doc.file_name, "nature_palette_2026-10-14");
        assert_eq!(doc.download_name(), "nature_palette_2026-10-14.json");
    }

    #[test]
    fn file_name_date_is_zero_padded() {
        let early = datetime!(2026-03-05 23:59:59 UTC);
        let doc = build_export_document_at(&sample_palette(), Some("dawn"), early).unwrap();
        assert_eq!(doc.file_name, "dawn_palette_2026-03-05");
    }

    #[test]
    fn display_name_is_slugged_into_file_name() {
        let doc =
            build_export_document_at(&sample_palette(), Some("My Photo!"), stamp()).unwrap();
        assert!(doc.file_name.contains("My_Photo_"));
        assert_eq!(doc.file_name, "My_Photo__palette_2026-10-14");

        let empty = build_export_document_at(&sample_palette(), Some(""), stamp()).unwrap();
        assert_eq!(empty.file_name, "nature_palette_2026-10-14");
    }

    #[test]
    fn json_uses_camel_case_and_figma_tags() {
        let doc = build_export_document_at(&sample_palette(), None, stamp()).unwrap();
        let value: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["generatedAt"], "2026-10-14T09:30:00Z");
        assert_eq!(value["metadata"]["colorCount"], 16);
        assert_eq!(value["metadata"]["textStyleCount"], 8);
        assert_eq!(value["styles"]["colors"][0]["type"], "PAINT");
        assert_eq!(value["styles"]["colors"][0]["paints"][0]["type"], "SOLID");
        assert_eq!(value["styles"]["text"][0]["fontFamily"], "Bodoni Moda");
        assert_eq!(value["styles"]["text"][7]["textCase"], "UPPER");
        assert_eq!(value["styles"]["effects"][2]["effects"][0]["type"], "INNER_SHADOW");
        assert!(value["styles"]["text"][0].get("textCase").is_none());
    }

    #[test]
    fn missing_semantic_section_is_reported_without_document() {
        let mut value = serde_json::to_value(sample_palette()).unwrap();
        value.as_object_mut().unwrap().remove("semantic");
        let err = export_palette_value(&value, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::MissingSection);
        assert_eq!(err.details, Some(json!({ "section": "semantic" })));
    }

    #[test]
    fn null_palette_is_invalid() {
        let err = export_palette_json("null", None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::InvalidPalette);
        let err = export_palette_json("{ not json", None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::InvalidPalette);
    }

    #[test]
    fn empty_color_array_is_reported() {
        let mut palette = sample_palette();
        palette.brand.clear();
        let err = export_palette(&palette, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::EmptyColorArray);

        let mut value = serde_json::to_value(sample_palette()).unwrap();
        value["secondary"] = json!([]);
        let err = export_palette_value(&value, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::EmptyColorArray);
        assert_eq!(err.details, Some(json!({ "section": "secondary" })));
    }

    #[test]
    fn short_rgb_triple_is_invalid_color_data() {
        let mut value = serde_json::to_value(sample_palette()).unwrap();
        value["primary"][2]["rgb"] = json!([1, 2]);
        let err = export_palette_value(&value, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::InvalidColorData);
        let details = err.details.unwrap();
        assert_eq!(details["section"], "primary");
        assert_eq!(details["index"], 2);
    }

    #[test]
    fn broken_semantic_color_names_its_key() {
        let mut value = serde_json::to_value(sample_palette()).unwrap();
        value["semantic"]["warning"]["name"] = json!("");
        let err = export_palette_value(&value, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::InvalidSemanticColor);
        assert_eq!(err.details.unwrap()["key"], "warning");
    }

    #[test]
    fn malformed_hex_is_a_conversion_error() {
        let mut value = serde_json::to_value(sample_palette()).unwrap();
        value["brand"][0]["hex"] = json!("#12345");
        let err = export_palette_value(&value, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::ConversionError);
        assert!(err.message.contains("#12345"));
        assert!(!err.code.is_validation());
    }

    #[test]
    fn out_of_range_channels_are_rejected_before_construction() {
        let mut value = serde_json::to_value(sample_palette()).unwrap();
        value["primary"][0]["rgb"] = json!([256, 0, 0]);
        let err = export_palette_value(&value, None).unwrap_err();
        assert_eq!(err.code, ExportErrorCode::InvalidPalette);
    }

    #[test]
    fn valid_json_palette_exports() {
        let text = serde_json::to_string(&sample_palette()).unwrap();
        let doc = export_palette_json(&text, Some("lake")).unwrap();
        assert_eq!(doc.metadata.color_count, 16);
        assert!(doc.file_name.starts_with("lake_palette_"));
    }

    #[test]
    fn error_serializes_with_screaming_code() {
        let err = export_palette_json("null", None).unwrap_err();
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["code"], "INVALID_PALETTE");
        assert_eq!(err.code.as_str(), "INVALID_PALETTE");
        assert_eq!(err.to_string(), err.message);
    }

    #[test]
    fn slugify_replaces_non_alphanumerics() {
        assert_eq!(slugify("My Photo!"), "My_Photo_");
        assert_eq!(slugify("lake-view 2.jpg"), "lake_view_2_jpg");
        assert_eq!(slugify("café"), "caf_");
        assert_eq!(slugify("sun🌅"), "sun__");
        assert_eq!(slugify("a😀b"), "a__b");
    }
}
