use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use image_to_palette_wasm::{
    ColorInfo, ExportErrorCode, ExtractError, ExtractorConfig, ImageSource, PaletteExtractor,
    export_palette, export_palette_value, extract_palette_bytes, sampler,
};
use rand::{SeedableRng, rngs::StdRng};

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

fn red_square() -> RgbaImage {
    RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255]))
}

#[test]
fn solid_red_square_produces_crimson_palette() {
    let img = red_square();
    let config = ExtractorConfig::default();

    let pixels = sampler::sample_pixels(&img, &config).unwrap();
    assert!(!pixels.is_empty());
    assert!(pixels.iter().all(|p| (p.red, p.green, p.blue) == (255, 0, 0)));

    let extractor = PaletteExtractor::new(config);
    let mut rng = StdRng::seed_from_u64(2024);
    let dominant = extractor.dominant_colors(&img, &mut rng).unwrap();
    assert_eq!(dominant.len(), 12);
    assert!(dominant.iter().all(|c| c.rgb() == [255, 0, 0]));

    let palette = extractor.palette_from_image(&img, &mut rng).unwrap();
    let red = ColorInfo::from_components(255, 0, 0);
    for category in [&palette.primary, &palette.secondary, &palette.brand] {
        assert_eq!(category.len(), 4);
        assert!(category.iter().all(|c| *c == red && c.name() == "Crimson"));
    }
    assert_eq!(palette.semantic.error, red);
    assert_eq!(palette.semantic.success, ColorInfo::from_components(34, 197, 94));
    assert_eq!(palette.semantic.warning, ColorInfo::from_components(251, 191, 36));
    assert_eq!(palette.semantic.info, ColorInfo::from_components(59, 130, 246));
}

#[test]
fn seeded_byte_extraction_is_reproducible() {
    let mut img = RgbaImage::new(64, 48);
    for (x, y, px) in img.enumerate_pixels_mut() {
        *px = Rgba([(x * 4) as u8, (y * 5) as u8, ((x + y) * 2) as u8, 255]);
    }
    let bytes = png_bytes(&img);

    let a = extract_palette_bytes(&bytes, Some(11)).unwrap();
    let b = extract_palette_bytes(&bytes, Some(11)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn oversized_image_is_sampled_after_downscaling() {
    let img = RgbaImage::from_pixel(1600, 800, Rgba([0, 128, 255, 255]));
    let pixels = sampler::sample_pixels(&img, &ExtractorConfig::default()).unwrap();
    // 400x200 after downscaling, one pixel in four kept.
    assert_eq!(pixels.len(), 400 * 200 / 4);
}

#[test]
fn small_image_is_sampled_after_enlarging() {
    let pixels = sampler::sample_pixels(&red_square(), &ExtractorConfig::default()).unwrap();
    assert_eq!(pixels.len(), 400 * 400 / 4);
}

#[test]
fn transparent_image_is_an_empty_sample() {
    let img = RgbaImage::from_pixel(20, 20, Rgba([10, 10, 10, 100]));
    let err = extract_palette_bytes(&png_bytes(&img), Some(1)).unwrap_err();
    assert!(matches!(err, ExtractError::EmptySample));
}

#[test]
fn undecodable_bytes_are_a_decode_error() {
    let err = extract_palette_bytes(b"\x89PNG but not really", Some(1)).unwrap_err();
    assert!(matches!(err, ExtractError::Decode(_)));
}

#[test]
fn image_files_are_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("red.png");
    red_square().save(&path).unwrap();

    let extractor = PaletteExtractor::new(ExtractorConfig::default());
    let palette = extractor
        .extract_with_rng(&ImageSource::Path(path), &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(palette.primary[0].hex(), "#ff0000");
}

#[test]
fn extracted_palette_exports_sixteen_color_styles() {
    let palette = extract_palette_bytes(&png_bytes(&red_square()), Some(3)).unwrap();
    let doc = export_palette(&palette, Some("My Photo!")).unwrap();

    assert_eq!(doc.metadata.color_count, 16);
    assert_eq!(doc.styles.colors.len(), doc.metadata.color_count);
    assert!(doc.file_name.starts_with("My_Photo__palette_"));

    let json = doc.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    for key in ["version", "generator", "generatedAt", "fileName", "description", "styles", "metadata"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
}

#[test]
fn palette_without_semantic_section_fails_export() {
    let palette = extract_palette_bytes(&png_bytes(&red_square()), Some(3)).unwrap();
    let mut value = serde_json::to_value(&palette).unwrap();
    value.as_object_mut().unwrap().remove("semantic");

    let err = export_palette_value(&value, None).unwrap_err();
    assert_eq!(err.code, ExportErrorCode::MissingSection);
}
