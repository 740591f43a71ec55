//! Extract a categorized color palette from an image and export it as a
//! Figma-style design-system document.
//!
//! Pipeline: decode → sample opaque pixels → k-means in RGB → categorize into
//! primary / secondary / brand / semantic → (on demand) export.

use image::RgbaImage;
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::info;

pub mod categories;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod kmeans;
pub mod sampler;
pub mod wasm;

pub use categories::{ColorPalette, SemanticColors, SemanticKey, build_palette};
pub use color::ColorInfo;
pub use config::ExtractorConfig;
pub use error::{ClusterError, DecodeError, ExtractError};
pub use export::{
    ExportDocument, ExportError, ExportErrorCode, build_export_document, export_palette,
    export_palette_json, export_palette_value,
};
pub use sampler::{ImageCrateDecoder, ImageDecoder, ImageSource};

/// Runs the extraction pipeline with a given configuration and decoder.
///
/// Each call is independent: nothing is cached between invocations.
#[derive(Debug, Clone)]
pub struct PaletteExtractor<D = ImageCrateDecoder> {
    config: ExtractorConfig,
    decoder: D,
}

impl PaletteExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        let decoder = ImageCrateDecoder::new(config.fetch_timeout());
        Self { config, decoder }
    }
}

impl Default for PaletteExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}

impl<D: ImageDecoder> PaletteExtractor<D> {
    pub fn with_decoder(config: ExtractorConfig, decoder: D) -> Self {
        Self { config, decoder }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a palette using the thread-local RNG for centroid seeding.
    pub fn extract(&self, source: &ImageSource) -> Result<ColorPalette, ExtractError> {
        self.extract_with_rng(source, &mut rand::rng())
    }

    pub fn extract_with_rng<R: Rng + ?Sized>(
        &self,
        source: &ImageSource,
        rng: &mut R,
    ) -> Result<ColorPalette, ExtractError> {
        let img = self.decoder.decode(source)?;
        let palette = self.palette_from_image(&img, rng)?;
        info!(%source, "extracted palette");
        Ok(palette)
    }

    /// Run everything after decoding on an RGBA buffer.
    pub fn palette_from_image<R: Rng + ?Sized>(
        &self,
        img: &RgbaImage,
        rng: &mut R,
    ) -> Result<ColorPalette, ExtractError> {
        let dominant = self.dominant_colors(img, rng)?;
        build_palette(&dominant)
    }

    /// The `clusters` k-means centroids of the sampled image, in clustering order.
    pub fn dominant_colors<R: Rng + ?Sized>(
        &self,
        img: &RgbaImage,
        rng: &mut R,
    ) -> Result<Vec<ColorInfo>, ExtractError> {
        let pixels = sampler::sample_pixels(img, &self.config)?;
        let centroids =
            kmeans::kmeans(&pixels, self.config.clusters, self.config.iterations, rng)?;
        Ok(centroids.into_iter().map(ColorInfo::from_rgb).collect())
    }
}

/// Extract a palette from `source` with the default configuration.
pub fn extract_palette(source: &ImageSource) -> Result<ColorPalette, ExtractError> {
    PaletteExtractor::new(ExtractorConfig::default()).extract(source)
}

/// Extract a palette from encoded image bytes. A `seed` makes the result
/// reproducible.
pub fn extract_palette_bytes(
    input: &[u8],
    seed: Option<u64>,
) -> Result<ColorPalette, ExtractError> {
    let extractor = PaletteExtractor::new(ExtractorConfig::default());
    let source = ImageSource::Bytes(input.to_vec());
    match seed {
        Some(seed) => extractor.extract_with_rng(&source, &mut StdRng::seed_from_u64(seed)),
        None => extractor.extract(&source),
    }
}
