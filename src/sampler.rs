use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use image::{RgbaImage, imageops::FilterType};
use palette::Srgb;
use tracing::debug;

use crate::config::ExtractorConfig;
use crate::error::{DecodeError, ExtractError};

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// An encoded image already held in memory (PNG, JPEG, ...).
    Bytes(Vec<u8>),
    /// A file on disk.
    Path(PathBuf),
    /// An `http(s)` URL, fetched with the `remote` feature.
    Url(String),
}

impl ImageSource {
    /// Interpret a command-line style argument as a URL or a path.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_owned())
        } else {
            Self::Path(PathBuf::from(input))
        }
    }

    /// Short label used in logs and as a default display name.
    pub fn display_name(&self) -> Option<String> {
        match self {
            Self::Bytes(_) => None,
            Self::Path(path) => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned()),
            Self::Url(url) => url
                .split(['?', '#'])
                .next()
                .and_then(|base| base.rsplit('/').find(|segment| !segment.is_empty()))
                .map(|segment| match segment.rsplit_once('.') {
                    Some((stem, _)) if !stem.is_empty() => stem.to_owned(),
                    _ => segment.to_owned(),
                }),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Turns a source into a full-resolution RGBA buffer.
pub trait ImageDecoder {
    fn decode(&self, source: &ImageSource) -> Result<RgbaImage, DecodeError>;
}

/// Decoder backed by the `image` crate; remote sources go through `reqwest`.
#[derive(Debug, Clone)]
pub struct ImageCrateDecoder {
    fetch_timeout: Duration,
}

impl ImageCrateDecoder {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self { fetch_timeout }
    }

    fn decode_bytes(bytes: &[u8]) -> Result<RgbaImage, DecodeError> {
        let img = image::load_from_memory(bytes)?;
        Ok(img.to_rgba8())
    }

    fn read_path(path: &Path) -> Result<Vec<u8>, DecodeError> {
        fs::read(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    #[cfg(feature = "remote")]
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        let fetch_err = |source| DecodeError::Fetch {
            url: url.to_owned(),
            source,
        };
        let client = reqwest::blocking::Client::builder()
            .timeout(self.fetch_timeout)
            .build()
            .map_err(fetch_err)?;
        let response = client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let bytes = response.bytes().map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "remote"))]
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DecodeError> {
        let _ = self.fetch_timeout;
        Err(DecodeError::RemoteDisabled(url.to_owned()))
    }
}

impl Default for ImageCrateDecoder {
    fn default() -> Self {
        Self::new(ExtractorConfig::default().fetch_timeout())
    }
}

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, source: &ImageSource) -> Result<RgbaImage, DecodeError> {
        let img = match source {
            ImageSource::Bytes(bytes) => Self::decode_bytes(bytes)?,
            ImageSource::Path(path) => Self::decode_bytes(&Self::read_path(path)?)?,
            ImageSource::Url(url) => Self::decode_bytes(&self.fetch(url)?)?,
        };
        if img.width() == 0 || img.height() == 0 {
            return Err(DecodeError::EmptyImage);
        }
        Ok(img)
    }
}

/// Scale `width`x`height` by `min(max/width, max/height)`, keeping the aspect
/// ratio, so the longer side becomes exactly `max_dimension`. Small images
/// are enlarged. Sides are truncated, like assigning to a canvas size, and
/// never drop below 1.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    let max = f64::from(max_dimension);
    let scale = (max / f64::from(width)).min(max / f64::from(height));
    let w = ((f64::from(width) * scale) as u32).max(1);
    let h = ((f64::from(height) * scale) as u32).max(1);
    (w, h)
}

/// Rescale, subsample and alpha-filter an RGBA image into the pixel set
/// handed to clustering.
pub fn sample_pixels(
    img: &RgbaImage,
    config: &ExtractorConfig,
) -> Result<Vec<Srgb<u8>>, ExtractError> {
    let (w, h) = fit_within(img.width(), img.height(), config.max_dimension);
    let resized;
    let working = if (w, h) == img.dimensions() {
        img
    } else {
        resized = image::imageops::resize(img, w, h, FilterType::Triangle);
        &resized
    };

    let pixels: Vec<Srgb<u8>> = working
        .as_raw()
        .chunks_exact(4)
        .step_by(config.pixel_stride.max(1))
        .filter(|px| px[3] > config.alpha_threshold)
        .map(|px| Srgb::new(px[0], px[1], px[2]))
        .collect();

    debug!(
        width = w,
        height = h,
        sampled = pixels.len(),
        "sampled opaque pixels"
    );

    if pixels.is_empty() {
        return Err(ExtractError::EmptySample);
    }
    Ok(pixels)
}
