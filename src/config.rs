//! Tunables for the extraction pipeline, optionally loaded from a JSON file.

use std::{env, fs, io::ErrorKind, path::Path, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Environment variable pointing at a JSON config file.
pub const CONFIG_PATH_ENV: &str = "PALETTE_EXTRACTOR_CONFIG";

pub const DEFAULT_MAX_DIMENSION: u32 = 400;
pub const DEFAULT_PIXEL_STRIDE: usize = 4;
pub const DEFAULT_ALPHA_THRESHOLD: u8 = 128;
pub const DEFAULT_CLUSTERS: usize = 12;
pub const DEFAULT_ITERATIONS: usize = 20;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Longest side, in pixels, the image is scaled to before sampling.
    pub max_dimension: u32,
    /// Keep one pixel out of every `pixel_stride`.
    pub pixel_stride: usize,
    /// Pixels need an alpha strictly above this to be sampled.
    pub alpha_threshold: u8,
    /// Number of dominant colors produced by k-means.
    pub clusters: usize,
    /// Fixed number of Lloyd iterations.
    pub iterations: usize,
    /// Upper bound on downloading a remote image.
    pub fetch_timeout_secs: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            pixel_stride: DEFAULT_PIXEL_STRIDE,
            alpha_threshold: DEFAULT_ALPHA_THRESHOLD,
            clusters: DEFAULT_CLUSTERS,
            iterations: DEFAULT_ITERATIONS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
        }
    }
}

impl ExtractorConfig {
    /// Load a config file, falling back to the built-in defaults when the file
    /// is missing or cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<Self>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded extractor config");
                    config.sanitized()
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse extractor config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "config file not found; using built-in defaults");
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read extractor config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Load from [`CONFIG_PATH_ENV`] when it is set, otherwise use defaults.
    pub fn from_env() -> Self {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::load(path),
            _ => Self::default(),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Replace values that would make the pipeline meaningless with their defaults.
    fn sanitized(mut self) -> Self {
        if self.max_dimension == 0 {
            warn!("max_dimension must be positive; using default");
            self.max_dimension = DEFAULT_MAX_DIMENSION;
        }
        if self.pixel_stride == 0 {
            warn!("pixel_stride must be positive; using default");
            self.pixel_stride = DEFAULT_PIXEL_STRIDE;
        }
        if self.clusters == 0 {
            warn!("clusters must be positive; using default");
            self.clusters = DEFAULT_CLUSTERS;
        }
        self
    }
}
