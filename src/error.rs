use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning an [`ImageSource`](crate::ImageSource) into pixels.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The image file could not be read from disk.
    #[error("unable to read image file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The bytes were read but are not a decodable image.
    #[error("unable to decode image: {0}")]
    Image(#[from] image::ImageError),
    /// The remote image could not be downloaded.
    #[cfg(feature = "remote")]
    #[error("unable to fetch image from {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// A URL was given but the crate was built without the `remote` feature.
    #[error("remote image sources are not supported in this build: {0}")]
    RemoteDisabled(String),
    /// The decoded image has no pixels.
    #[error("image has zero width or height")]
    EmptyImage,
}

/// Errors raised by [`kmeans`](crate::kmeans::kmeans).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("cannot cluster an empty pixel set")]
    EmptyInput,
    #[error("cluster count must be at least 1")]
    ZeroClusters,
}

/// Errors surfaced by the extraction pipeline.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The image could not be loaded or decoded.
    #[error("failed to load image")]
    Decode(#[from] DecodeError),
    /// No opaque pixel survived sampling, e.g. a fully transparent image.
    #[error("no valid pixels found")]
    EmptySample,
    /// Clustering rejected its input.
    #[error("clustering failed: {0}")]
    Cluster(#[from] ClusterError),
    /// The palette builder was handed an empty color list.
    #[error("no dominant colors to build a palette from")]
    NoDominantColors,
}
