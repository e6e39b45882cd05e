use std::path::PathBuf;

use thiserror::Error;

use crate::gpu::GpuError;

/// Errors from asset creation, loading and lookup.
#[derive(Error, Debug)]
pub enum AssetError {
    /// The id is stale (destroyed) or was never issued by this manager.
    #[error("{kind} not found (stale or unknown id)")]
    NotFound { kind: &'static str },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("asset data is {actual} bytes, expected {expected}")]
    DataSize { expected: usize, actual: usize },

    #[error(transparent)]
    Gpu(#[from] GpuError),
}

impl AssetError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound { .. })
    }
}
