//! Error types for ring generation.

use std::path::PathBuf;

use ringworld_config::ConfigError;

/// Errors surfaced by a generation request.
#[derive(Debug, thiserror::Error)]
pub enum RingError {
    /// The configuration cannot describe a ring. Nothing was mutated.
    #[error("invalid ring configuration: {0}")]
    InvalidConfiguration(#[source] ConfigError),
}

impl From<ConfigError> for RingError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidConfiguration(err)
    }
}

/// Errors from exporting or purging texture artifacts.
///
/// These never abort a generation; the controller logs them and continues.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// Filesystem access failed.
    #[error("texture i/o failed for {path}: {source}")]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding failed.
    #[error("failed to encode {path}: {source}")]
    Encode {
        /// File being written.
        path: PathBuf,
        /// Underlying encoder error.
        #[source]
        source: png::EncodingError,
    },
}
