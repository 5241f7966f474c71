use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AccentError>;

#[derive(Debug, Error)]
pub enum AccentError {
    /// Empty buffer, zero dimension, or a buffer that does not match its dimensions.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Sampling produced no counts at all.
    #[error("histogram has no populated bins")]
    DegenerateHistogram,

    #[error("cannot build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("accent worker is not running")]
    WorkerGone,

    #[error("cannot start accent worker: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    #[error("cannot decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AccentError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    /// True when the caller handed in something unusable, as opposed to the
    /// environment failing underneath us.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::DegenerateHistogram)
    }
}
