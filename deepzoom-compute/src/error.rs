use crate::cancellation::Cancelled;
use deepzoom_core::{ConfigError, NumberError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Arithmetic failure: {0}")]
    Number(#[from] NumberError),

    #[error("Render cancelled")]
    Cancelled,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl From<Cancelled> for RenderError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl RenderError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
