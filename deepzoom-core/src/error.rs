//! Error types shared by the core and compute crates.

use thiserror::Error;

/// Failures of arbitrary-precision arithmetic and conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Cannot represent non-finite value {0}")]
    NonFinite(String),

    #[error("Failed to parse number '{input}': {reason}")]
    Parse { input: String, reason: String },
}

impl NumberError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Configuration rejected before any arbitrary-precision work starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Frame dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error("Thread count must be greater than zero")]
    ZeroThreads,

    #[error("Precision must be greater than zero")]
    ZeroPrecision,

    #[error("Maximum iterations must be greater than zero")]
    ZeroIterations,

    #[error("Magnification must be finite and positive, got {0}")]
    InvalidMagnification(f64),

    #[error("Bailout must be finite and positive, got {0}")]
    InvalidBailout(f64),

    #[error("Series error tolerance must be finite and non-negative, got {0}")]
    InvalidErrorTolerance(f64),

    #[error("Chunk size must be a power of two, got {0}")]
    InvalidChunkSize(u32),

    #[error("Cell grid must be at least 1x1, got {tiles_x}x{tiles_y}")]
    ZeroTiles { tiles_x: u32, tiles_y: u32 },

    #[error("Cell grid {tiles_x}x{tiles_y} exceeds frame {width}x{height}")]
    TooManyTiles {
        tiles_x: u32,
        tiles_y: u32,
        width: u32,
        height: u32,
    },

    #[error("Invalid {axis} coordinate: {source}")]
    InvalidCoordinate {
        axis: &'static str,
        #[source]
        source: NumberError,
    },

    #[error("Reference pixel ({x}, {y}) lies outside the {width}x{height} frame")]
    ReferenceOutsideFrame {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed settings: {0}")]
    Json(#[from] serde_json::Error),
}
