//! Render configuration.
//!
//! One flat, serialisable settings record describes a frame. The centre is
//! stored as decimal text so deep coordinates survive a save/load cycle
//! without losing digits.

use crate::bignum::DecimalNumber;
use crate::error::ConfigError;
use crate::precision::{bits_to_decimal_digits, calculate_precision_bits, Precision, Truncation};
use crate::viewport::ViewGeometry;
use serde::{Deserialize, Serialize};

/// Arithmetic backend for the reference orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberBackend {
    /// Base-2 mantissa; precision counted in bits.
    #[default]
    Binary,
    /// Base-10 mantissa; precision counted in decimal digits.
    Decimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Every pixel evaluated once, whole frame at a time.
    #[default]
    Batch,
    /// One cell per tick, coarse blocks refined down to single pixels.
    Progressive,
}

/// What to do with pixels whose orbit outlives the reference orbit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlitchPolicy {
    /// Keep the perturbation result, marked `glitched`.
    #[default]
    Flag,
    /// Re-iterate the pixel at full precision.
    Recompute,
}

/// Series approximation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesSettings {
    /// Probe points sampled to validate the series. Zero disables skipping.
    pub probe_count: usize,
    /// Iterations subtracted from the first failing index.
    pub skip_margin: u32,
    /// Mean squared error allowed is `error_tolerance / magnification`.
    ///
    /// Larger values skip more iterations. The error is only measured at
    /// the sampled points, so near the set boundary a generous tolerance can
    /// shift escape counts of pixels between them. Lower it, or disable
    /// skipping, when counts must match direct iteration.
    pub error_tolerance: f64,
    /// Probe sampling seed; identical seeds give identical probes.
    pub seed: u64,
}

impl Default for SeriesSettings {
    fn default() -> Self {
        Self {
            probe_count: 20,
            skip_margin: 3,
            error_tolerance: 1.0,
            seed: 0x5EED_0F_5E12_1E5,
        }
    }
}

/// Immutable snapshot describing one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Real part of the view centre, decimal text.
    pub center_re: String,
    /// Imaginary part of the view centre, decimal text.
    pub center_im: String,
    /// Linear zoom factor; the frame spans `4 / magnification` horizontally.
    pub magnification: f64,
    pub max_iterations: u32,
    /// Squared escape radius.
    pub bailout_sq: f64,
    pub width: u32,
    pub height: u32,
    pub thread_count: usize,
    pub backend: NumberBackend,
    /// Significant digits override; computed from the view when absent.
    pub precision: Option<usize>,
    pub truncation: Truncation,
    pub series: SeriesSettings,
    pub tiles_x: u32,
    pub tiles_y: u32,
    /// Coarsest progressive block size, a power of two.
    pub max_chunk_size: u32,
    pub mode: RenderMode,
    pub glitch_policy: GlitchPolicy,
    /// Pixel used as the perturbation reference; the centre pixel when absent.
    pub reference_pixel: Option<(u32, u32)>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            center_re: "-0.5".to_string(),
            center_im: "0".to_string(),
            magnification: 1.0,
            max_iterations: 500,
            bailout_sq: 4.0,
            width: 256,
            height: 256,
            thread_count: num_cpus::get(),
            backend: NumberBackend::Binary,
            precision: None,
            truncation: Truncation::DivisionOnly,
            series: SeriesSettings::default(),
            tiles_x: 8,
            tiles_y: 8,
            max_chunk_size: 16,
            mode: RenderMode::Batch,
            glitch_policy: GlitchPolicy::Flag,
            reference_pixel: None,
        }
    }
}

impl RenderSettings {
    /// Reject settings no frame can be rendered with. Returns the first
    /// problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.thread_count == 0 {
            return Err(ConfigError::ZeroThreads);
        }
        if self.precision == Some(0) {
            return Err(ConfigError::ZeroPrecision);
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !self.magnification.is_finite() || self.magnification <= 0.0 {
            return Err(ConfigError::InvalidMagnification(self.magnification));
        }
        if !self.bailout_sq.is_finite() || self.bailout_sq <= 0.0 {
            return Err(ConfigError::InvalidBailout(self.bailout_sq));
        }
        let tolerance = self.series.error_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::InvalidErrorTolerance(tolerance));
        }
        if !self.max_chunk_size.is_power_of_two() {
            return Err(ConfigError::InvalidChunkSize(self.max_chunk_size));
        }
        if self.tiles_x == 0 || self.tiles_y == 0 {
            return Err(ConfigError::ZeroTiles {
                tiles_x: self.tiles_x,
                tiles_y: self.tiles_y,
            });
        }
        if self.tiles_x > self.width || self.tiles_y > self.height {
            return Err(ConfigError::TooManyTiles {
                tiles_x: self.tiles_x,
                tiles_y: self.tiles_y,
                width: self.width,
                height: self.height,
            });
        }
        if let Some((x, y)) = self.reference_pixel {
            if x >= self.width || y >= self.height {
                return Err(ConfigError::ReferenceOutsideFrame {
                    x,
                    y,
                    width: self.width,
                    height: self.height,
                });
            }
        }

        // Syntax check only; decimal parsing is exact at any budget
        let probe = Precision::new(1);
        for (axis, text) in [("real", &self.center_re), ("imaginary", &self.center_im)] {
            DecimalNumber::from_string(text, probe)
                .map_err(|source| ConfigError::InvalidCoordinate { axis, source })?;
        }

        Ok(())
    }

    /// Centre as doubles, for precision estimates only.
    pub fn center_f64(&self) -> (f64, f64) {
        (
            self.center_re.trim().parse().unwrap_or(0.0),
            self.center_im.trim().parse().unwrap_or(0.0),
        )
    }

    /// Significant digits for the configured backend: the override, or the
    /// budget needed at this magnification and resolution.
    pub fn precision_digits(&self) -> usize {
        if let Some(digits) = self.precision {
            return digits;
        }
        let bits = calculate_precision_bits(
            self.center_f64(),
            self.magnification,
            (self.width, self.height),
            self.max_iterations,
        );
        match self.backend {
            NumberBackend::Binary => bits,
            NumberBackend::Decimal => bits_to_decimal_digits(bits),
        }
    }

    pub fn precision_budget(&self) -> Precision {
        Precision {
            digits: self.precision_digits(),
            truncation: self.truncation,
        }
    }

    pub fn geometry(&self) -> ViewGeometry {
        ViewGeometry::new(self.width, self.height, self.magnification, self.reference_pixel)
    }
}
