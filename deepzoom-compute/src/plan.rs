//! Per-frame plans and their cache.
//!
//! A [`FramePlan`] bundles everything pixels of one frame share: the
//! reference orbit, series coefficients, skip count and view geometry. It is
//! a pure function of the settings snapshot, published behind an `Arc`, and
//! never mutated once built. A new snapshot builds a new plan.

use crate::cancellation::CancellationChecker;
use crate::direct::iterate_point;
use crate::error::RenderError;
use crate::perturbation::{ProbeSet, ReferenceOrbit, SeriesApproximator, SeriesCoefficients};
use deepzoom_core::{
    BinaryNumber, DecimalNumber, F64Complex, HighPrecision, HpComplex, NumberBackend, NumberError,
    PixelResult, Precision, RenderSettings, SeriesSettings, Truncation, ViewGeometry,
};
use std::sync::Arc;
use std::time::Instant;

/// The settings that determine a plan. Two snapshots with equal keys share
/// one plan.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlanKey {
    center_re: String,
    center_im: String,
    magnification_bits: u64,
    max_iterations: u32,
    bailout_bits: u64,
    width: u32,
    height: u32,
    backend: NumberBackend,
    precision_digits: usize,
    truncation: Truncation,
    probe_count: usize,
    skip_margin: u32,
    error_tolerance_bits: u64,
    seed: u64,
    reference_pixel: Option<(u32, u32)>,
}

impl PlanKey {
    pub fn from_settings(settings: &RenderSettings) -> Self {
        let SeriesSettings {
            probe_count,
            skip_margin,
            error_tolerance,
            seed,
        } = settings.series;

        Self {
            center_re: settings.center_re.trim().to_string(),
            center_im: settings.center_im.trim().to_string(),
            magnification_bits: settings.magnification.to_bits(),
            max_iterations: settings.max_iterations,
            bailout_bits: settings.bailout_sq.to_bits(),
            width: settings.width,
            height: settings.height,
            backend: settings.backend,
            precision_digits: settings.precision_digits(),
            truncation: settings.truncation,
            probe_count,
            skip_margin,
            error_tolerance_bits: error_tolerance.to_bits(),
            seed,
            reference_pixel: settings.reference_pixel,
        }
    }
}

/// Reference coordinate at full precision, in the configured backend.
#[derive(Clone, Debug)]
pub enum ReferenceCoordinate {
    Binary(HpComplex<BinaryNumber>),
    Decimal(HpComplex<DecimalNumber>),
}

impl ReferenceCoordinate {
    pub fn to_f64_complex(&self) -> F64Complex {
        match self {
            Self::Binary(c) => c.to_f64_complex(),
            Self::Decimal(c) => c.to_f64_complex(),
        }
    }
}

/// Immutable per-frame bundle shared by every pixel evaluation.
#[derive(Debug)]
pub struct FramePlan {
    pub key: PlanKey,
    pub reference: ReferenceCoordinate,
    pub orbit: ReferenceOrbit,
    pub series: SeriesCoefficients,
    pub skip_count: u32,
    pub geometry: ViewGeometry,
    pub precision: Precision,
    pub max_iterations: u32,
    pub bailout_sq: f64,
}

/// Backend-independent part of a plan.
struct PlanParts {
    orbit: ReferenceOrbit,
    series: SeriesCoefficients,
    skip_count: u32,
}

impl FramePlan {
    /// Build the plan for a settings snapshot: parse the centre in the
    /// configured backend, place the reference, compute its orbit and
    /// validate the series.
    pub fn build<C: CancellationChecker>(
        settings: &RenderSettings,
        cancel: &C,
    ) -> Result<Self, RenderError> {
        settings.validate()?;

        let start = Instant::now();
        let precision = settings.precision_budget();
        let geometry = settings.geometry();

        let (parts, reference) = match settings.backend {
            NumberBackend::Binary => {
                let (parts, reference) =
                    build_parts::<BinaryNumber, C>(settings, precision, &geometry, cancel)?;
                (parts, ReferenceCoordinate::Binary(reference))
            }
            NumberBackend::Decimal => {
                let (parts, reference) =
                    build_parts::<DecimalNumber, C>(settings, precision, &geometry, cancel)?;
                (parts, ReferenceCoordinate::Decimal(reference))
            }
        };

        if let Some(n) = parts.orbit.escaped_at {
            log::warn!(
                "Reference orbit escaped at iteration {} of {}; pixels outliving it will be glitches",
                n,
                settings.max_iterations
            );
        }
        log::info!(
            "Built frame plan: {:?} backend, {} digits, orbit {}/{}, skip {} ({:.1}ms)",
            settings.backend,
            precision.digits,
            parts.orbit.len(),
            settings.max_iterations,
            parts.skip_count,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            key: PlanKey::from_settings(settings),
            reference,
            orbit: parts.orbit,
            series: parts.series,
            skip_count: parts.skip_count,
            geometry,
            precision,
            max_iterations: settings.max_iterations,
            bailout_sq: settings.bailout_sq,
        })
    }

    /// Re-iterate pixel (px, py) at full precision, bypassing perturbation.
    pub fn direct_pixel(&self, px: u32, py: u32) -> Result<PixelResult, NumberError> {
        let offset = self.geometry.delta_for_pixel(px, py);
        match &self.reference {
            ReferenceCoordinate::Binary(c) => {
                iterate_point(&c.offset_by(offset)?, self.max_iterations, self.bailout_sq)
            }
            ReferenceCoordinate::Decimal(c) => {
                iterate_point(&c.offset_by(offset)?, self.max_iterations, self.bailout_sq)
            }
        }
    }
}

fn build_parts<T, C>(
    settings: &RenderSettings,
    precision: Precision,
    geometry: &ViewGeometry,
    cancel: &C,
) -> Result<(PlanParts, HpComplex<T>), RenderError>
where
    T: HighPrecision,
    C: CancellationChecker,
{
    let centre = HpComplex::<T>::from_strings(&settings.center_re, &settings.center_im, precision)?;
    let reference = centre.offset_by(geometry.reference_offset())?;

    let orbit = ReferenceOrbit::compute(
        &reference,
        settings.max_iterations,
        settings.bailout_sq,
        cancel,
    )?;

    let probes = ProbeSet::sample(
        settings.series.probe_count,
        settings.magnification,
        settings.series.seed,
    );
    let approximation = SeriesApproximator::new(&settings.series).approximate(
        &orbit,
        &probes,
        settings.magnification,
        cancel,
    )?;
    log::debug!(
        "Series: {} probes, first failure {:?}, skip {}",
        probes.len(),
        approximation.first_failure,
        approximation.skip_count
    );

    Ok((
        PlanParts {
            orbit,
            series: approximation.coefficients,
            skip_count: approximation.skip_count,
        },
        reference,
    ))
}

/// Memo of the most recent plan.
#[derive(Debug, Default)]
pub struct PlanCache {
    current: Option<Arc<FramePlan>>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached plan when `settings` match its key, otherwise a freshly
    /// built one. A failed or cancelled build leaves the cache untouched.
    pub fn get_or_build<C: CancellationChecker>(
        &mut self,
        settings: &RenderSettings,
        cancel: &C,
    ) -> Result<Arc<FramePlan>, RenderError> {
        let key = PlanKey::from_settings(settings);
        if let Some(plan) = &self.current {
            if plan.key == key {
                log::debug!("Frame plan cache hit");
                return Ok(Arc::clone(plan));
            }
        }

        let plan = Arc::new(FramePlan::build(settings, cancel)?);
        self.current = Some(Arc::clone(&plan));
        Ok(plan)
    }

    pub fn current(&self) -> Option<&Arc<FramePlan>> {
        self.current.as_ref()
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
