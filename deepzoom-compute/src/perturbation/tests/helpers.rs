use crate::cancellation::NeverCancel;
use crate::direct::iterate_point;
use crate::perturbation::{ProbeSet, ReferenceOrbit, SeriesApproximation, SeriesApproximator};
use deepzoom_core::{BinaryNumber, F64Complex, HpComplex, PixelResult, Precision, SeriesSettings};

/// Escape radius 2.
pub const BAILOUT_SQ: f64 = 4.0;

pub const TEST_PRECISION: Precision = Precision::new(256);

pub fn hp(re: &str, im: &str) -> HpComplex<BinaryNumber> {
    HpComplex::from_strings(re, im, TEST_PRECISION).unwrap()
}

pub fn orbit_at(re: &str, im: &str, max_iterations: u32) -> ReferenceOrbit {
    ReferenceOrbit::compute(&hp(re, im), max_iterations, BAILOUT_SQ, &NeverCancel).unwrap()
}

/// Ground truth for a point given as a reference plus an f64 offset.
pub fn compute_direct(
    reference: &HpComplex<BinaryNumber>,
    offset: (f64, f64),
    max_iterations: u32,
) -> PixelResult {
    let c = reference
        .offset_by(F64Complex::new(offset.0, offset.1))
        .unwrap();
    iterate_point(&c, max_iterations, BAILOUT_SQ).unwrap()
}

pub fn approximate(
    orbit: &ReferenceOrbit,
    probes: &ProbeSet,
    magnification: f64,
    settings: &SeriesSettings,
) -> SeriesApproximation {
    SeriesApproximator::new(settings)
        .approximate(orbit, probes, magnification, &NeverCancel)
        .unwrap()
}
