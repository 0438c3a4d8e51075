//! Per-pixel perturbation iteration.

use super::{ReferenceOrbit, SeriesCoefficients};
use deepzoom_core::{F64Complex, PixelResult};

/// Iterate one pixel as a delta from the reference orbit.
///
/// Starts at `min(skip_count, N-1)` with the series estimate of `δ`, then
/// applies `δ ← δ·(2X_n + δ) + δ₀` until `|X_n + δ|²` leaves the bailout or
/// the orbit runs out. A pixel that outlives an escaped reference is
/// reported as a glitch; otherwise it is interior.
pub fn iterate_pixel(
    orbit: &ReferenceOrbit,
    series: &SeriesCoefficients,
    skip_count: u32,
    delta0: F64Complex,
    bailout_sq: f64,
) -> PixelResult {
    let len = orbit.len();
    if len == 0 {
        return PixelResult::interior(orbit.max_iterations);
    }

    let mut n = (skip_count as usize).min(len - 1);
    let mut delta = if n == 0 || n >= series.len() {
        n = 0;
        delta0
    } else {
        series.evaluate(n, delta0)
    };

    let mut magnitude_sq;
    loop {
        let z = orbit.orbit[n].add(&delta);
        magnitude_sq = z.norm_sq();
        if !(magnitude_sq <= bailout_sq) {
            return PixelResult::escaped(n as u32, magnitude_sq);
        }
        if n + 1 >= len {
            break;
        }

        delta = delta.mul(&orbit.two_orbit[n].add(&delta)).add(&delta0);
        n += 1;
    }

    if orbit.reference_escaped() {
        PixelResult::glitch(n as u32, magnitude_sq)
    } else {
        PixelResult::interior(orbit.max_iterations)
    }
}
