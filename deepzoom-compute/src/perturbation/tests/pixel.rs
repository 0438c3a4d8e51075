use super::helpers::{approximate, compute_direct, hp, orbit_at, BAILOUT_SQ};
use crate::{iterate_pixel, ProbeSet, SeriesCoefficients};
use deepzoom_core::{F64Complex, PixelResult, SeriesSettings};

#[test]
fn reference_pixel_in_set_is_interior() {
    let orbit = orbit_at("-0.5", "0", 300);
    let series = SeriesCoefficients::compute(&orbit);

    let result = iterate_pixel(&orbit, &series, 0, F64Complex::ZERO, BAILOUT_SQ);
    assert_eq!(result, PixelResult::interior(300));
}

#[test]
fn distant_pixel_escapes_through_deltas() {
    // -0.5 + 2.5 = 2, which escapes at iteration 1 with |z|² = 36
    let orbit = orbit_at("-0.5", "0", 300);
    let series = SeriesCoefficients::compute(&orbit);

    let result = iterate_pixel(&orbit, &series, 0, F64Complex::new(2.5, 0.0), BAILOUT_SQ);
    assert_eq!(result, PixelResult::escaped(1, 36.0));
}

#[test]
fn skip_count_is_clamped_to_orbit() {
    let orbit = orbit_at("2", "0", 100);
    let series = SeriesCoefficients::compute(&orbit);

    let result = iterate_pixel(&orbit, &series, 1000, F64Complex::ZERO, BAILOUT_SQ);
    assert_eq!(result, PixelResult::escaped(1, 36.0));
}

#[test]
fn empty_orbit_reports_interior() {
    let orbit = orbit_at("-0.5", "0", 0);
    let series = SeriesCoefficients::compute(&orbit);

    let result = iterate_pixel(&orbit, &series, 0, F64Complex::new(1e-3, 0.0), BAILOUT_SQ);
    assert_eq!(result, PixelResult::interior(0));
}

#[test]
fn series_start_matches_plain_start() {
    let orbit = orbit_at("-0.75", "0.1", 500);
    let approximation = approximate(
        &orbit,
        &ProbeSet::sample(20, 1e10, 3),
        1e10,
        &SeriesSettings::default(),
    );
    assert!(approximation.skip_count > 0);

    for delta0 in [
        F64Complex::new(1e-11, 0.0),
        F64Complex::new(-1.5e-10, 2e-10),
        F64Complex::new(0.0, -1e-10),
    ] {
        let skipped = iterate_pixel(
            &orbit,
            &approximation.coefficients,
            approximation.skip_count,
            delta0,
            BAILOUT_SQ,
        );
        let plain = iterate_pixel(&orbit, &approximation.coefficients, 0, delta0, BAILOUT_SQ);

        assert_eq!(skipped.iterations, plain.iterations);
        assert_eq!(skipped.escaped, plain.escaped);
        assert!(!skipped.glitched);
    }
}

#[test]
fn nearby_pixels_match_direct_iteration() {
    let reference = hp("-0.75", "0.1");
    let orbit = orbit_at("-0.75", "0.1", 500);
    let series = SeriesCoefficients::compute(&orbit);

    for offset in [(1e-7, 0.0), (-2e-7, 1e-7), (0.0, 3e-7)] {
        let delta0 = F64Complex::new(offset.0, offset.1);
        let perturbed = iterate_pixel(&orbit, &series, 0, delta0, BAILOUT_SQ);
        let direct = compute_direct(&reference, offset, 500);

        assert_eq!(perturbed.iterations, direct.iterations, "offset {:?}", offset);
        assert_eq!(perturbed.escaped, direct.escaped, "offset {:?}", offset);
    }
}

#[test]
fn glitched_pixel_disagrees_with_direct_iteration() {
    // -0.74 + 0.1i outlives the reference, which escapes at 32
    let reference = hp("-0.75", "0.1");
    let orbit = orbit_at("-0.75", "0.1", 500);
    let series = SeriesCoefficients::compute(&orbit);

    let perturbed = iterate_pixel(&orbit, &series, 0, F64Complex::new(0.01, 0.0), BAILOUT_SQ);
    let direct = compute_direct(&reference, (0.01, 0.0), 500);

    assert!(perturbed.glitched);
    assert_eq!(perturbed.iterations, 32);
    assert!(direct.iterations > 32);
}
