//! Degree-3 series approximation of the delta orbit.
//!
//! `δ_n ≈ A_n·δ₀ + B_n·δ₀² + C_n·δ₀³`, where the coefficients depend only on
//! the reference orbit. Probe points measure how long the polynomial stays
//! accurate; pixels start iterating at the resulting skip count.

use super::ReferenceOrbit;
use crate::cancellation::{CancellationChecker, Cancelled};
use deepzoom_core::{F64Complex, SeriesSettings};

/// Offset from the reference used only to measure series error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbePoint {
    pub delta0: F64Complex,
    pub delta0_sq: F64Complex,
    pub delta0_cube: F64Complex,
}

impl ProbePoint {
    pub fn new(delta0: F64Complex) -> Self {
        let delta0_sq = delta0.square();
        Self {
            delta0,
            delta0_sq,
            delta0_cube: delta0_sq.mul(&delta0),
        }
    }
}

/// Seeded sample of probe points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProbeSet {
    pub probes: Vec<ProbePoint>,
}

impl ProbeSet {
    /// Draw `count` offsets uniformly from `±2/magnification` per axis.
    /// The same seed always gives the same probes.
    pub fn sample(count: usize, magnification: f64, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let half_extent = 2.0 / magnification;
        let probes = (0..count)
            .map(|_| {
                let re = (rng.f64() * 2.0 - 1.0) * half_extent;
                let im = (rng.f64() * 2.0 - 1.0) * half_extent;
                ProbePoint::new(F64Complex::new(re, im))
            })
            .collect();
        Self { probes }
    }

    pub fn from_offsets(offsets: impl IntoIterator<Item = F64Complex>) -> Self {
        Self {
            probes: offsets.into_iter().map(ProbePoint::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

/// Series coefficients A, B, C, one entry per orbit value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesCoefficients {
    pub a: Vec<F64Complex>,
    pub b: Vec<F64Complex>,
    pub c: Vec<F64Complex>,
}

impl SeriesCoefficients {
    /// Propagate the coefficients along the whole orbit:
    ///
    /// ```text
    /// A_0 = 1, B_0 = C_0 = 0
    /// A_n = 2X_{n-1}·A_{n-1} + 1
    /// B_n = 2X_{n-1}·B_{n-1} + A_{n-1}²
    /// C_n = 2X_{n-1}·C_{n-1} + 2·A_{n-1}·B_{n-1}
    /// ```
    pub fn compute(orbit: &ReferenceOrbit) -> Self {
        let len = orbit.len();
        let mut a = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);
        let mut c = Vec::with_capacity(len);
        if len == 0 {
            return Self { a, b, c };
        }

        a.push(F64Complex::ONE);
        b.push(F64Complex::ZERO);
        c.push(F64Complex::ZERO);

        for n in 1..len {
            let two_x = orbit.two_orbit[n - 1];
            let (pa, pb, pc) = (a[n - 1], b[n - 1], c[n - 1]);
            a.push(two_x.mul(&pa).add(&F64Complex::ONE));
            b.push(two_x.mul(&pb).add(&pa.square()));
            c.push(two_x.mul(&pc).add(&pa.mul(&pb).scale(2.0)));
        }

        Self { a, b, c }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Series estimate of `δ_n` for an arbitrary `δ₀`.
    #[inline]
    pub fn evaluate(&self, n: usize, delta0: F64Complex) -> F64Complex {
        let delta0_sq = delta0.square();
        self.evaluate_powers(n, delta0, delta0_sq, delta0_sq.mul(&delta0))
    }

    #[inline]
    fn evaluate_powers(
        &self,
        n: usize,
        delta0: F64Complex,
        delta0_sq: F64Complex,
        delta0_cube: F64Complex,
    ) -> F64Complex {
        self.a[n]
            .mul(&delta0)
            .add(&self.b[n].mul(&delta0_sq))
            .add(&self.c[n].mul(&delta0_cube))
    }

    fn evaluate_probe(&self, n: usize, probe: &ProbePoint) -> F64Complex {
        self.evaluate_powers(n, probe.delta0, probe.delta0_sq, probe.delta0_cube)
    }
}

/// Coefficients plus the validated number of iterations pixels may skip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesApproximation {
    pub coefficients: SeriesCoefficients,
    pub skip_count: u32,
    /// First iteration whose probe error exceeded the threshold, if any.
    pub first_failure: Option<u32>,
}

/// Validates the series against probe points and picks the skip count.
#[derive(Clone, Debug)]
pub struct SeriesApproximator {
    skip_margin: u32,
    error_tolerance: f64,
}

impl SeriesApproximator {
    pub fn new(settings: &SeriesSettings) -> Self {
        Self {
            skip_margin: settings.skip_margin,
            error_tolerance: settings.error_tolerance,
        }
    }

    /// Compute coefficients and the skip count.
    ///
    /// Each probe advances with the exact delta recurrence
    /// `δ_n = δ_{n-1}·(2X_{n-1} + δ_{n-1}) + δ₀`. The first `n` where the
    /// mean squared error against the series exceeds
    /// `error_tolerance / magnification` (or is not finite) yields
    /// `n - skip_margin`, saturating at 0. If no step fails the whole orbit
    /// is skippable (`N - 1`). Without probes nothing is skipped.
    pub fn approximate<C: CancellationChecker>(
        &self,
        orbit: &ReferenceOrbit,
        probes: &ProbeSet,
        magnification: f64,
        cancel: &C,
    ) -> Result<SeriesApproximation, Cancelled> {
        let coefficients = SeriesCoefficients::compute(orbit);
        let len = orbit.len();

        if len == 0 || probes.is_empty() {
            return Ok(SeriesApproximation {
                coefficients,
                skip_count: 0,
                first_failure: None,
            });
        }

        let threshold = self.error_tolerance / magnification;
        let mut deltas: Vec<F64Complex> = probes.probes.iter().map(|p| p.delta0).collect();
        let mut first_failure = None;

        for n in 1..len {
            cancel.check()?;

            let two_x = orbit.two_orbit[n - 1];
            let mut total_error = 0.0;
            for (delta, probe) in deltas.iter_mut().zip(&probes.probes) {
                *delta = delta.mul(&two_x.add(delta)).add(&probe.delta0);
                total_error += coefficients.evaluate_probe(n, probe).sub(delta).norm_sq();
            }

            let mean_error = total_error / probes.len() as f64;
            if !(mean_error <= threshold) {
                first_failure = Some(n as u32);
                break;
            }
        }

        let skip_count = match first_failure {
            Some(n) => n.saturating_sub(self.skip_margin),
            None => (len - 1) as u32,
        };

        Ok(SeriesApproximation {
            coefficients,
            skip_count,
            first_failure,
        })
    }
}
