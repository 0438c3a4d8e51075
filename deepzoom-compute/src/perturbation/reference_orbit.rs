//! Reference orbit computation for perturbation rendering.
//!
//! Iterates the reference point at high precision and stores the orbit as
//! f64 for fast delta iterations.

use crate::cancellation::CancellationChecker;
use crate::error::RenderError;
use deepzoom_core::{F64Complex, HighPrecision, HpComplex};

/// Upper bound on the up-front allocation; longer orbits grow as they go.
const MAX_RESERVED_ITERATIONS: usize = 1 << 16;

/// A pre-computed reference orbit for perturbation rendering.
///
/// `orbit[0]` is the reference point `c` itself (the first iterate), so
/// `orbit[n]` is the value tested for escape at iteration `n`.
#[derive(Clone, Debug)]
pub struct ReferenceOrbit {
    /// Reference point C as f64
    pub c_ref: F64Complex,
    /// Orbit values X_n as f64
    pub orbit: Vec<F64Complex>,
    /// 2·X_n, used by every delta step
    pub two_orbit: Vec<F64Complex>,
    /// Iteration at which the reference escaped (None if never escaped).
    /// When set, the escaping value is the last entry of `orbit`.
    pub escaped_at: Option<u32>,
    /// Iteration cap the orbit was computed for
    pub max_iterations: u32,
}

impl ReferenceOrbit {
    /// Compute a reference orbit at the precision carried by `c_ref`.
    ///
    /// `z` starts at `c` and is iterated at full precision, truncated to the
    /// budget after every step. Stops after `max_iterations` values or once
    /// `|z|² > bailout_sq`. Cancellation is polled once per iteration; a
    /// cancelled computation returns nothing.
    pub fn compute<T, C>(
        c_ref: &HpComplex<T>,
        max_iterations: u32,
        bailout_sq: f64,
        cancel: &C,
    ) -> Result<Self, RenderError>
    where
        T: HighPrecision,
        C: CancellationChecker,
    {
        let precision = c_ref.re.precision().combine(&c_ref.im.precision());
        let bailout = T::from_f64(bailout_sq, precision)?;

        let reserve = (max_iterations as usize).min(MAX_RESERVED_ITERATIONS);
        let mut orbit = Vec::with_capacity(reserve);
        let mut two_orbit = Vec::with_capacity(reserve);
        let mut escaped_at = None;

        let mut z = c_ref.clone();
        for n in 0..max_iterations {
            cancel.check()?;

            let x = z.to_f64_complex();
            orbit.push(x);
            two_orbit.push(x.scale(2.0));

            if z.norm_sq() > bailout {
                escaped_at = Some(n);
                break;
            }

            z = z.square_add(c_ref);
        }

        log::debug!(
            "Reference orbit: {} of {} iterations, escaped_at={:?}",
            orbit.len(),
            max_iterations,
            escaped_at
        );

        Ok(Self {
            c_ref: c_ref.to_f64_complex(),
            orbit,
            two_orbit,
            escaped_at,
            max_iterations,
        })
    }

    /// Number of stored orbit values (N).
    pub fn len(&self) -> usize {
        self.orbit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orbit.is_empty()
    }

    pub fn reference_escaped(&self) -> bool {
        self.escaped_at.is_some()
    }
}
