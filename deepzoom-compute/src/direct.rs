//! Full-precision iteration of a single point.
//!
//! Used to re-render glitched pixels and as ground truth for perturbation.

use deepzoom_core::{HighPrecision, HpComplex, NumberError, PixelResult};

/// Iterate `z ← z² + c` from `z = c` at the precision carried by `c`.
///
/// Indexing matches [`ReferenceOrbit`](crate::ReferenceOrbit): the value
/// tested at iteration `n` is the orbit's `n`-th entry.
pub fn iterate_point<T: HighPrecision>(
    c: &HpComplex<T>,
    max_iterations: u32,
    bailout_sq: f64,
) -> Result<PixelResult, NumberError> {
    let precision = c.re.precision().combine(&c.im.precision());
    let bailout = T::from_f64(bailout_sq, precision)?;

    let mut z = c.clone();
    for n in 0..max_iterations {
        let magnitude_sq = z.norm_sq();
        if magnitude_sq > bailout {
            return Ok(PixelResult::escaped(n, magnitude_sq.to_f64()));
        }
        z = z.square_add(c);
    }

    Ok(PixelResult::interior(max_iterations))
}
