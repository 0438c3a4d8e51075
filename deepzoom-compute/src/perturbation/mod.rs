//! Perturbation theory computation for deep Mandelbrot zoom.
//!
//! Computes reference orbits at high precision, validates a series
//! approximation against probe points, then uses fast f64 delta iterations
//! for individual pixels.

mod pixel;
mod reference_orbit;
mod series;

pub use pixel::iterate_pixel;
pub use reference_orbit::ReferenceOrbit;
pub use series::{ProbePoint, ProbeSet, SeriesApproximation, SeriesApproximator, SeriesCoefficients};

#[cfg(test)]
mod tests;
