//! Precision budgets for arbitrary-precision arithmetic.
//!
//! Determines how many significant digits `BigNumber` values carry at a
//! given magnification and resolution, and how that budget is enforced.

use serde::{Deserialize, Serialize};

/// Safety margin for rounding errors in arithmetic operations.
const SAFETY_BITS: u64 = 64;

/// log10(2), for converting a bit budget into decimal digits.
const LOG10_2: f64 = std::f64::consts::LOG10_2;

/// When the precision budget is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    /// Only division truncates; addition and multiplication stay exact.
    #[default]
    DivisionOnly,
    /// Every operation truncates its result to the budget.
    Always,
}

/// Maximum significant digits (bits for binary, decimal digits for decimal).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Precision {
    pub digits: usize,
    pub truncation: Truncation,
}

impl Precision {
    /// Budget that only bounds division.
    pub const fn new(digits: usize) -> Self {
        Self {
            digits,
            truncation: Truncation::DivisionOnly,
        }
    }

    /// Budget applied after every operation.
    pub const fn always(digits: usize) -> Self {
        Self {
            digits,
            truncation: Truncation::Always,
        }
    }

    /// Precision of a result combining two operands: the wider budget, and
    /// `Always` if either side asks for it.
    pub fn combine(&self, other: &Self) -> Self {
        let truncation = if self.truncation == Truncation::Always
            || other.truncation == Truncation::Always
        {
            Truncation::Always
        } else {
            Truncation::DivisionOnly
        };
        Self {
            digits: self.digits.max(other.digits),
            truncation,
        }
    }
}

/// Calculate required precision bits for a perturbation reference.
///
/// The reference coordinate must:
/// 1. Represent the center at the view's magnification
/// 2. Distinguish adjacent pixels
/// 3. Survive error amplification over many iterations
///
/// # Returns
/// Required precision bits, rounded up to a power of 2, minimum 64.
pub fn calculate_precision_bits(
    center: (f64, f64),
    magnification: f64,
    canvas_size: (u32, u32),
    max_iterations: u32,
) -> usize {
    // Pixel pitch: the view spans 4/magnification across the frame width
    let pixel_size = 4.0 / (magnification * canvas_size.0.max(1) as f64);
    let log2_min_delta = pixel_size.log2();

    // M = max(|cx|, |cy|, half extent), plus one bit for the sum
    let log2_half_extent = (2.0 / magnification).log2();
    let log2_cx = log2_or_floor(center.0.abs());
    let log2_cy = log2_or_floor(center.1.abs());
    let log2_m = log2_cx.max(log2_cy).max(log2_half_extent) + 1.0;

    let log2_ratio = log2_m - log2_min_delta;
    let bits_from_ratio = if log2_ratio.is_finite() {
        log2_ratio.ceil().max(0.0) as u64
    } else {
        0
    };

    let iter_bits = if max_iterations > 1 {
        (max_iterations as f64).log2().ceil() as u64
    } else {
        0
    };

    let total_bits = bits_from_ratio + iter_bits + SAFETY_BITS;

    (total_bits as usize).next_power_of_two().max(64)
}

/// Decimal digits carrying at least `bits` of binary precision.
pub fn bits_to_decimal_digits(bits: usize) -> usize {
    (bits as f64 * LOG10_2).ceil() as usize + 1
}

fn log2_or_floor(value: f64) -> f64 {
    if value > 0.0 {
        value.log2()
    } else {
        f64::NEG_INFINITY
    }
}
