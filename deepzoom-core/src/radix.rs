//! Digit-level primitives for the two `BigNumber` bases.
//!
//! A radix decides what a "digit" is for precision accounting, how a
//! magnitude is scaled by powers of the base, and how values cross over to
//! binary floating point.

use dashu::integer::{IBig, UBig};
use dashu_base::BitTest;
use dashu_float::round::mode::HalfEven;
use dashu_float::FBig;
use std::fmt::Debug;

/// Base of a `BigNumber` mantissa/exponent pair.
pub trait Radix: Copy + Clone + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// The numeric base.
    const BASE: u32;

    /// Separator used by the canonical `<mantissa><MARKER><exponent>` form.
    const MARKER: char;

    /// Number of significant digits of a magnitude. Zero has no digits.
    fn digit_len(magnitude: &UBig) -> usize;

    /// `magnitude × BASE^k`.
    fn scale_up(magnitude: &UBig, k: usize) -> UBig;

    /// `magnitude / BASE^k` rounded toward zero, plus whether anything
    /// non-zero was dropped.
    fn scale_down(magnitude: &UBig, k: usize) -> (UBig, bool);

    /// Count of trailing zero digits. Zero reports 0.
    fn trailing_zero_digits(magnitude: &UBig) -> usize;

    /// Express the exact value `magnitude × 2^exponent` in this radix.
    fn from_binary_parts(magnitude: UBig, exponent: isize) -> (UBig, isize);

    /// Express `magnitude × 10^exponent` in this radix when that is exact.
    fn from_decimal_parts(magnitude: UBig, exponent: isize) -> Option<(UBig, isize)>;

    /// Express the exact value in base 10, for display.
    fn to_decimal_parts(magnitude: &UBig, exponent: isize) -> (UBig, isize);

    /// Nearest f64, ties to even.
    fn to_f64(mantissa: &IBig, exponent: isize) -> f64;
}

/// Base 2: digits are bits, scaling is shifting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Binary;

/// Base 10: digits are decimal digits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Decimal;

/// Absolute value of a signed mantissa.
pub(crate) fn magnitude(value: &IBig) -> UBig {
    value.clone().into_parts().1
}

pub(crate) fn pow10(k: usize) -> UBig {
    UBig::from(10u8).pow(k)
}

/// Decimal digits stripped per step when counting trailing zeros.
const DECIMAL_CHUNK: usize = 16;

fn pow5(k: usize) -> UBig {
    UBig::from(5u8).pow(k)
}

/// Exact decimal expansion of `magnitude × 2^exponent`.
fn binary_to_decimal(magnitude: &UBig, exponent: isize) -> (UBig, isize) {
    if exponent >= 0 {
        (magnitude << exponent as usize, 0)
    } else {
        // m / 2^k = m·5^k / 10^k
        let k = exponent.unsigned_abs();
        (magnitude * pow5(k), exponent)
    }
}

fn fbig_to_f64(significand: IBig, exponent: isize) -> f64 {
    let value = FBig::<HalfEven, 2>::from_parts(significand, exponent);
    value.to_f64().value()
}

impl Radix for Binary {
    const BASE: u32 = 2;
    const MARKER: char = 'p';

    fn digit_len(magnitude: &UBig) -> usize {
        if magnitude.is_zero() {
            0
        } else {
            magnitude.bit_len()
        }
    }

    fn scale_up(magnitude: &UBig, k: usize) -> UBig {
        magnitude << k
    }

    fn scale_down(magnitude: &UBig, k: usize) -> (UBig, bool) {
        let dropped_nonzero = magnitude.trailing_zeros().is_some_and(|tz| tz < k);
        (magnitude >> k, dropped_nonzero)
    }

    fn trailing_zero_digits(magnitude: &UBig) -> usize {
        magnitude.trailing_zeros().unwrap_or(0)
    }

    fn from_binary_parts(magnitude: UBig, exponent: isize) -> (UBig, isize) {
        (magnitude, exponent)
    }

    fn from_decimal_parts(magnitude: UBig, exponent: isize) -> Option<(UBig, isize)> {
        // Negative powers of ten have no finite binary expansion in general
        if exponent < 0 {
            return None;
        }
        Some((magnitude * pow10(exponent as usize), 0))
    }

    fn to_decimal_parts(magnitude: &UBig, exponent: isize) -> (UBig, isize) {
        binary_to_decimal(magnitude, exponent)
    }

    fn to_f64(mantissa: &IBig, exponent: isize) -> f64 {
        fbig_to_f64(mantissa.clone(), exponent)
    }
}

impl Radix for Decimal {
    const BASE: u32 = 10;
    const MARKER: char = 'e';

    fn digit_len(magnitude: &UBig) -> usize {
        if magnitude.is_zero() {
            return 0;
        }
        // 2^(bits-1) <= m < 2^bits pins floor(log10 m) to within one
        let bits = magnitude.bit_len();
        let mut log10 = ((bits - 1) as f64 * std::f64::consts::LOG10_2) as usize;
        while log10 > 0 && *magnitude < pow10(log10) {
            log10 -= 1;
        }
        while *magnitude >= pow10(log10 + 1) {
            log10 += 1;
        }
        log10 + 1
    }

    fn scale_up(magnitude: &UBig, k: usize) -> UBig {
        magnitude * pow10(k)
    }

    fn scale_down(magnitude: &UBig, k: usize) -> (UBig, bool) {
        let divisor = pow10(k);
        let remainder = magnitude % &divisor;
        (magnitude / &divisor, !remainder.is_zero())
    }

    fn trailing_zero_digits(magnitude: &UBig) -> usize {
        // Every trailing decimal zero is also a trailing binary zero
        let bound = match magnitude.trailing_zeros() {
            Some(0) | None => return 0,
            Some(bound) => bound,
        };

        let chunk = pow10(DECIMAL_CHUNK);
        let ten = UBig::from(10u8);
        let mut value = magnitude.clone();
        let mut count = 0;
        while count + DECIMAL_CHUNK <= bound && (&value % &chunk).is_zero() {
            value = value / &chunk;
            count += DECIMAL_CHUNK;
        }
        while count < bound && (&value % &ten).is_zero() {
            value = value / &ten;
            count += 1;
        }
        count
    }

    fn from_binary_parts(magnitude: UBig, exponent: isize) -> (UBig, isize) {
        binary_to_decimal(&magnitude, exponent)
    }

    fn from_decimal_parts(magnitude: UBig, exponent: isize) -> Option<(UBig, isize)> {
        Some((magnitude, exponent))
    }

    fn to_decimal_parts(magnitude: &UBig, exponent: isize) -> (UBig, isize) {
        (magnitude.clone(), exponent)
    }

    fn to_f64(mantissa: &IBig, exponent: isize) -> f64 {
        if mantissa.is_zero() {
            return 0.0;
        }
        if exponent >= 0 {
            return fbig_to_f64(mantissa * IBig::from(pow10(exponent as usize)), 0);
        }

        // Binary quotient with at least 64 significant bits, then let FBig round.
        // An inexact quotient gets its lowest bit set so ties are not misread.
        let divisor = pow10(exponent.unsigned_abs());
        let magnitude = magnitude(mantissa);
        let shift = (64 + divisor.bit_len()).saturating_sub(magnitude.bit_len());
        let scaled = magnitude << shift;
        let mut quotient = &scaled / &divisor;
        if !(&scaled % &divisor).is_zero() {
            quotient = quotient | UBig::ONE;
        }
        let significand = IBig::from_parts(mantissa.sign(), quotient);
        fbig_to_f64(significand, -(shift as isize))
    }
}
