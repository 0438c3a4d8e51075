//! Property-based invariant tests for `BigNumber`.
//!
//! 1. Normalization is idempotent; zero always carries exponent 0.
//! 2. Addition and multiplication of small integers match `IBig` exactly.
//! 3. Quotients never exceed the digit budget.
//! 4. Ordering agrees with f64 for exactly representable values.
//! 5. f64 conversion round-trips.

use dashu::integer::IBig;
use deepzoom_core::{BinaryNumber, DecimalNumber, Precision};
use proptest::prelude::*;

const P: Precision = Precision::new(256);

fn finite_f64() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Normalization
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn binary_normalize_idempotent(mantissa in any::<i64>(), exponent in -500isize..500) {
        let once = BinaryNumber::new(IBig::from(mantissa), exponent, P);
        let twice = once.normalize();
        prop_assert_eq!(once.mantissa(), twice.mantissa());
        prop_assert_eq!(once.exponent(), twice.exponent());
    }

    #[test]
    fn decimal_normalize_idempotent(mantissa in any::<i64>(), exponent in -500isize..500) {
        let once = DecimalNumber::new(IBig::from(mantissa), exponent, P);
        let twice = once.normalize();
        prop_assert_eq!(once.mantissa(), twice.mantissa());
        prop_assert_eq!(once.exponent(), twice.exponent());
    }

    #[test]
    fn zero_has_exponent_zero(exponent in any::<i32>()) {
        let binary = BinaryNumber::new(IBig::ZERO, exponent as isize, P);
        let decimal = DecimalNumber::new(IBig::ZERO, exponent as isize, P);
        prop_assert_eq!(binary.exponent(), 0);
        prop_assert_eq!(decimal.exponent(), 0);
    }

    #[test]
    fn normalized_mantissa_has_no_trailing_zero_digit(mantissa in any::<i64>(), exponent in -50isize..50) {
        prop_assume!(mantissa != 0);
        let binary = BinaryNumber::new(IBig::from(mantissa), exponent, P);
        prop_assert!(binary.mantissa() % IBig::from(2) != IBig::ZERO);

        let decimal = DecimalNumber::new(IBig::from(mantissa), exponent, P);
        prop_assert!(decimal.mantissa() % IBig::from(10) != IBig::ZERO);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Exact integer arithmetic
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_matches_ibig(a in any::<i64>(), b in any::<i64>()) {
        let expected = BinaryNumber::new(IBig::from(a) + IBig::from(b), 0, P);
        let sum = BinaryNumber::from_integer(a, P).add(&BinaryNumber::from_integer(b, P));
        prop_assert_eq!(sum, expected);

        let expected = DecimalNumber::new(IBig::from(a) + IBig::from(b), 0, P);
        let sum = DecimalNumber::from_integer(a, P).add(&DecimalNumber::from_integer(b, P));
        prop_assert_eq!(sum, expected);
    }

    #[test]
    fn sub_matches_ibig(a in any::<i64>(), b in any::<i64>()) {
        let expected = DecimalNumber::new(IBig::from(a) - IBig::from(b), 0, P);
        let diff = DecimalNumber::from_integer(a, P).sub(&DecimalNumber::from_integer(b, P));
        prop_assert_eq!(diff, expected);
    }

    #[test]
    fn mul_matches_ibig(a in any::<i64>(), b in any::<i64>()) {
        let expected = BinaryNumber::new(IBig::from(a) * IBig::from(b), 0, P);
        let product = BinaryNumber::from_integer(a, P).mul(&BinaryNumber::from_integer(b, P));
        prop_assert_eq!(product, expected);

        let expected = DecimalNumber::new(IBig::from(a) * IBig::from(b), 0, P);
        let product = DecimalNumber::from_integer(a, P).mul(&DecimalNumber::from_integer(b, P));
        prop_assert_eq!(product, expected);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Division precision bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn quotient_within_budget(a in any::<i64>(), b in any::<i64>(), digits in 1usize..200) {
        prop_assume!(b != 0);
        let p = Precision::new(digits);

        let q = BinaryNumber::from_integer(a, p).div(&BinaryNumber::from_integer(b, p)).unwrap();
        prop_assert!(q.significant_digits() <= digits);
        prop_assert!(q.truncate(digits).significant_digits() <= digits);

        let q = DecimalNumber::from_integer(a, p).div(&DecimalNumber::from_integer(b, p)).unwrap();
        prop_assert!(q.significant_digits() <= digits);
    }

    #[test]
    fn quotient_times_divisor_does_not_overshoot(a in 1i64..1_000_000, b in 1i64..1_000_000) {
        let p = Precision::new(30);
        let dividend = DecimalNumber::from_integer(a, p);
        let divisor = DecimalNumber::from_integer(b, p);
        let q = dividend.div(&divisor).unwrap();
        // Truncation toward zero: q·b <= a for positive operands
        prop_assert!(q.mul(&divisor) <= dividend);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Ordering and f64 conversion
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ordering_matches_f64(x in finite_f64(), y in finite_f64()) {
        let a = BinaryNumber::from_f64(x, P).unwrap();
        let b = BinaryNumber::from_f64(y, P).unwrap();
        prop_assert_eq!(a.partial_cmp(&b), x.partial_cmp(&y));
    }

    #[test]
    fn binary_f64_roundtrip(x in finite_f64()) {
        prop_assert_eq!(BinaryNumber::from_f64(x, P).unwrap().to_f64(), x);
    }

    #[test]
    fn decimal_f64_roundtrip(x in -1.0e12f64..1.0e12) {
        prop_assert_eq!(DecimalNumber::from_f64(x, P).unwrap().to_f64(), x);
    }
}
