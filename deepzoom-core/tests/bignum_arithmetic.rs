use dashu::integer::IBig;
use deepzoom_core::{BinaryNumber, DecimalNumber, NumberError, Precision};

const P64: Precision = Precision::new(64);

// ============================================================================
// Addition / subtraction
// ============================================================================

#[test]
fn add_binary_mixed_signs() {
    let a = BinaryNumber::from_f64(5.0, P64).unwrap();
    let b = BinaryNumber::from_f64(-7.25, P64).unwrap();
    assert_eq!(a.add(&b).to_f64(), -2.25);
    assert_eq!(b.add(&a).to_f64(), -2.25);
}

#[test]
fn add_decimal_extreme_scale_is_exact() {
    let p = Precision::new(50);
    let a = DecimalNumber::from_string("1e-2000", p).unwrap();
    let b = DecimalNumber::from_string("3.5e-2000", p).unwrap();
    let expected = DecimalNumber::from_string("4.5e-2000", p).unwrap();
    assert_eq!(a.add(&b), expected);
}

#[test]
fn add_across_wide_exponent_gap_is_exact() {
    let p = Precision::new(10);
    let big = DecimalNumber::from_string("1e40", p).unwrap();
    let tiny = DecimalNumber::from_string("1e-40", p).unwrap();
    let sum = big.add(&tiny);

    // Division-only truncation keeps all 81 digits
    assert_eq!(sum.significant_digits(), 81);
    assert_eq!(sum.sub(&big), tiny);
}

#[test]
fn sub_to_zero_normalizes_exponent() {
    let a = DecimalNumber::from_string("1.25e-30", P64).unwrap();
    let zero = a.sub(&a);
    assert!(zero.is_zero());
    assert_eq!(zero.exponent(), 0);
}

#[test]
fn add_takes_wider_precision() {
    let a = BinaryNumber::from_f64(1.5, Precision::new(64)).unwrap();
    let b = BinaryNumber::from_f64(2.5, Precision::new(256)).unwrap();
    assert_eq!(a.add(&b).precision().digits, 256);
}

// ============================================================================
// Multiplication
// ============================================================================

#[test]
fn mul_is_exact_without_truncation() {
    let x: i64 = (1 << 60) + 1;
    let a = BinaryNumber::from_integer(x, P64);
    let product = a.mul(&a);

    assert_eq!(product.mantissa(), &(IBig::from(x) * IBig::from(x)));
    assert_eq!(product.exponent(), 0);
    assert_eq!(product.significant_digits(), 121);
}

#[test]
fn mul_always_mode_truncates_toward_zero() {
    let p = Precision::always(8);
    let a = BinaryNumber::from_integer(255, p);
    let product = a.mul(&a);

    // 65025 = 0b1111_1110_0000_0001 keeps its top 8 bits
    assert_eq!(product.to_f64(), 65024.0);
    assert!(product.significant_digits() <= 8);
}

#[test]
fn mul_signs() {
    let a = DecimalNumber::from_string("-1.5", P64).unwrap();
    let b = DecimalNumber::from_string("-2", P64).unwrap();
    let c = DecimalNumber::from_string("4", P64).unwrap();
    assert_eq!(a.mul(&b).to_f64(), 3.0);
    assert_eq!(a.mul(&c).to_f64(), -6.0);
}

#[test]
fn double_matches_add() {
    let a = BinaryNumber::from_f64(-0.375, P64).unwrap();
    assert_eq!(a.add(&a).to_f64(), -0.75);
}

// ============================================================================
// Division
// ============================================================================

#[test]
fn div_one_third_has_exact_digit_budget() {
    let p = Precision::new(20);
    let one = DecimalNumber::from_integer(1, p);
    let three = DecimalNumber::from_integer(3, p);
    let third = one.div(&three).unwrap();

    assert_eq!(third.significant_digits(), 20);
    assert_eq!(third.to_string(), "3.3333333333333333333e-1");
}

#[test]
fn div_truncates_toward_zero() {
    let p = Precision::new(5);
    let a = DecimalNumber::from_integer(-2, p);
    let b = DecimalNumber::from_integer(3, p);
    assert_eq!(a.div(&b).unwrap().to_string(), "-6.6666e-1");
}

#[test]
fn div_exact_binary_quotient() {
    let a = BinaryNumber::from_integer(-1, P64);
    let b = BinaryNumber::from_integer(4, P64);
    assert_eq!(a.div(&b).unwrap().to_f64(), -0.25);
}

#[test]
fn div_large_dividend_still_bounded() {
    let p = Precision::new(16);
    let a = BinaryNumber::from_integer(i64::MAX, p);
    let b = BinaryNumber::from_integer(3, p);
    assert!(a.div(&b).unwrap().significant_digits() <= 16);
}

#[test]
fn div_by_zero_fails_fast() {
    let a = BinaryNumber::from_integer(1, P64);
    let zero = BinaryNumber::zero(P64);
    assert_eq!(a.div(&zero), Err(NumberError::DivisionByZero));
}

#[test]
fn div_zero_by_value_is_zero() {
    let zero = DecimalNumber::zero(P64);
    let b = DecimalNumber::from_integer(7, P64);
    assert!(zero.div(&b).unwrap().is_zero());
}

// ============================================================================
// Truncation and floor
// ============================================================================

#[test]
fn truncate_drops_low_digits() {
    let value = DecimalNumber::from_integer(123_456, P64);
    assert_eq!(value.truncate(3).to_string(), "1.23e5");

    let negative = DecimalNumber::from_integer(-123_999, P64);
    assert_eq!(negative.truncate(3).to_f64(), -123_000.0);
}

#[test]
fn truncate_is_noop_within_budget() {
    let value = BinaryNumber::from_f64(0.75, P64).unwrap();
    assert_eq!(value.truncate(64), value);
}

#[test]
fn floor_rounds_toward_negative_infinity() {
    let cases = [(2.5, 2.0), (-2.5, -3.0), (-2.0, -2.0), (0.75, 0.0), (7.0, 7.0)];
    for (input, expected) in cases {
        let value = BinaryNumber::from_f64(input, P64).unwrap();
        assert_eq!(value.floor().to_f64(), expected, "floor({})", input);
    }

    let tiny = DecimalNumber::from_string("-0.0001", P64).unwrap();
    assert_eq!(tiny.floor().to_f64(), -1.0);
}

#[test]
fn abs_and_negate() {
    let value = DecimalNumber::from_string("-3.25", P64).unwrap();
    assert_eq!(value.abs().to_f64(), 3.25);
    assert_eq!(value.negate().to_f64(), 3.25);
    assert_eq!(value.signum(), -1);
    assert_eq!(DecimalNumber::zero(P64).signum(), 0);
}
