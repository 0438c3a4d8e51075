use crate::error::NumberError;
use crate::precision::{Precision, Truncation};
use crate::radix::{magnitude, pow10, Binary, Decimal, Radix};
use dashu::integer::{IBig, UBig};
use dashu_base::Sign;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::marker::PhantomData;

/// Arbitrary precision number `mantissa × BASE^exponent`.
///
/// Values are always normalized: the mantissa has no trailing zero digits,
/// and zero has exponent 0. Multiplication and addition are exact unless the
/// precision asks for `Truncation::Always`; division truncates toward zero to
/// `precision.digits` significant digits.
///
/// Equality and ordering compare numeric values only.
#[derive(Clone, Debug)]
pub struct BigNumber<R: Radix> {
    mantissa: IBig,
    exponent: isize,
    precision: Precision,
    radix: PhantomData<R>,
}

/// Base-2 arbitrary precision number.
pub type BinaryNumber = BigNumber<Binary>;

/// Base-10 arbitrary precision number.
pub type DecimalNumber = BigNumber<Decimal>;

fn sign_product(a: Sign, b: Sign) -> Sign {
    if a == b {
        Sign::Positive
    } else {
        Sign::Negative
    }
}

impl<R: Radix> BigNumber<R> {
    /// Create a normalized number from raw parts.
    pub fn new(mantissa: IBig, exponent: isize, precision: Precision) -> Self {
        let (mantissa, exponent) = Self::normalize_parts(mantissa, exponent);
        Self {
            mantissa,
            exponent,
            precision,
            radix: PhantomData,
        }
    }

    /// Strip trailing zero digits into the exponent; zero gets exponent 0.
    pub fn normalize_parts(mantissa: IBig, exponent: isize) -> (IBig, isize) {
        if mantissa.is_zero() {
            return (IBig::ZERO, 0);
        }
        let (sign, magnitude) = mantissa.into_parts();
        let zeros = R::trailing_zero_digits(&magnitude);
        if zeros == 0 {
            return (IBig::from_parts(sign, magnitude), exponent);
        }
        let (magnitude, _) = R::scale_down(&magnitude, zeros);
        (IBig::from_parts(sign, magnitude), exponent + zeros as isize)
    }

    /// Build from parts, then apply the budget if every operation truncates.
    fn finish(mantissa: IBig, exponent: isize, precision: Precision) -> Self {
        let value = Self::new(mantissa, exponent, precision);
        match precision.truncation {
            Truncation::Always => value.truncate(precision.digits),
            Truncation::DivisionOnly => value,
        }
    }

    pub fn zero(precision: Precision) -> Self {
        Self::new(IBig::ZERO, 0, precision)
    }

    pub fn one(precision: Precision) -> Self {
        Self::from_integer(1, precision)
    }

    pub fn from_integer(value: i64, precision: Precision) -> Self {
        Self::finish(IBig::from(value), 0, precision)
    }

    /// Exact conversion from f64 (subject to `Truncation::Always`).
    pub fn from_f64(value: f64, precision: Precision) -> Result<Self, NumberError> {
        if !value.is_finite() {
            return Err(NumberError::NonFinite(value.to_string()));
        }
        if value == 0.0 {
            return Ok(Self::zero(precision));
        }

        // value = fraction × 2^exp with 0.5 <= |fraction| < 1, so fraction × 2^53 is an integer
        let (fraction, exp) = libm::frexp(value);
        let scaled = libm::ldexp(fraction, 53) as i64;
        let sign = if scaled < 0 {
            Sign::Negative
        } else {
            Sign::Positive
        };
        let magnitude = UBig::from(scaled.unsigned_abs());
        let (magnitude, exponent) = R::from_binary_parts(magnitude, exp as isize - 53);
        Ok(Self::finish(
            IBig::from_parts(sign, magnitude),
            exponent,
            precision,
        ))
    }

    /// Parse decimal text (`-1.25`, `3e-40`, `.5E+2`) or the canonical form
    /// produced by [`to_canonical_string`](Self::to_canonical_string).
    ///
    /// Decimal text is exact in base 10. In base 2, text with a fractional
    /// decimal part goes through division and is truncated to the budget.
    pub fn from_string(text: &str, precision: Precision) -> Result<Self, NumberError> {
        let trimmed = text.trim();
        if R::MARKER != 'e' {
            if let Some((mantissa, exponent)) = trimmed.split_once(R::MARKER) {
                let mantissa = mantissa
                    .parse::<IBig>()
                    .map_err(|e| NumberError::parse(text, e.to_string()))?;
                let exponent = exponent
                    .parse::<isize>()
                    .map_err(|e| NumberError::parse(text, e.to_string()))?;
                return Ok(Self::finish(mantissa, exponent, precision));
            }
        }

        let (sign, digits, exp10) = parse_decimal(trimmed).map_err(|r| NumberError::parse(text, r))?;
        match R::from_decimal_parts(digits.clone(), exp10) {
            Some((magnitude, exponent)) => Ok(Self::finish(
                IBig::from_parts(sign, magnitude),
                exponent,
                precision,
            )),
            None => {
                let numerator = Self::new(IBig::from_parts(sign, digits), 0, precision);
                let denominator = Self::new(
                    IBig::from(pow10(exp10.unsigned_abs())),
                    0,
                    precision,
                );
                numerator.div(&denominator)
            }
        }
    }

    pub fn mantissa(&self) -> &IBig {
        &self.mantissa
    }

    pub fn exponent(&self) -> isize {
        self.exponent
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Same value, different budget. Does not truncate.
    pub fn with_precision(&self, precision: Precision) -> Self {
        Self {
            precision,
            ..self.clone()
        }
    }

    /// Number of significant digits held by the mantissa.
    pub fn significant_digits(&self) -> usize {
        R::digit_len(&magnitude(&self.mantissa))
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.mantissa.sign() == Sign::Negative
    }

    /// Already normalized; returns an equal value.
    pub fn normalize(&self) -> Self {
        Self::new(self.mantissa.clone(), self.exponent, self.precision)
    }

    /// -1, 0 or 1.
    pub fn signum(&self) -> i8 {
        if self.is_zero() {
            0
        } else if self.mantissa.sign() == Sign::Negative {
            -1
        } else {
            1
        }
    }

    /// Mantissa rescaled so the value carries exponent `target <= self.exponent`.
    fn aligned_mantissa(&self, target: isize) -> IBig {
        let k = (self.exponent - target) as usize;
        if k == 0 {
            return self.mantissa.clone();
        }
        IBig::from_parts(
            self.mantissa.sign(),
            R::scale_up(&magnitude(&self.mantissa), k),
        )
    }

    pub fn add(&self, other: &Self) -> Self {
        let precision = self.precision.combine(&other.precision);
        if other.is_zero() {
            return Self::finish(self.mantissa.clone(), self.exponent, precision);
        }
        if self.is_zero() {
            return Self::finish(other.mantissa.clone(), other.exponent, precision);
        }

        let exponent = self.exponent.min(other.exponent);
        let sum = self.aligned_mantissa(exponent) + other.aligned_mantissa(exponent);
        Self::finish(sum, exponent, precision)
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.negate())
    }

    pub fn mul(&self, other: &Self) -> Self {
        let precision = self.precision.combine(&other.precision);
        Self::finish(
            &self.mantissa * &other.mantissa,
            self.exponent + other.exponent,
            precision,
        )
    }

    /// Quotient with exactly `precision.digits` significant digits,
    /// truncated toward zero.
    pub fn div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            return Err(NumberError::DivisionByZero);
        }
        let precision = self.precision.combine(&other.precision);
        if self.is_zero() {
            return Ok(Self::zero(precision));
        }

        let dividend = magnitude(&self.mantissa);
        let divisor = magnitude(&other.mantissa);
        let digit_gap = R::digit_len(&dividend) as isize - R::digit_len(&divisor) as isize;
        let shift = (precision.digits as isize - digit_gap).max(0) as usize;

        let quotient = R::scale_up(&dividend, shift) / &divisor;
        let sign = sign_product(self.mantissa.sign(), other.mantissa.sign());
        let exponent = self.exponent - other.exponent - shift as isize;

        Ok(Self::new(IBig::from_parts(sign, quotient), exponent, precision).truncate(precision.digits))
    }

    pub fn negate(&self) -> Self {
        Self {
            mantissa: -self.mantissa.clone(),
            ..self.clone()
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            mantissa: IBig::from(magnitude(&self.mantissa)),
            ..self.clone()
        }
    }

    /// Drop digits beyond `digits`, rounding toward zero.
    pub fn truncate(&self, digits: usize) -> Self {
        let magnitude = magnitude(&self.mantissa);
        let len = R::digit_len(&magnitude);
        if len <= digits {
            return self.clone();
        }
        let dropped = len - digits;
        let (magnitude, _) = R::scale_down(&magnitude, dropped);
        Self::new(
            IBig::from_parts(self.mantissa.sign(), magnitude),
            self.exponent + dropped as isize,
            self.precision,
        )
    }

    /// Largest integer not greater than the value.
    pub fn floor(&self) -> Self {
        if self.exponent >= 0 || self.is_zero() {
            return self.clone();
        }
        let sign = self.mantissa.sign();
        let (mut magnitude, inexact) =
            R::scale_down(&magnitude(&self.mantissa), self.exponent.unsigned_abs());
        if sign == Sign::Negative && inexact {
            magnitude += UBig::ONE;
        }
        Self::new(IBig::from_parts(sign, magnitude), 0, self.precision)
    }

    /// Convert to f64 (for storage of orbit values and display).
    /// Values beyond the f64 range saturate to infinity or zero.
    pub fn to_f64(&self) -> f64 {
        R::to_f64(&self.mantissa, self.exponent)
    }

    /// Exact `<mantissa><marker><exponent>` text, parseable by `from_string`.
    pub fn to_canonical_string(&self) -> String {
        format!("{}{}{}", self.mantissa, R::MARKER, self.exponent)
    }

    fn cmp_value(&self, other: &Self) -> Ordering {
        let (sa, sb) = (self.signum(), other.signum());
        if sa != sb {
            return sa.cmp(&sb);
        }
        if sa == 0 {
            return Ordering::Equal;
        }

        // Order of magnitude first: |v| lies in [BASE^(order-1), BASE^order)
        let order_a = self.significant_digits() as isize + self.exponent;
        let order_b = other.significant_digits() as isize + other.exponent;
        let by_magnitude = if order_a != order_b {
            order_a.cmp(&order_b)
        } else {
            let exponent = self.exponent.min(other.exponent);
            magnitude(&self.aligned_mantissa(exponent))
                .cmp(&magnitude(&other.aligned_mantissa(exponent)))
        };

        if sa < 0 {
            by_magnitude.reverse()
        } else {
            by_magnitude
        }
    }
}

/// Split decimal text into sign, digit magnitude and power-of-ten exponent.
fn parse_decimal(text: &str) -> Result<(Sign, UBig, isize), String> {
    let (sign, unsigned) = match text.as_bytes().first() {
        Some(b'-') => (Sign::Negative, &text[1..]),
        Some(b'+') => (Sign::Positive, &text[1..]),
        Some(_) => (Sign::Positive, text),
        None => return Err("empty input".to_string()),
    };

    let (body, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => {
            let exponent = unsigned[at + 1..]
                .parse::<isize>()
                .map_err(|e| format!("bad exponent: {e}"))?;
            (&unsigned[..at], exponent)
        }
        None => (unsigned, 0),
    };

    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err("unexpected character".to_string());
    }
    if int_part.is_empty() && frac_part.is_empty() {
        return Err("no digits".to_string());
    }

    let digits = format!("{int_part}{frac_part}");
    let magnitude = digits
        .parse::<UBig>()
        .map_err(|e| format!("bad digits: {e}"))?;
    Ok((sign, magnitude, exponent - frac_part.len() as isize))
}

impl<R: Radix> std::ops::Neg for BigNumber<R> {
    type Output = Self;

    fn neg(self) -> Self {
        self.negate()
    }
}

impl<R: Radix> std::ops::Neg for &BigNumber<R> {
    type Output = BigNumber<R>;

    fn neg(self) -> BigNumber<R> {
        self.negate()
    }
}

impl<R: Radix> PartialEq for BigNumber<R> {
    fn eq(&self, other: &Self) -> bool {
        self.mantissa == other.mantissa && self.exponent == other.exponent
    }
}

impl<R: Radix> Eq for BigNumber<R> {}

impl<R: Radix> PartialOrd for BigNumber<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Radix> Ord for BigNumber<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_value(other)
    }
}

/// Exact decimal scientific notation, e.g. `-7.5e-1`.
impl<R: Radix> std::fmt::Display for BigNumber<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let (digits, exponent) = R::to_decimal_parts(&magnitude(&self.mantissa), self.exponent);
        let digits = digits.to_string();
        let scientific = exponent + digits.len() as isize - 1;

        if self.is_negative() {
            write!(f, "-")?;
        }
        write!(f, "{}", &digits[..1])?;
        if digits.len() > 1 {
            write!(f, ".{}", &digits[1..])?;
        }
        if scientific != 0 {
            write!(f, "e{}", scientific)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct BigNumberSerde {
    value: String,
    digits: usize,
    #[serde(default)]
    truncation: Truncation,
}

impl<R: Radix> Serialize for BigNumber<R> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let serde = BigNumberSerde {
            value: self.to_canonical_string(),
            digits: self.precision.digits,
            truncation: self.precision.truncation,
        };

        serde.serialize(serializer)
    }
}

impl<'de, R: Radix> Deserialize<'de> for BigNumber<R> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let serde = BigNumberSerde::deserialize(deserializer)?;
        let precision = Precision {
            digits: serde.digits,
            truncation: serde.truncation,
        };
        Self::from_string(&serde.value, precision).map_err(serde::de::Error::custom)
    }
}
