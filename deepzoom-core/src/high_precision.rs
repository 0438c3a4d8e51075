//! The arithmetic backend used for reference orbits and direct iteration.
//!
//! The backend is picked once from [`NumberBackend`](crate::NumberBackend)
//! and threaded through the compute code as a generic parameter.

use crate::bignum::BigNumber;
use crate::error::NumberError;
use crate::precision::Precision;
use crate::radix::Radix;
use std::fmt::{Debug, Display};

/// Real number type with a bounded significant-digit budget.
pub trait HighPrecision:
    Clone + Debug + Display + PartialEq + PartialOrd + Send + Sync + 'static
{
    fn from_f64(value: f64, precision: Precision) -> Result<Self, NumberError>;

    fn from_string(text: &str, precision: Precision) -> Result<Self, NumberError>;

    fn zero(precision: Precision) -> Self;

    fn add(&self, other: &Self) -> Self;

    fn sub(&self, other: &Self) -> Self;

    fn mul(&self, other: &Self) -> Self;

    fn double(&self) -> Self {
        self.add(self)
    }

    /// Round toward zero to at most `digits` significant digits.
    fn truncate_to(&self, digits: usize) -> Self;

    fn precision(&self) -> Precision;

    fn to_f64(&self) -> f64;

    /// Truncate to this value's own budget.
    fn truncate_to_budget(&self) -> Self {
        self.truncate_to(self.precision().digits)
    }
}

impl<R: Radix> HighPrecision for BigNumber<R> {
    fn from_f64(value: f64, precision: Precision) -> Result<Self, NumberError> {
        BigNumber::from_f64(value, precision)
    }

    fn from_string(text: &str, precision: Precision) -> Result<Self, NumberError> {
        BigNumber::from_string(text, precision)
    }

    fn zero(precision: Precision) -> Self {
        BigNumber::zero(precision)
    }

    fn add(&self, other: &Self) -> Self {
        BigNumber::add(self, other)
    }

    fn sub(&self, other: &Self) -> Self {
        BigNumber::sub(self, other)
    }

    fn mul(&self, other: &Self) -> Self {
        BigNumber::mul(self, other)
    }

    fn double(&self) -> Self {
        BigNumber::add(self, self)
    }

    fn truncate_to(&self, digits: usize) -> Self {
        self.truncate(digits)
    }

    fn precision(&self) -> Precision {
        BigNumber::precision(self)
    }

    fn to_f64(&self) -> f64 {
        BigNumber::to_f64(self)
    }
}
