//! Complex values with arbitrary-precision components.

use crate::complex_delta::F64Complex;
use crate::error::NumberError;
use crate::high_precision::HighPrecision;
use crate::precision::Precision;

/// Complex number over a [`HighPrecision`] backend. Used for the reference
/// coordinate, orbit generation and direct iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct HpComplex<T: HighPrecision> {
    pub re: T,
    pub im: T,
}

impl<T: HighPrecision> HpComplex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }

    pub fn from_f64_pair(re: f64, im: f64, precision: Precision) -> Result<Self, NumberError> {
        Ok(Self {
            re: T::from_f64(re, precision)?,
            im: T::from_f64(im, precision)?,
        })
    }

    pub fn from_strings(re: &str, im: &str, precision: Precision) -> Result<Self, NumberError> {
        Ok(Self {
            re: T::from_string(re, precision)?,
            im: T::from_string(im, precision)?,
        })
    }

    pub fn add(&self, other: &Self) -> Self {
        Self {
            re: self.re.add(&other.re),
            im: self.im.add(&other.im),
        }
    }

    /// Shift by a double-precision offset (exact conversion of the offset).
    pub fn offset_by(&self, offset: F64Complex) -> Result<Self, NumberError> {
        let precision = self.re.precision();
        Ok(Self {
            re: self.re.add(&T::from_f64(offset.re, precision)?),
            im: self.im.add(&T::from_f64(offset.im, precision)?),
        })
    }

    /// |z|² at full precision.
    pub fn norm_sq(&self) -> T {
        self.re.mul(&self.re).add(&self.im.mul(&self.im))
    }

    /// `z² + c`, truncated to the precision budget.
    pub fn square_add(&self, c: &Self) -> Self {
        let re = self.re.mul(&self.re).sub(&self.im.mul(&self.im)).add(&c.re);
        let im = self.re.mul(&self.im).double().add(&c.im);
        Self {
            re: re.truncate_to_budget(),
            im: im.truncate_to_budget(),
        }
    }

    pub fn to_f64_pair(&self) -> (f64, f64) {
        (self.re.to_f64(), self.im.to_f64())
    }

    pub fn to_f64_complex(&self) -> F64Complex {
        F64Complex::new(self.re.to_f64(), self.im.to_f64())
    }
}
