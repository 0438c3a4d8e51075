pub mod bignum;
pub mod complex_delta;
pub mod config;
pub mod error;
pub mod high_precision;
pub mod hp_complex;
pub mod pixel_rect;
pub mod pixel_result;
pub mod precision;
pub mod radix;
pub mod session;
pub mod viewport;

pub use bignum::{BigNumber, BinaryNumber, DecimalNumber};
pub use complex_delta::F64Complex;
pub use config::{GlitchPolicy, NumberBackend, RenderMode, RenderSettings, SeriesSettings};
pub use error::{ConfigError, NumberError};
pub use high_precision::HighPrecision;
pub use hp_complex::HpComplex;
pub use pixel_rect::PixelRect;
pub use pixel_result::{PixelResult, ResultGrid};
pub use precision::{bits_to_decimal_digits, calculate_precision_bits, Precision, Truncation};
pub use radix::{Binary, Decimal, Radix};
pub use session::SavedSession;
pub use viewport::ViewGeometry;
