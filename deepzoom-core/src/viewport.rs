use crate::complex_delta::F64Complex;
use serde::{Deserialize, Serialize};

/// Pixel-to-plane mapping of a frame, relative to the centre coordinate.
///
/// The view spans `4 / magnification` across the frame width; pixels are
/// square. The centre coordinate sits on pixel `(width / 2, height / 2)`,
/// and the imaginary axis grows upward (decreasing `y`).
///
/// Offsets are doubles: at any magnification the distance between two
/// pixels of one frame is representable even when the centre is not.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewGeometry {
    pub width: u32,
    pub height: u32,
    pub pixel_size: f64,
    pub reference_pixel: (u32, u32),
}

impl ViewGeometry {
    pub fn new(width: u32, height: u32, magnification: f64, reference_pixel: Option<(u32, u32)>) -> Self {
        Self {
            width,
            height,
            pixel_size: 4.0 / (magnification * width.max(1) as f64),
            reference_pixel: reference_pixel.unwrap_or_else(|| Self::centre_pixel_of(width, height)),
        }
    }

    fn centre_pixel_of(width: u32, height: u32) -> (u32, u32) {
        (width / 2, height / 2)
    }

    /// Pixel that maps exactly onto the centre coordinate.
    pub fn centre_pixel(&self) -> (u32, u32) {
        Self::centre_pixel_of(self.width, self.height)
    }

    /// Plane offset between two pixels, `to - from`.
    #[inline]
    fn offset(&self, from: (u32, u32), to: (u32, u32)) -> F64Complex {
        F64Complex::new(
            (to.0 as f64 - from.0 as f64) * self.pixel_size,
            (from.1 as f64 - to.1 as f64) * self.pixel_size,
        )
    }

    /// `δ₀` of a pixel: its plane offset from the reference pixel.
    #[inline]
    pub fn delta_for_pixel(&self, px: u32, py: u32) -> F64Complex {
        self.offset(self.reference_pixel, (px, py))
    }

    /// Offset of the reference pixel from the centre coordinate.
    pub fn reference_offset(&self) -> F64Complex {
        self.offset(self.centre_pixel(), self.reference_pixel)
    }

    /// Offset of any pixel from the centre coordinate.
    pub fn offset_from_centre(&self, px: u32, py: u32) -> F64Complex {
        self.offset(self.centre_pixel(), (px, py))
    }

    /// Half the visible width in plane units.
    pub fn half_extent(&self) -> f64 {
        self.pixel_size * self.width as f64 / 2.0
    }
}
