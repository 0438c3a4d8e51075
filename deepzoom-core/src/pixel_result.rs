use serde::{Deserialize, Serialize};

/// Escape-time data computed for one pixel, consumed by the colour mapper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelResult {
    /// Iteration at which the point escaped (or max_iterations if it didn't)
    pub iterations: u32,
    /// |z|² at escape for smooth colouring. Interior points store 0.0.
    pub escape_magnitude_sq: f64,
    /// Whether the point escaped the set
    pub escaped: bool,
    /// The reference orbit ended before this pixel's orbit did, so the
    /// iteration count is unreliable.
    #[serde(default)]
    pub glitched: bool,
}

impl PixelResult {
    /// Escaped at `iterations`. Non-finite magnitudes are stored as `f64::MAX`
    /// since serde_json cannot encode NaN or infinity.
    pub fn escaped(iterations: u32, magnitude_sq: f64) -> Self {
        Self {
            iterations,
            escape_magnitude_sq: sanitize_magnitude(magnitude_sq),
            escaped: true,
            glitched: false,
        }
    }

    /// Never escaped within `max_iterations`.
    pub fn interior(max_iterations: u32) -> Self {
        Self {
            iterations: max_iterations,
            escape_magnitude_sq: 0.0,
            escaped: false,
            glitched: false,
        }
    }

    /// Ran out of reference orbit at `iterations` without escaping.
    pub fn glitch(iterations: u32, magnitude_sq: f64) -> Self {
        Self {
            iterations,
            escape_magnitude_sq: sanitize_magnitude(magnitude_sq),
            escaped: false,
            glitched: true,
        }
    }
}

#[inline]
fn sanitize_magnitude(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::MAX
    }
}

/// Row-major `width × height` grid of pixel results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultGrid {
    width: u32,
    height: u32,
    pixels: Vec<PixelResult>,
}

impl ResultGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PixelResult::default(); width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<&PixelResult> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y))
    }

    /// Store a result; out-of-frame coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, result: PixelResult) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.pixels[index] = result;
        }
    }

    /// Write `result` over the `size × size` block at (x, y), clipped to
    /// `bounds` (right/bottom exclusive) and to the frame.
    pub fn fill_block(&mut self, x: u32, y: u32, size: u32, bounds: (u32, u32), result: PixelResult) {
        let right = x.saturating_add(size).min(bounds.0).min(self.width);
        let bottom = y.saturating_add(size).min(bounds.1).min(self.height);
        if x >= right || y >= bottom {
            return;
        }
        for py in y..bottom {
            let row = self.index(0, py);
            self.pixels[row + x as usize..row + right as usize].fill(result);
        }
    }

    pub fn row(&self, y: u32) -> &[PixelResult] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    pub fn pixels(&self) -> &[PixelResult] {
        &self.pixels
    }

    pub fn glitch_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.glitched).count()
    }

    pub fn escaped_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.escaped).count()
    }
}
