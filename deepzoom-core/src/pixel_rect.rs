use serde::{Deserialize, Serialize};

/// Rectangle in pixel space (always u32 coordinates)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whole frame as one rectangle.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Calculate area in pixels
    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Check if point is inside rectangle
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Split the frame into a `columns × rows` grid, row-major. The last
    /// column and row absorb the remainder.
    pub fn grid(width: u32, height: u32, columns: u32, rows: u32) -> Vec<PixelRect> {
        let columns = columns.clamp(1, width.max(1));
        let rows = rows.clamp(1, height.max(1));
        let cell_w = width / columns;
        let cell_h = height / rows;

        let mut cells = Vec::with_capacity((columns * rows) as usize);
        for row in 0..rows {
            let y = row * cell_h;
            let h = if row + 1 == rows { height - y } else { cell_h };
            for column in 0..columns {
                let x = column * cell_w;
                let w = if column + 1 == columns { width - x } else { cell_w };
                cells.push(PixelRect::new(x, y, w, h));
            }
        }
        cells
    }
}
