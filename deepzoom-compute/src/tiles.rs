use deepzoom_core::PixelRect;

/// Generate the cell grid covering the frame, row-major.
pub fn generate_cells(width: u32, height: u32, tiles_x: u32, tiles_y: u32) -> Vec<PixelRect> {
    PixelRect::grid(width, height, tiles_x, tiles_y)
}

/// One refinement pass over a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPass {
    pub rect: PixelRect,
    /// Block size of this pass.
    pub chunk: u32,
    /// Block size of the pass this one refines, if any.
    pub previous: Option<u32>,
}

impl ChunkPass {
    /// Evaluate every pixel of `rect` once.
    pub fn full(rect: PixelRect) -> Self {
        Self {
            rect,
            chunk: 1,
            previous: None,
        }
    }

    /// Whether the pixel at cell-relative (rx, ry) is evaluated by this pass.
    ///
    /// Pixels aligned to `chunk` are evaluated, except those aligned to
    /// `2·chunk` when the previous pass ran at `2·chunk`: their value is
    /// already exact.
    #[inline]
    pub fn evaluates(&self, rx: u32, ry: u32) -> bool {
        if rx % self.chunk != 0 || ry % self.chunk != 0 {
            return false;
        }
        match self.previous {
            Some(previous) if previous == self.chunk * 2 => {
                rx % previous != 0 || ry % previous != 0
            }
            _ => true,
        }
    }

    /// Absolute y coordinates of the rows this pass touches.
    pub fn rows(&self) -> impl Iterator<Item = u32> + '_ {
        (self.rect.y..self.rect.bottom()).step_by(self.chunk as usize)
    }

    /// Absolute x coordinates evaluated on row `py`.
    pub fn columns(&self, py: u32) -> impl Iterator<Item = u32> + '_ {
        let ry = py - self.rect.y;
        (self.rect.x..self.rect.right())
            .step_by(self.chunk as usize)
            .filter(move |&px| self.evaluates(px - self.rect.x, ry))
    }

    /// Number of pixels this pass evaluates.
    pub fn pixel_count(&self) -> usize {
        self.rows().map(|py| self.columns(py).count()).sum()
    }
}

/// Progressive refinement state of one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellState {
    pub rect: PixelRect,
    /// Block size of the next visit.
    pub chunk: u32,
    /// Block size of the last completed visit.
    pub last_pass: Option<u32>,
}

impl CellState {
    pub fn new(rect: PixelRect, max_chunk: u32) -> Self {
        Self {
            rect,
            chunk: max_chunk.max(1),
            last_pass: None,
        }
    }

    /// Finished once a pass at block size 1 completed.
    pub fn is_done(&self) -> bool {
        self.last_pass == Some(1)
    }

    /// The pass the next visit performs, or None when done.
    pub fn next_pass(&self) -> Option<ChunkPass> {
        if self.is_done() {
            return None;
        }
        Some(ChunkPass {
            rect: self.rect,
            chunk: self.chunk,
            previous: self.last_pass,
        })
    }

    /// Record a completed pass and halve the block size (floor 1).
    pub fn complete_pass(&mut self, chunk: u32) {
        self.last_pass = Some(chunk);
        self.chunk = (chunk / 2).max(1);
    }

    pub fn reset(&mut self, max_chunk: u32) {
        *self = Self::new(self.rect, max_chunk);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_cells_covers_frame_exactly() {
        let cells = generate_cells(256, 256, 4, 4);
        assert_eq!(cells.len(), 16);

        let total_area: u32 = cells.iter().map(|t| t.area()).sum();
        assert_eq!(total_area, 256 * 256);
    }

    #[test]
    fn generate_cells_no_overlap() {
        let cells = generate_cells(100, 70, 3, 4);

        for (i, a) in cells.iter().enumerate() {
            for (j, b) in cells.iter().enumerate() {
                if i == j {
                    continue;
                }
                let x_overlap = a.x < b.right() && a.right() > b.x;
                let y_overlap = a.y < b.bottom() && a.bottom() > b.y;
                assert!(!(x_overlap && y_overlap), "Cells {} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn first_pass_evaluates_every_aligned_pixel() {
        let pass = ChunkPass {
            rect: PixelRect::new(0, 0, 16, 16),
            chunk: 8,
            previous: None,
        };
        assert_eq!(pass.pixel_count(), 4);
        assert!(pass.evaluates(0, 0));
        assert!(pass.evaluates(8, 8));
        assert!(!pass.evaluates(4, 0));
    }

    #[test]
    fn refining_pass_skips_previous_pixels() {
        let pass = ChunkPass {
            rect: PixelRect::new(0, 0, 16, 16),
            chunk: 4,
            previous: Some(8),
        };
        // 16 aligned to 4, minus 4 aligned to 8
        assert_eq!(pass.pixel_count(), 12);
        assert!(!pass.evaluates(8, 0));
        assert!(pass.evaluates(4, 0));
        assert!(pass.evaluates(8, 4));
    }

    #[test]
    fn pass_coordinates_are_cell_relative() {
        let pass = ChunkPass {
            rect: PixelRect::new(10, 6, 5, 3),
            chunk: 2,
            previous: None,
        };
        let rows: Vec<u32> = pass.rows().collect();
        assert_eq!(rows, vec![6, 8]);
        let columns: Vec<u32> = pass.columns(6).collect();
        assert_eq!(columns, vec![10, 12, 14]);
    }

    #[test]
    fn cell_halves_chunk_until_done() {
        let mut cell = CellState::new(PixelRect::new(0, 0, 8, 8), 4);
        let mut chunks = Vec::new();
        while let Some(pass) = cell.next_pass() {
            chunks.push(pass.chunk);
            cell.complete_pass(pass.chunk);
        }
        assert_eq!(chunks, vec![4, 2, 1]);
        assert!(cell.is_done());

        cell.reset(4);
        assert_eq!(cell.next_pass().map(|p| p.chunk), Some(4));
    }

    #[test]
    fn all_passes_together_cover_each_pixel_once() {
        let rect = PixelRect::new(3, 5, 13, 11);
        let mut cell = CellState::new(rect, 8);
        let mut hits = vec![0u32; (rect.width * rect.height) as usize];

        while let Some(pass) = cell.next_pass() {
            for py in pass.rows() {
                for px in pass.columns(py) {
                    hits[((py - rect.y) * rect.width + (px - rect.x)) as usize] += 1;
                }
            }
            cell.complete_pass(pass.chunk);
        }

        assert!(hits.iter().all(|&h| h == 1));
    }
}
