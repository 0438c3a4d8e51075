//! Pass rendering: parallel evaluation of one chunk pass and the write-back
//! of its blocks.

use crate::cancellation::{CancellationChecker, Cancelled};
use crate::scheduler::PixelEvaluator;
use crate::tiles::ChunkPass;
use deepzoom_core::{PixelResult, ResultGrid};
use rayon::prelude::*;

/// One evaluated pixel of a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PassSample {
    pub x: u32,
    pub y: u32,
    pub result: PixelResult,
}

/// Evaluate the pixels of `pass`, rows in parallel on the current rayon pool.
///
/// Cancellation is polled once per row; a cancelled pass returns no
/// samples, so nothing partial ever reaches the grid.
pub fn render_pass<E, C>(
    evaluator: &E,
    pass: &ChunkPass,
    cancel: &C,
) -> Result<Vec<PassSample>, Cancelled>
where
    E: PixelEvaluator + ?Sized,
    C: CancellationChecker,
{
    let rows: Vec<u32> = pass.rows().collect();

    let per_row = rows
        .par_iter()
        .map(|&py| {
            cancel.check()?;
            Ok(pass
                .columns(py)
                .map(|px| PassSample {
                    x: px,
                    y: py,
                    result: evaluator.evaluate(px, py),
                })
                .collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>, Cancelled>>()?;

    Ok(per_row.into_iter().flatten().collect())
}

/// Write every sample over its `chunk × chunk` block, clipped to the cell.
pub fn apply_pass(grid: &mut ResultGrid, pass: &ChunkPass, samples: &[PassSample]) {
    let bounds = (pass.rect.right(), pass.rect.bottom());
    for sample in samples {
        grid.fill_block(sample.x, sample.y, pass.chunk, bounds, sample.result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancellation::{CancelToken, NeverCancel};
    use deepzoom_core::PixelRect;

    fn by_position(px: u32, py: u32) -> PixelResult {
        PixelResult::escaped(px * 100 + py, 4.5)
    }

    #[test]
    fn full_pass_matches_direct_evaluation() {
        let rect = PixelRect::new(2, 3, 7, 5);
        let pass = ChunkPass::full(rect);
        let samples = render_pass(&by_position, &pass, &NeverCancel).unwrap();

        assert_eq!(samples.len(), 35);
        for sample in &samples {
            assert_eq!(sample.result, by_position(sample.x, sample.y));
        }
    }

    #[test]
    fn coarse_pass_fills_blocks_clipped_to_cell() {
        let rect = PixelRect::new(0, 0, 6, 6);
        let pass = ChunkPass {
            rect,
            chunk: 4,
            previous: None,
        };
        let mut grid = ResultGrid::new(8, 8);
        let samples = render_pass(&by_position, &pass, &NeverCancel).unwrap();
        apply_pass(&mut grid, &pass, &samples);

        assert_eq!(samples.len(), 4);
        assert_eq!(grid.get(3, 3).unwrap().iterations, 0);
        assert_eq!(grid.get(5, 5).unwrap().iterations, 404);
        assert_eq!(grid.get(5, 0).unwrap().iterations, 400);
        // Outside the cell stays untouched
        assert_eq!(*grid.get(6, 0).unwrap(), PixelResult::default());
    }

    #[test]
    fn cancelled_pass_returns_nothing() {
        let token = CancelToken::new();
        token.cancel();
        let pass = ChunkPass::full(PixelRect::new(0, 0, 4, 4));
        assert_eq!(render_pass(&by_position, &pass, &token), Err(Cancelled));
    }
}
