//! Cell scheduler for batch and progressive rendering.
//!
//! The frame is split into a grid of cells. Progressive rendering advances
//! one cell per tick, cycling row-major through unfinished cells; each visit
//! halves the cell's block size until it reaches single pixels. Batch
//! rendering evaluates every pixel once.
//!
//! Evaluation is a pure function of the pixel, so the final grid is the same
//! whichever way it was produced.

use crate::cancellation::{CancellationChecker, Cancelled};
use crate::tile_render::{apply_pass, render_pass};
use crate::tiles::{generate_cells, CellState, ChunkPass};
use deepzoom_core::{PixelRect, PixelResult, ResultGrid};

/// Computes the result of one pixel. Must be a pure function of (px, py).
pub trait PixelEvaluator: Sync {
    fn evaluate(&self, px: u32, py: u32) -> PixelResult;
}

impl<F> PixelEvaluator for F
where
    F: Fn(u32, u32) -> PixelResult + Sync,
{
    #[inline]
    fn evaluate(&self, px: u32, py: u32) -> PixelResult {
        self(px, py)
    }
}

/// Outcome of one progressive tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Cell visited, None when everything was already done.
    pub cell: Option<PixelRect>,
    /// Block size of the pass.
    pub chunk: u32,
    /// Pixels evaluated by the pass.
    pub evaluated: usize,
    /// Every cell has reached single-pixel resolution.
    pub complete: bool,
}

/// Evaluate every pixel of a `width × height` frame exactly once.
pub fn render_batch<E, C>(
    evaluator: &E,
    width: u32,
    height: u32,
    cancel: &C,
) -> Result<ResultGrid, Cancelled>
where
    E: PixelEvaluator + ?Sized,
    C: CancellationChecker,
{
    let pass = ChunkPass::full(PixelRect::full(width, height));
    let samples = render_pass(evaluator, &pass, cancel)?;

    let mut grid = ResultGrid::new(width, height);
    apply_pass(&mut grid, &pass, &samples);
    Ok(grid)
}

/// Progressive refinement over a grid of cells.
#[derive(Clone, Debug)]
pub struct ProgressiveScheduler {
    cells: Vec<CellState>,
    max_chunk: u32,
    cursor: usize,
    grid: ResultGrid,
}

impl ProgressiveScheduler {
    pub fn new(width: u32, height: u32, tiles_x: u32, tiles_y: u32, max_chunk: u32) -> Self {
        let cells = generate_cells(width, height, tiles_x, tiles_y)
            .into_iter()
            .map(|rect| CellState::new(rect, max_chunk))
            .collect();
        Self {
            cells,
            max_chunk,
            cursor: 0,
            grid: ResultGrid::new(width, height),
        }
    }

    /// Start over at the coarsest block size. The grid keeps its old
    /// contents until overwritten.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.reset(self.max_chunk);
        }
        self.cursor = 0;
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(CellState::is_done)
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn grid(&self) -> &ResultGrid {
        &self.grid
    }

    pub fn into_grid(self) -> ResultGrid {
        self.grid
    }

    /// Refine the next unfinished cell by one pass.
    ///
    /// A cancelled tick leaves both the grid and the cell state unchanged.
    pub fn tick<E, C>(&mut self, evaluator: &E, cancel: &C) -> Result<TickReport, Cancelled>
    where
        E: PixelEvaluator + ?Sized,
        C: CancellationChecker,
    {
        let count = self.cells.len();
        let next = (0..count)
            .map(|offset| (self.cursor + offset) % count)
            .find(|&index| !self.cells[index].is_done());

        let Some(index) = next else {
            return Ok(TickReport {
                cell: None,
                chunk: 1,
                evaluated: 0,
                complete: true,
            });
        };
        let Some(pass) = self.cells[index].next_pass() else {
            return Ok(TickReport {
                cell: None,
                chunk: 1,
                evaluated: 0,
                complete: self.is_complete(),
            });
        };

        let samples = render_pass(evaluator, &pass, cancel)?;
        apply_pass(&mut self.grid, &pass, &samples);
        self.cells[index].complete_pass(pass.chunk);
        self.cursor = (index + 1) % count;

        Ok(TickReport {
            cell: Some(pass.rect),
            chunk: pass.chunk,
            evaluated: samples.len(),
            complete: self.is_complete(),
        })
    }

    /// Tick until every cell is done.
    pub fn run_to_completion<E, C>(&mut self, evaluator: &E, cancel: &C) -> Result<usize, Cancelled>
    where
        E: PixelEvaluator + ?Sized,
        C: CancellationChecker,
    {
        let mut ticks = 0;
        while !self.is_complete() {
            self.tick(evaluator, cancel)?;
            ticks += 1;
        }
        Ok(ticks)
    }
}
