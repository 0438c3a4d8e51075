//! Renderer façade: worker pool, plan cache and progressive state.

use crate::cancellation::CancellationChecker;
use crate::error::RenderError;
use crate::evaluator::PerturbationEvaluator;
use crate::plan::{FramePlan, PlanCache, PlanKey};
use crate::scheduler::{render_batch, ProgressiveScheduler, TickReport};
use deepzoom_core::{ConfigError, GlitchPolicy, RenderMode, RenderSettings, ResultGrid};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::Arc;
use std::time::Instant;

/// Everything that invalidates progressive state.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ScheduleKey {
    plan: PlanKey,
    tiles_x: u32,
    tiles_y: u32,
    max_chunk_size: u32,
    glitch_policy: GlitchPolicy,
}

impl ScheduleKey {
    fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            plan: PlanKey::from_settings(settings),
            tiles_x: settings.tiles_x,
            tiles_y: settings.tiles_y,
            max_chunk_size: settings.max_chunk_size,
            glitch_policy: settings.glitch_policy,
        }
    }
}

struct ProgressiveState {
    key: ScheduleKey,
    scheduler: ProgressiveScheduler,
}

/// Deep-zoom renderer. Owns a fixed-size rayon pool and reuses frame plans
/// across calls with identical view settings.
pub struct DeepZoomRenderer {
    pool: ThreadPool,
    cache: PlanCache,
    progressive: Option<ProgressiveState>,
}

fn build_pool(thread_count: usize) -> Result<ThreadPool, RenderError> {
    if thread_count == 0 {
        return Err(ConfigError::ZeroThreads.into());
    }
    Ok(ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .thread_name(|i| format!("deepzoom-worker-{}", i))
        .build()?)
}

impl DeepZoomRenderer {
    pub fn new(thread_count: usize) -> Result<Self, RenderError> {
        log::info!("Starting renderer with {} worker threads", thread_count);
        Ok(Self {
            pool: build_pool(thread_count)?,
            cache: PlanCache::new(),
            progressive: None,
        })
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn plan_cache(&self) -> &PlanCache {
        &self.cache
    }

    /// Latest progressive grid, if a progressive render is under way.
    pub fn progressive_grid(&self) -> Option<&ResultGrid> {
        self.progressive.as_ref().map(|state| state.scheduler.grid())
    }

    fn ensure_pool(&mut self, thread_count: usize) -> Result<(), RenderError> {
        if self.pool.current_num_threads() != thread_count {
            log::debug!(
                "Resizing worker pool from {} to {} threads",
                self.pool.current_num_threads(),
                thread_count
            );
            self.pool = build_pool(thread_count)?;
        }
        Ok(())
    }

    fn prepare<C: CancellationChecker>(
        &mut self,
        settings: &RenderSettings,
        cancel: &C,
    ) -> Result<Arc<FramePlan>, RenderError> {
        settings.validate()?;
        self.ensure_pool(settings.thread_count)?;
        self.cache.get_or_build(settings, cancel)
    }

    /// Render a whole frame. Batch mode evaluates every pixel once;
    /// progressive mode runs cell passes until every cell is at full
    /// resolution. Both produce the same grid.
    pub fn render_frame<C: CancellationChecker>(
        &mut self,
        settings: &RenderSettings,
        cancel: &C,
    ) -> Result<ResultGrid, RenderError> {
        let start = Instant::now();
        let plan = self.prepare(settings, cancel)?;
        let evaluator = PerturbationEvaluator::new(plan, settings.glitch_policy);

        let outcome = self.pool.install(|| match settings.mode {
            RenderMode::Batch => render_batch(&evaluator, settings.width, settings.height, cancel),
            RenderMode::Progressive => {
                let mut scheduler = ProgressiveScheduler::new(
                    settings.width,
                    settings.height,
                    settings.tiles_x,
                    settings.tiles_y,
                    settings.max_chunk_size,
                );
                scheduler
                    .run_to_completion(&evaluator, cancel)
                    .map(|_| scheduler.into_grid())
            }
        });

        let grid = match outcome {
            Ok(grid) => grid,
            Err(cancelled) => {
                log::info!("Frame cancelled after {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
                return Err(cancelled.into());
            }
        };

        let glitches = grid.glitch_count();
        if glitches > 0 {
            log::warn!("{} of {} pixels glitched", glitches, grid.pixels().len());
        }
        log::info!(
            "Rendered {}x{} frame ({:?}) in {:.1}ms",
            settings.width,
            settings.height,
            settings.mode,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(grid)
    }

    /// Advance progressive rendering by one cell pass. Starts over at the
    /// coarsest block size whenever the settings snapshot changes.
    pub fn step<C: CancellationChecker>(
        &mut self,
        settings: &RenderSettings,
        cancel: &C,
    ) -> Result<TickReport, RenderError> {
        let plan = self.prepare(settings, cancel)?;
        let key = ScheduleKey::from_settings(settings);

        let stale = self
            .progressive
            .as_ref()
            .map_or(true, |state| state.key != key);
        if stale {
            self.progressive = None;
        }
        let state = self.progressive.get_or_insert_with(|| {
            log::debug!("Progressive state reset for new snapshot");
            ProgressiveState {
                key,
                scheduler: ProgressiveScheduler::new(
                    settings.width,
                    settings.height,
                    settings.tiles_x,
                    settings.tiles_y,
                    settings.max_chunk_size,
                ),
            }
        });

        let evaluator = PerturbationEvaluator::new(plan, settings.glitch_policy);
        let report = self
            .pool
            .install(|| state.scheduler.tick(&evaluator, cancel))?;

        if report.complete && report.evaluated > 0 {
            log::debug!("Progressive frame complete");
        }
        Ok(report)
    }
}
