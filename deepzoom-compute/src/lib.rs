pub mod cancellation;
pub mod direct;
pub mod error;
pub mod evaluator;
pub mod perturbation;
pub mod plan;
pub mod renderer;
pub mod scheduler;
pub mod tile_render;
pub mod tiles;

pub use cancellation::{AtomicBoolChecker, CancelToken, CancellationChecker, Cancelled, NeverCancel};
pub use direct::iterate_point;
pub use error::RenderError;
pub use evaluator::PerturbationEvaluator;
pub use perturbation::{
    iterate_pixel, ProbePoint, ProbeSet, ReferenceOrbit, SeriesApproximation, SeriesApproximator,
    SeriesCoefficients,
};
pub use plan::{FramePlan, PlanCache, PlanKey, ReferenceCoordinate};
pub use renderer::DeepZoomRenderer;
pub use scheduler::{render_batch, PixelEvaluator, ProgressiveScheduler, TickReport};
pub use tile_render::{apply_pass, render_pass, PassSample};
pub use tiles::{generate_cells, CellState, ChunkPass};

// Re-export core types for convenience
pub use deepzoom_core::*;
